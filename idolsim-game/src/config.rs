//! Tunable per-tick probabilities.
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Probabilities rolled during a weekly tick.
///
/// Every field has a serde default, so a partial JSON document only overrides
/// what it names. Severity bands are percentages of a roll in `[0, 100)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekConfig {
    #[serde(default = "WeekConfig::default_interaction_chance")]
    pub interaction_chance: f64,
    #[serde(default = "WeekConfig::default_confession_chance")]
    pub confession_chance: f64,
    #[serde(default = "WeekConfig::default_exposure_chance")]
    pub exposure_chance: f64,
    #[serde(default = "WeekConfig::default_random_event_chance")]
    pub random_event_chance: f64,
    #[serde(default = "WeekConfig::default_positive_event_bias")]
    pub positive_event_bias: f64,
    #[serde(default = "WeekConfig::default_stylist_sentiment_chance")]
    pub stylist_sentiment_chance: f64,
    #[serde(default = "WeekConfig::default_hospitalization_chance")]
    pub hospitalization_chance: f64,
    #[serde(default = "WeekConfig::default_scandal_critical_band")]
    pub scandal_critical_band: f64,
    #[serde(default = "WeekConfig::default_scandal_major_band")]
    pub scandal_major_band: f64,
    #[serde(default = "WeekConfig::default_critical_removal_chance")]
    pub critical_removal_chance: f64,
}

impl WeekConfig {
    const fn default_interaction_chance() -> f64 {
        0.15
    }

    const fn default_confession_chance() -> f64 {
        0.05
    }

    const fn default_exposure_chance() -> f64 {
        0.02
    }

    const fn default_random_event_chance() -> f64 {
        0.10
    }

    const fn default_positive_event_bias() -> f64 {
        0.6
    }

    const fn default_stylist_sentiment_chance() -> f64 {
        0.1
    }

    const fn default_hospitalization_chance() -> f64 {
        0.2
    }

    const fn default_scandal_critical_band() -> f64 {
        5.0
    }

    const fn default_scandal_major_band() -> f64 {
        25.0
    }

    const fn default_critical_removal_chance() -> f64 {
        0.7
    }

    /// Parse a (possibly partial) JSON document and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and the validation
    /// error for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a probability leaves `[0, 1]` or the scandal
    /// severity bands leave `[0, 100]` or overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("interaction_chance", self.interaction_chance),
            ("confession_chance", self.confession_chance),
            ("exposure_chance", self.exposure_chance),
            ("random_event_chance", self.random_event_chance),
            ("positive_event_bias", self.positive_event_bias),
            ("stylist_sentiment_chance", self.stylist_sentiment_chance),
            ("hospitalization_chance", self.hospitalization_chance),
            ("critical_removal_chance", self.critical_removal_chance),
        ];
        for (field, value) in probabilities {
            check_range(field, value, 0.0, 1.0)?;
        }
        check_range("scandal_critical_band", self.scandal_critical_band, 0.0, 100.0)?;
        check_range("scandal_major_band", self.scandal_major_band, 0.0, 100.0)?;
        if self.scandal_critical_band > self.scandal_major_band {
            return Err(ConfigError::ScandalBands {
                critical: self.scandal_critical_band,
                major: self.scandal_major_band,
            });
        }
        Ok(())
    }

    /// Replace non-finite values with defaults and clamp into range.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        let fix = |value: f64, fallback: f64, max: f64| {
            if value.is_finite() {
                value.clamp(0.0, max)
            } else {
                fallback
            }
        };
        self.interaction_chance = fix(self.interaction_chance, defaults.interaction_chance, 1.0);
        self.confession_chance = fix(self.confession_chance, defaults.confession_chance, 1.0);
        self.exposure_chance = fix(self.exposure_chance, defaults.exposure_chance, 1.0);
        self.random_event_chance = fix(self.random_event_chance, defaults.random_event_chance, 1.0);
        self.positive_event_bias = fix(self.positive_event_bias, defaults.positive_event_bias, 1.0);
        self.stylist_sentiment_chance = fix(
            self.stylist_sentiment_chance,
            defaults.stylist_sentiment_chance,
            1.0,
        );
        self.hospitalization_chance = fix(
            self.hospitalization_chance,
            defaults.hospitalization_chance,
            1.0,
        );
        self.critical_removal_chance = fix(
            self.critical_removal_chance,
            defaults.critical_removal_chance,
            1.0,
        );
        self.scandal_critical_band =
            fix(self.scandal_critical_band, defaults.scandal_critical_band, 100.0);
        self.scandal_major_band = fix(self.scandal_major_band, defaults.scandal_major_band, 100.0)
            .max(self.scandal_critical_band);
    }
}

impl Default for WeekConfig {
    fn default() -> Self {
        Self {
            interaction_chance: Self::default_interaction_chance(),
            confession_chance: Self::default_confession_chance(),
            exposure_chance: Self::default_exposure_chance(),
            random_event_chance: Self::default_random_event_chance(),
            positive_event_bias: Self::default_positive_event_bias(),
            stylist_sentiment_chance: Self::default_stylist_sentiment_chance(),
            hospitalization_chance: Self::default_hospitalization_chance(),
            scandal_critical_band: Self::default_scandal_critical_band(),
            scandal_major_band: Self::default_scandal_major_band(),
            critical_removal_chance: Self::default_critical_removal_chance(),
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}
