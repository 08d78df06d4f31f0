//! Daily success rolls, random flavor events and scandals.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WeekConfig;
use crate::constants::{
    BREAKTHROUGH_SKILL_GAIN, SCANDAL_CRITICAL_FAN_RETENTION, SCANDAL_CRITICAL_REMOVAL_REPUTATION,
    SCANDAL_CRITICAL_REPUTATION, SCANDAL_CRITICAL_SENTIMENT, SCANDAL_MAJOR_REPUTATION,
    SCANDAL_MAJOR_SENTIMENT, SCANDAL_MENTAL_DIVISOR, SCANDAL_MINOR_SENTIMENT,
    SUCCESS_DEFAULT_STAT_AVG, SUCCESS_STAMINA_WEIGHT, SUCCESS_STAT_WEIGHT,
};
use crate::numbers::{clamp_pct, retain_fraction};
use crate::performer::{Performer, Skill, Status};
use crate::schedule::Activity;

/// Success chance in percent for a non-rest activity.
#[must_use]
pub fn success_chance(performer: &Performer, activity: Activity) -> f64 {
    let stat_avg = activity
        .effect()
        .mean_gain()
        .unwrap_or(SUCCESS_DEFAULT_STAT_AVG);
    clamp_pct(performer.stamina * SUCCESS_STAMINA_WEIGHT + stat_avg * SUCCESS_STAT_WEIGHT)
}

/// Roll whether today's activity succeeds.
///
/// Rest always succeeds and exhausted performers always fail; neither draws.
pub fn roll_success<R>(performer: &Performer, activity: Activity, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    if activity.is_rest() {
        return true;
    }
    if performer.stamina <= 0.0 {
        return false;
    }
    rng.gen_range(0.0..100.0) < success_chance(performer, activity)
}

/// Non-relationship flavor event that can follow a successful day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomEventKind {
    ViralClip,
    FanGift,
    AdOffer,
    Breakthrough,
    Illness,
    HateEdit,
    BrokenEquipment,
}

const POSITIVE_EVENTS: [RandomEventKind; 4] = [
    RandomEventKind::ViralClip,
    RandomEventKind::FanGift,
    RandomEventKind::AdOffer,
    RandomEventKind::Breakthrough,
];

const NEGATIVE_EVENTS: [RandomEventKind; 3] = [
    RandomEventKind::Illness,
    RandomEventKind::HateEdit,
    RandomEventKind::BrokenEquipment,
];

/// Deltas carried by a random event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventEffect {
    pub fans: f64,
    pub sentiment: f64,
    pub mental: f64,
    pub stamina: f64,
    pub funds: i64,
    /// Bonus added to one randomly chosen skill.
    pub skill_boost: f64,
}

impl RandomEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViralClip => "viral_clip",
            Self::FanGift => "fan_gift",
            Self::AdOffer => "ad_offer",
            Self::Breakthrough => "breakthrough",
            Self::Illness => "illness",
            Self::HateEdit => "hate_edit",
            Self::BrokenEquipment => "broken_equipment",
        }
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(
            self,
            Self::ViralClip | Self::FanGift | Self::AdOffer | Self::Breakthrough
        )
    }

    #[must_use]
    pub fn effect(self) -> EventEffect {
        let none = EventEffect::default();
        match self {
            Self::ViralClip => EventEffect {
                fans: 500.0,
                sentiment: 10.0,
                ..none
            },
            Self::FanGift => EventEffect {
                mental: 20.0,
                stamina: 15.0,
                ..none
            },
            Self::AdOffer => EventEffect {
                funds: 500_000,
                ..none
            },
            Self::Breakthrough => EventEffect {
                skill_boost: BREAKTHROUGH_SKILL_GAIN,
                ..none
            },
            Self::Illness => EventEffect {
                stamina: -30.0,
                ..none
            },
            Self::HateEdit => EventEffect {
                fans: -200.0,
                sentiment: -15.0,
                ..none
            },
            Self::BrokenEquipment => EventEffect {
                funds: -200_000,
                ..none
            },
        }
    }
}

/// Roll for a random event after a successful day.
pub fn roll_random_event<R>(cfg: &WeekConfig, rng: &mut R) -> Option<RandomEventKind>
where
    R: Rng + ?Sized,
{
    if !rng.gen_bool(cfg.random_event_chance) {
        return None;
    }
    let pool: &[RandomEventKind] = if rng.gen_bool(cfg.positive_event_bias) {
        &POSITIVE_EVENTS
    } else {
        &NEGATIVE_EVENTS
    };
    Some(pool[rng.gen_range(0..pool.len())])
}

/// Apply the non-fan parts of an event to `performer`.
///
/// Returns `(fan_delta, fund_delta)` so the caller can route fans through the
/// staff multipliers and funds into the weekly ledger.
pub fn apply_random_event<R>(
    performer: &mut Performer,
    kind: RandomEventKind,
    reputation_multiplier: f64,
    rng: &mut R,
) -> (f64, i64)
where
    R: Rng + ?Sized,
{
    let effect = kind.effect();
    performer.mental = clamp_pct(performer.mental + effect.mental);
    performer.stamina = clamp_pct(performer.stamina + effect.stamina);
    performer.sentiment = clamp_pct(performer.sentiment + effect.sentiment);
    if effect.skill_boost > 0.0 {
        let skill = Skill::ALL[rng.gen_range(0..Skill::ALL.len())];
        performer.skills.add(skill, effect.skill_boost);
    }
    ((effect.fans * reputation_multiplier).floor(), effect.funds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScandalSeverity {
    Minor,
    Major,
    Critical,
}

impl ScandalSeverity {
    pub const ALL: [Self; 3] = [Self::Minor, Self::Major, Self::Critical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

/// A rolled scandal, resolved but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scandal {
    pub severity: ScandalSeverity,
    /// Critical scandals that end the performer's career.
    pub removal: bool,
}

/// Scandal probability in percent, clamped to `[0, 100]`.
#[must_use]
pub fn scandal_probability(performer: &Performer) -> f64 {
    clamp_pct(performer.scandal_risk + (100.0 - performer.mental) / SCANDAL_MENTAL_DIVISOR)
}

/// Roll today's scandal check. A zero probability never triggers.
pub fn roll_scandal<R>(performer: &Performer, cfg: &WeekConfig, rng: &mut R) -> Option<Scandal>
where
    R: Rng + ?Sized,
{
    let probability = scandal_probability(performer);
    if rng.gen_range(0.0..100.0) >= probability {
        return None;
    }
    let severity_roll = rng.gen_range(0.0..100.0);
    let severity = if severity_roll < cfg.scandal_critical_band {
        ScandalSeverity::Critical
    } else if severity_roll < cfg.scandal_major_band {
        ScandalSeverity::Major
    } else {
        ScandalSeverity::Minor
    };
    let removal = severity == ScandalSeverity::Critical && rng.gen_bool(cfg.critical_removal_chance);
    Some(Scandal { severity, removal })
}

/// Apply a scandal to `performer`, returning the reputation delta.
pub fn apply_scandal(performer: &mut Performer, scandal: Scandal) -> f64 {
    match scandal.severity {
        ScandalSeverity::Critical if scandal.removal => {
            performer.status = Status::Removed;
            -SCANDAL_CRITICAL_REMOVAL_REPUTATION
        }
        ScandalSeverity::Critical => {
            performer.sentiment = clamp_pct(performer.sentiment - SCANDAL_CRITICAL_SENTIMENT);
            performer.fans = retain_fraction(performer.fans, SCANDAL_CRITICAL_FAN_RETENTION);
            -SCANDAL_CRITICAL_REPUTATION
        }
        ScandalSeverity::Major => {
            performer.sentiment = clamp_pct(performer.sentiment - SCANDAL_MAJOR_SENTIMENT);
            -SCANDAL_MAJOR_REPUTATION
        }
        ScandalSeverity::Minor => {
            performer.sentiment = clamp_pct(performer.sentiment - SCANDAL_MINOR_SENTIMENT);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::performer::fixtures::performer;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn rest_and_exhaustion_short_circuit() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = performer("a", Archetype::Istj);
        assert!(roll_success(&p, Activity::Rest, &mut rng));
        p.stamina = 0.0;
        assert!(!roll_success(&p, Activity::Gym, &mut rng));
        assert!(roll_success(&p, Activity::Rest, &mut rng));
    }

    #[test]
    fn success_chance_blends_stamina_and_gains() {
        let p = performer("a", Archetype::Istj);
        let chance = success_chance(&p, Activity::VocalTraining);
        assert!((chance - (70.0 + 1.5 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn calm_performers_never_scandal() {
        let mut rng = SmallRng::seed_from_u64(77);
        let p = performer("a", Archetype::Isfj);
        assert!(scandal_probability(&p).abs() < f64::EPSILON);
        let cfg = WeekConfig::default();
        for _ in 0..10_000 {
            assert!(roll_scandal(&p, &cfg, &mut rng).is_none());
        }
    }

    #[test]
    fn saturated_risk_always_scandals() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut p = performer("a", Archetype::Estp);
        p.scandal_risk = 500.0;
        assert!((scandal_probability(&p) - 100.0).abs() < f64::EPSILON);
        let cfg = WeekConfig::default();
        for _ in 0..100 {
            assert!(roll_scandal(&p, &cfg, &mut rng).is_some());
        }
    }

    #[test]
    fn severity_effects_match_tiers() {
        let mut p = performer("a", Archetype::Entp);
        p.fans = 1_000;
        let rep = apply_scandal(
            &mut p,
            Scandal {
                severity: ScandalSeverity::Critical,
                removal: false,
            },
        );
        assert!((rep + 3.0).abs() < f64::EPSILON);
        assert_eq!(p.fans, 500);
        assert!((p.sentiment - 10.0).abs() < f64::EPSILON);

        let rep = apply_scandal(
            &mut p,
            Scandal {
                severity: ScandalSeverity::Minor,
                removal: false,
            },
        );
        assert!(rep.abs() < f64::EPSILON);
        assert!((p.sentiment - 5.0).abs() < f64::EPSILON);

        let rep = apply_scandal(
            &mut p,
            Scandal {
                severity: ScandalSeverity::Critical,
                removal: true,
            },
        );
        assert!((rep + 10.0).abs() < f64::EPSILON);
        assert_eq!(p.status, Status::Removed);
    }

    #[test]
    fn positive_bias_of_one_only_draws_positive() {
        let mut rng = SmallRng::seed_from_u64(21);
        let cfg = WeekConfig {
            random_event_chance: 1.0,
            positive_event_bias: 1.0,
            ..WeekConfig::default()
        };
        for _ in 0..200 {
            let kind = roll_random_event(&cfg, &mut rng).unwrap();
            assert!(kind.is_positive());
        }
    }

    #[test]
    fn breakthrough_raises_one_skill() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut p = performer("a", Archetype::Infp);
        let before = p.skills.average();
        let (fans, funds) = apply_random_event(&mut p, RandomEventKind::Breakthrough, 1.0, &mut rng);
        assert!(fans.abs() < f64::EPSILON);
        assert_eq!(funds, 0);
        assert!((p.skills.average() - before - 0.6).abs() < 1e-9);
    }
}
