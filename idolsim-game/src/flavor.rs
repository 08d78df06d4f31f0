//! Flavor text lookup.
//!
//! The engine never owns prose. It asks a [`FlavorText`] implementation for
//! "a line in this category" and substitutes performer names into it. The
//! bundled [`FlavorCatalog`] reads `assets/flavor.json`; tests can use
//! [`KeyFlavor`], which renders every line as its category key.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::archetype::Archetype;
use crate::relationship::RelationTier;
use crate::scandal::{RandomEventKind, ScandalSeverity};

const DEFAULT_FLAVOR_DATA: &str = include_str!("../assets/flavor.json");

/// Closed set of text categories the engine asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlavorCategory {
    /// Daily training remark, keyed by the performer's archetype.
    Routine(Archetype),
    Relationship(RelationTier),
    RandomEvent(RandomEventKind),
    Scandal(ScandalSeverity),
    Confession,
    Exposure,
}

impl FlavorCategory {
    /// Catalog key for this category, e.g. `routine.ENFP`.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Routine(archetype) => format!("routine.{}", archetype.as_str()),
            Self::Relationship(tier) => format!("relationship.{}", tier.as_str()),
            Self::RandomEvent(kind) => format!("event.{}", kind.as_str()),
            Self::Scandal(severity) => format!("scandal.{}", severity.as_str()),
            Self::Confession => String::from("confession"),
            Self::Exposure => String::from("exposure"),
        }
    }
}

/// Read-only text table consumed by the weekly tick.
pub trait FlavorText {
    /// Number of lines available for a category (0 when none).
    fn variants(&self, category: FlavorCategory) -> usize;

    /// Line `index` of a category; implementations may wrap the index.
    fn line(&self, category: FlavorCategory, index: usize) -> Option<&str>;
}

/// Fallback table with no prose: every rendered line is the category key.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyFlavor;

impl FlavorText for KeyFlavor {
    fn variants(&self, _category: FlavorCategory) -> usize {
        0
    }

    fn line(&self, _category: FlavorCategory, _index: usize) -> Option<&str> {
        None
    }
}

/// Flavor lines keyed by category, loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FlavorCatalog {
    lines: BTreeMap<String, Vec<String>>,
}

impl FlavorCatalog {
    /// Parse the bundled catalog, falling back to an empty one.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_FLAVOR_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<FlavorCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON is not an object of string arrays.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FlavorText for FlavorCatalog {
    fn variants(&self, category: FlavorCategory) -> usize {
        self.lines.get(&category.key()).map_or(0, Vec::len)
    }

    fn line(&self, category: FlavorCategory, index: usize) -> Option<&str> {
        let pool = self.lines.get(&category.key())?;
        if pool.is_empty() {
            return None;
        }
        pool.get(index % pool.len()).map(String::as_str)
    }
}

/// Render line `index` of `category`, substituting `{name}`, `{name1}` and
/// `{name2}`. Falls back to the category key when the table has no line.
pub fn render<F>(flavor: &F, category: FlavorCategory, index: usize, names: &[&str]) -> String
where
    F: FlavorText + ?Sized,
{
    let Some(template) = flavor.line(category, index) else {
        return category.key();
    };
    let first = names.first().copied().unwrap_or_default();
    let second = names.get(1).copied().unwrap_or_default();
    template
        .replace("{name1}", first)
        .replace("{name2}", second)
        .replace("{name}", first)
}

/// Render a uniformly chosen line of `category`.
pub fn render_random<F, R>(flavor: &F, category: FlavorCategory, names: &[&str], rng: &mut R) -> String
where
    F: FlavorText + ?Sized,
    R: Rng + ?Sized,
{
    let count = flavor.variants(category);
    let index = if count > 1 { rng.gen_range(0..count) } else { 0 };
    render(flavor, category, index, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn bundled_catalog_covers_every_archetype() {
        let catalog = FlavorCatalog::default_catalog();
        assert!(!catalog.is_empty());
        for archetype in Archetype::ALL {
            assert!(
                catalog.variants(FlavorCategory::Routine(archetype)) > 0,
                "missing routine lines for {archetype}"
            );
        }
        for severity in ScandalSeverity::ALL {
            assert!(catalog.variants(FlavorCategory::Scandal(severity)) > 0);
        }
        for tier in RelationTier::ALL {
            assert!(catalog.variants(FlavorCategory::Relationship(tier)) > 0);
        }
    }

    #[test]
    fn render_substitutes_names() {
        let catalog =
            FlavorCatalog::from_json(r#"{ "confession": ["{name1} and {name2} hold hands"] }"#)
                .unwrap();
        let line = render(&catalog, FlavorCategory::Confession, 3, &["Mina", "Joon"]);
        assert_eq!(line, "Mina and Joon hold hands");
    }

    #[test]
    fn missing_lines_fall_back_to_key() {
        let mut rng = SmallRng::seed_from_u64(3);
        let line = render_random(&KeyFlavor, FlavorCategory::Exposure, &["A"], &mut rng);
        assert_eq!(line, "exposure");
        assert_eq!(
            FlavorCategory::Routine(Archetype::Enfp).key(),
            "routine.ENFP"
        );
    }
}
