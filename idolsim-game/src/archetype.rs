//! Personality archetypes and the compatibility resolver.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownTag;

/// One of the sixteen personality archetypes a performer can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Archetype {
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
}

/// Coarse grouping of archetypes used by the compatibility resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeFamily {
    Analysts,
    Diplomats,
    Sentinels,
    Explorers,
}

impl Archetype {
    pub const ALL: [Self; 16] = [
        Self::Intj,
        Self::Intp,
        Self::Entj,
        Self::Entp,
        Self::Infj,
        Self::Infp,
        Self::Enfj,
        Self::Enfp,
        Self::Istj,
        Self::Isfj,
        Self::Estj,
        Self::Esfj,
        Self::Istp,
        Self::Isfp,
        Self::Estp,
        Self::Esfp,
    ];

    #[must_use]
    pub const fn family(self) -> ArchetypeFamily {
        match self {
            Self::Intj | Self::Intp | Self::Entj | Self::Entp => ArchetypeFamily::Analysts,
            Self::Infj | Self::Infp | Self::Enfj | Self::Enfp => ArchetypeFamily::Diplomats,
            Self::Istj | Self::Isfj | Self::Estj | Self::Esfj => ArchetypeFamily::Sentinels,
            Self::Istp | Self::Isfp | Self::Estp | Self::Esfp => ArchetypeFamily::Explorers,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intj => "INTJ",
            Self::Intp => "INTP",
            Self::Entj => "ENTJ",
            Self::Entp => "ENTP",
            Self::Infj => "INFJ",
            Self::Infp => "INFP",
            Self::Enfj => "ENFJ",
            Self::Enfp => "ENFP",
            Self::Istj => "ISTJ",
            Self::Isfj => "ISFJ",
            Self::Estj => "ESTJ",
            Self::Esfj => "ESFJ",
            Self::Istp => "ISTP",
            Self::Isfp => "ISFP",
            Self::Estp => "ESTP",
            Self::Esfp => "ESFP",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|archetype| archetype.as_str() == upper)
            .ok_or_else(|| UnknownTag::new("archetype", s))
    }
}

/// Whether two archetypes sit in complementary families.
///
/// Only Analysts/Sentinels and Diplomats/Explorers pairings count; two
/// archetypes from the same family are never complementary.
#[must_use]
pub const fn is_complementary(a: Archetype, b: Archetype) -> bool {
    use ArchetypeFamily::{Analysts, Diplomats, Explorers, Sentinels};
    matches!(
        (a.family(), b.family()),
        (Analysts, Sentinels) | (Sentinels, Analysts) | (Diplomats, Explorers) | (Explorers, Diplomats)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_family_pairs_are_complementary() {
        assert!(is_complementary(Archetype::Intj, Archetype::Estj));
        assert!(is_complementary(Archetype::Isfj, Archetype::Entp));
        assert!(is_complementary(Archetype::Enfp, Archetype::Istp));
        assert!(is_complementary(Archetype::Esfp, Archetype::Infj));
    }

    #[test]
    fn other_pairs_are_not() {
        assert!(!is_complementary(Archetype::Intj, Archetype::Intp));
        assert!(!is_complementary(Archetype::Intj, Archetype::Infj));
        assert!(!is_complementary(Archetype::Istj, Archetype::Istp));
        assert!(!is_complementary(Archetype::Esfp, Archetype::Esfp));
    }

    #[test]
    fn resolver_is_symmetric_over_all_pairs() {
        for a in Archetype::ALL {
            for b in Archetype::ALL {
                assert_eq!(is_complementary(a, b), is_complementary(b, a));
            }
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("enfp".parse::<Archetype>().unwrap(), Archetype::Enfp);
        assert!("XXXX".parse::<Archetype>().is_err());
        let json = serde_json::to_string(&Archetype::Istj).unwrap();
        assert_eq!(json, "\"ISTJ\"");
    }
}
