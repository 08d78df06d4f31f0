//! Roster entities: skills, condition, reception and relationships.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::archetype::Archetype;
use crate::constants::{
    DEFAULT_CONTRACT_WEEKS, DEFAULT_MENTAL, DEFAULT_SENTIMENT, DEFAULT_STAMINA, STAT_MAX, STAT_MIN,
};
use crate::numbers::clamp_pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    MainVocal,
    MainDancer,
    MainRapper,
    Visual,
    Leader,
}

/// The five trainable skill dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Vocal,
    Dance,
    Rap,
    Visual,
    Leadership,
}

impl Skill {
    pub const ALL: [Self; 5] = [
        Self::Vocal,
        Self::Dance,
        Self::Rap,
        Self::Visual,
        Self::Leadership,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vocal => "vocal",
            Self::Dance => "dance",
            Self::Rap => "rap",
            Self::Visual => "visual",
            Self::Leadership => "leadership",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skill vector, each dimension in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Skills {
    pub vocal: f64,
    pub dance: f64,
    pub rap: f64,
    pub visual: f64,
    pub leadership: f64,
}

impl Skills {
    #[must_use]
    pub const fn get(&self, skill: Skill) -> f64 {
        match skill {
            Skill::Vocal => self.vocal,
            Skill::Dance => self.dance,
            Skill::Rap => self.rap,
            Skill::Visual => self.visual,
            Skill::Leadership => self.leadership,
        }
    }

    pub const fn get_mut(&mut self, skill: Skill) -> &mut f64 {
        match skill {
            Skill::Vocal => &mut self.vocal,
            Skill::Dance => &mut self.dance,
            Skill::Rap => &mut self.rap,
            Skill::Visual => &mut self.visual,
            Skill::Leadership => &mut self.leadership,
        }
    }

    /// Add `delta` to one skill, saturating into [0, 100].
    pub fn add(&mut self, skill: Skill, delta: f64) {
        let slot = self.get_mut(skill);
        *slot = clamp_pct(*slot + delta);
    }

    #[must_use]
    pub fn average(&self) -> f64 {
        Skill::ALL.iter().map(|skill| self.get(*skill)).sum::<f64>() / 5.0
    }

    pub fn clamp(&mut self) {
        for skill in Skill::ALL {
            let slot = self.get_mut(skill);
            *slot = clamp_pct(*slot);
        }
    }
}

/// Participation status. `ContractExpired` and `Removed` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Hospitalized,
    ContractExpired,
    Removed,
}

impl Status {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ContractExpired | Self::Removed)
    }
}

/// Special relationship track. Promotion only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRelation {
    Covert,
    Public,
}

/// A single roster entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub age: u8,
    pub archetype: Archetype,
    pub position: Position,
    /// Opaque presentation token (e.g. a color code).
    #[serde(default)]
    pub visual_token: String,
    pub skills: Skills,
    pub stamina: f64,
    pub mental: f64,
    #[serde(default)]
    pub scandal_risk: f64,
    #[serde(default)]
    pub fans: u64,
    pub sentiment: f64,
    #[serde(default)]
    pub relationships: BTreeMap<String, f64>,
    #[serde(default)]
    pub special_relations: BTreeMap<String, SpecialRelation>,
    pub contract_weeks: u32,
    #[serde(default)]
    pub status: Status,
}

/// Identity and starting skills for a new performer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerProfile {
    pub name: String,
    pub gender: Gender,
    pub age: u8,
    pub archetype: Archetype,
    pub position: Position,
    #[serde(default)]
    pub visual_token: String,
}

impl Performer {
    /// Create a performer with default condition values and an Active status.
    #[must_use]
    pub fn new(id: impl Into<String>, profile: PerformerProfile, skills: Skills) -> Self {
        let mut performer = Self {
            id: id.into(),
            name: profile.name,
            gender: profile.gender,
            age: profile.age,
            archetype: profile.archetype,
            position: profile.position,
            visual_token: profile.visual_token,
            skills,
            stamina: DEFAULT_STAMINA,
            mental: DEFAULT_MENTAL,
            scandal_risk: 0.0,
            fans: 0,
            sentiment: DEFAULT_SENTIMENT,
            relationships: BTreeMap::new(),
            special_relations: BTreeMap::new(),
            contract_weeks: DEFAULT_CONTRACT_WEEKS,
            status: Status::Active,
        };
        performer.clamp();
        performer
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, Status::Active)
    }

    #[must_use]
    pub fn affinity(&self, other_id: &str) -> Option<f64> {
        self.relationships.get(other_id).copied()
    }

    #[must_use]
    pub fn special_with(&self, other_id: &str) -> Option<SpecialRelation> {
        self.special_relations.get(other_id).copied()
    }

    /// Re-clamp every bounded field. Called after each mutation.
    pub fn clamp(&mut self) {
        self.skills.clamp();
        self.stamina = clamp_pct(self.stamina);
        self.mental = clamp_pct(self.mental);
        self.sentiment = clamp_pct(self.sentiment);
        if !self.scandal_risk.is_finite() || self.scandal_risk < 0.0 {
            self.scandal_risk = 0.0;
        }
        for affinity in self.relationships.values_mut() {
            *affinity = clamp_pct(*affinity);
        }
    }

    /// Describe the first bounded field found outside its range.
    #[must_use]
    pub fn invariant_violation(&self) -> Option<String> {
        let in_range = |value: f64| value.is_finite() && (STAT_MIN..=STAT_MAX).contains(&value);
        for skill in Skill::ALL {
            let value = self.skills.get(skill);
            if !in_range(value) {
                return Some(format!("{}: skill {skill} = {value}", self.id));
            }
        }
        let conditions = [
            ("stamina", self.stamina),
            ("mental", self.mental),
            ("sentiment", self.sentiment),
        ];
        for (field, value) in conditions {
            if !in_range(value) {
                return Some(format!("{}: {field} = {value}", self.id));
            }
        }
        if !self.scandal_risk.is_finite() || self.scandal_risk < 0.0 {
            return Some(format!("{}: scandal_risk = {}", self.id, self.scandal_risk));
        }
        self.relationships
            .iter()
            .find(|(_, affinity)| !in_range(**affinity))
            .map(|(other, affinity)| format!("{}: affinity with {other} = {affinity}", self.id))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn performer(id: &str, archetype: Archetype) -> Performer {
        Performer::new(
            id,
            PerformerProfile {
                name: format!("Trainee {id}"),
                gender: Gender::Female,
                age: 19,
                archetype,
                position: Position::MainVocal,
                visual_token: String::from("#f59e0b"),
            },
            Skills {
                vocal: 40.0,
                dance: 35.0,
                rap: 20.0,
                visual: 55.0,
                leadership: 25.0,
            },
        )
    }
}
