//! Facility tracks, staff headcounts, HQ tiers and the bonuses they derive.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    FACILITY_STEP_BONUS, MANAGER_FATIGUE_MITIGATION, MANAGER_FATIGUE_MITIGATION_CAP,
    MANAGER_RECOVERY_FACTOR, MARKETER_FAN_BONUS, MARKETER_FUND_BONUS, MARKETER_LOSS_FLOOR,
    MARKETER_LOSS_MITIGATION, MAX_FACILITY_LEVEL, STYLIST_VISUAL_BONUS, TRAINER_SKILL_BONUS,
};
use crate::error::UnknownTag;
use crate::performer::Skill;

/// Training facility a scheduled activity can draw efficiency from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityTrack {
    Vocal,
    Dance,
    Rap,
    Gym,
}

impl FacilityTrack {
    pub const ALL: [Self; 4] = [Self::Vocal, Self::Dance, Self::Rap, Self::Gym];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vocal => "vocal",
            Self::Dance => "dance",
            Self::Rap => "rap",
            Self::Gym => "gym",
        }
    }
}

impl fmt::Display for FacilityTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityTrack {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|track| track.as_str() == key)
            .ok_or_else(|| UnknownTag::new("facility", s))
    }
}

const fn default_level() -> u8 {
    1
}

/// Facility levels, each in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilities {
    #[serde(default = "default_level")]
    pub vocal: u8,
    #[serde(default = "default_level")]
    pub dance: u8,
    #[serde(default = "default_level")]
    pub rap: u8,
    #[serde(default = "default_level")]
    pub gym: u8,
}

impl Default for Facilities {
    fn default() -> Self {
        Self {
            vocal: 1,
            dance: 1,
            rap: 1,
            gym: 1,
        }
    }
}

impl Facilities {
    #[must_use]
    pub fn level(&self, track: FacilityTrack) -> u8 {
        let raw = match track {
            FacilityTrack::Vocal => self.vocal,
            FacilityTrack::Dance => self.dance,
            FacilityTrack::Rap => self.rap,
            FacilityTrack::Gym => self.gym,
        };
        raw.clamp(1, MAX_FACILITY_LEVEL)
    }

    pub fn set_level(&mut self, track: FacilityTrack, level: u8) {
        let level = level.clamp(1, MAX_FACILITY_LEVEL);
        match track {
            FacilityTrack::Vocal => self.vocal = level,
            FacilityTrack::Dance => self.dance = level,
            FacilityTrack::Rap => self.rap = level,
            FacilityTrack::Gym => self.gym = level,
        }
    }

    /// Linear efficiency multiplier for an activity's affiliated track.
    ///
    /// Activities without a track train at 1.0.
    #[must_use]
    pub fn efficiency(&self, track: Option<FacilityTrack>) -> f64 {
        track.map_or(1.0, |track| {
            1.0 + f64::from(self.level(track) - 1) * FACILITY_STEP_BONUS
        })
    }
}

/// Cost to raise a facility to `target_level`, or `None` past the cap.
#[must_use]
pub const fn facility_upgrade_cost(target_level: u8) -> Option<i64> {
    match target_level {
        2 => Some(100_000),
        3 => Some(300_000),
        4 => Some(700_000),
        5 => Some(1_500_000),
        6 => Some(3_000_000),
        7 => Some(5_500_000),
        8 => Some(9_000_000),
        9 => Some(14_000_000),
        10 => Some(20_000_000),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Manager,
    VocalTrainer,
    DanceTrainer,
    Marketer,
    Stylist,
}

impl StaffRole {
    pub const ALL: [Self; 5] = [
        Self::Manager,
        Self::VocalTrainer,
        Self::DanceTrainer,
        Self::Marketer,
        Self::Stylist,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::VocalTrainer => "vocal_trainer",
            Self::DanceTrainer => "dance_trainer",
            Self::Marketer => "marketer",
            Self::Stylist => "stylist",
        }
    }

    /// Weekly salary per head.
    #[must_use]
    pub const fn salary(self) -> i64 {
        match self {
            Self::Manager => 30_000,
            Self::VocalTrainer | Self::DanceTrainer => 25_000,
            Self::Marketer => 35_000,
            Self::Stylist => 20_000,
        }
    }

    /// One-off fee paid when hiring.
    #[must_use]
    pub const fn signing_fee(self) -> i64 {
        self.salary() * 4
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == key)
            .ok_or_else(|| UnknownTag::new("staff role", s))
    }
}

/// Staff headcounts per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Staff {
    #[serde(default)]
    pub manager: u32,
    #[serde(default)]
    pub vocal_trainer: u32,
    #[serde(default)]
    pub dance_trainer: u32,
    #[serde(default)]
    pub marketer: u32,
    #[serde(default)]
    pub stylist: u32,
}

impl Staff {
    #[must_use]
    pub const fn count(&self, role: StaffRole) -> u32 {
        match role {
            StaffRole::Manager => self.manager,
            StaffRole::VocalTrainer => self.vocal_trainer,
            StaffRole::DanceTrainer => self.dance_trainer,
            StaffRole::Marketer => self.marketer,
            StaffRole::Stylist => self.stylist,
        }
    }

    const fn slot_mut(&mut self, role: StaffRole) -> &mut u32 {
        match role {
            StaffRole::Manager => &mut self.manager,
            StaffRole::VocalTrainer => &mut self.vocal_trainer,
            StaffRole::DanceTrainer => &mut self.dance_trainer,
            StaffRole::Marketer => &mut self.marketer,
            StaffRole::Stylist => &mut self.stylist,
        }
    }

    pub const fn add(&mut self, role: StaffRole) {
        let slot = self.slot_mut(role);
        *slot = slot.saturating_add(1);
    }

    /// Remove one head of `role`. Returns false when nobody holds the role.
    pub const fn remove(&mut self, role: StaffRole) -> bool {
        let slot = self.slot_mut(role);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        StaffRole::ALL
            .iter()
            .fold(0_u32, |acc, role| acc.saturating_add(self.count(*role)))
    }

    #[must_use]
    pub fn weekly_salary(&self) -> i64 {
        StaffRole::ALL.iter().fold(0_i64, |acc, role| {
            acc.saturating_add(i64::from(self.count(*role)).saturating_mul(role.salary()))
        })
    }

    /// Derive the per-week bonus multipliers from current headcounts.
    #[must_use]
    pub fn bonuses(&self) -> StaffBonuses {
        let heads = |role| f64::from(self.count(role));
        StaffBonuses {
            fatigue_mitigation: (heads(StaffRole::Manager) * MANAGER_FATIGUE_MITIGATION)
                .min(MANAGER_FATIGUE_MITIGATION_CAP),
            vocal_gain: 1.0 + heads(StaffRole::VocalTrainer) * TRAINER_SKILL_BONUS,
            dance_gain: 1.0 + heads(StaffRole::DanceTrainer) * TRAINER_SKILL_BONUS,
            visual_gain: 1.0 + heads(StaffRole::Stylist) * STYLIST_VISUAL_BONUS,
            fan_gain: 1.0 + heads(StaffRole::Marketer) * MARKETER_FAN_BONUS,
            fan_loss: (1.0 - heads(StaffRole::Marketer) * MARKETER_LOSS_MITIGATION)
                .max(MARKETER_LOSS_FLOOR),
            fund_gain: 1.0 + heads(StaffRole::Marketer) * MARKETER_FUND_BONUS,
            has_stylist: self.stylist > 0,
        }
    }
}

/// Multipliers derived from staff headcounts for one weekly tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffBonuses {
    /// Fraction of stamina loss absorbed by managers.
    pub fatigue_mitigation: f64,
    pub vocal_gain: f64,
    pub dance_gain: f64,
    pub visual_gain: f64,
    pub fan_gain: f64,
    pub fan_loss: f64,
    pub fund_gain: f64,
    pub has_stylist: bool,
}

impl StaffBonuses {
    /// Staff multiplier applied to a skill gain.
    #[must_use]
    pub const fn skill_gain(&self, skill: Skill) -> f64 {
        match skill {
            Skill::Vocal => self.vocal_gain,
            Skill::Dance => self.dance_gain,
            Skill::Visual => self.visual_gain,
            Skill::Rap | Skill::Leadership => 1.0,
        }
    }

    /// Scale a raw stamina delta: losses shrink with managers, recovery grows.
    #[must_use]
    pub fn stamina_delta(&self, raw: f64) -> f64 {
        if raw < 0.0 {
            raw * (1.0 - self.fatigue_mitigation)
        } else {
            raw * (1.0 + self.fatigue_mitigation * MANAGER_RECOVERY_FACTOR)
        }
    }

    /// Scale a net fan delta through the marketer bonus.
    #[must_use]
    pub fn fan_delta(&self, raw: f64) -> f64 {
        if raw > 0.0 {
            (raw * self.fan_gain).floor()
        } else if raw < 0.0 {
            (raw * self.fan_loss).floor()
        } else {
            0.0
        }
    }
}

/// One headquarters tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HqLevel {
    pub level: u8,
    pub name: &'static str,
    pub cost: i64,
    pub max_staff: u32,
    pub maintenance: i64,
}

pub const HQ_LEVELS: [HqLevel; 5] = [
    HqLevel {
        level: 1,
        name: "Basement Studio",
        cost: 0,
        max_staff: 2,
        maintenance: 10_000,
    },
    HqLevel {
        level: 2,
        name: "Office Floor",
        cost: 2_000_000,
        max_staff: 5,
        maintenance: 50_000,
    },
    HqLevel {
        level: 3,
        name: "Agency Building",
        cost: 8_000_000,
        max_staff: 10,
        maintenance: 150_000,
    },
    HqLevel {
        level: 4,
        name: "Media Tower",
        cost: 25_000_000,
        max_staff: 20,
        maintenance: 400_000,
    },
    HqLevel {
        level: 5,
        name: "Entertainment Campus",
        cost: 80_000_000,
        max_staff: 40,
        maintenance: 1_000_000,
    },
];

/// Look up an HQ tier, falling back to the first tier for unknown levels.
#[must_use]
pub fn hq_level(level: u8) -> &'static HqLevel {
    HQ_LEVELS
        .iter()
        .find(|tier| tier.level == level)
        .unwrap_or(&HQ_LEVELS[0])
}

/// Everything the weekly tick needs to know about the operation's upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub facilities: Facilities,
    #[serde(default)]
    pub staff: Staff,
    #[serde(default = "default_level")]
    pub hq_level: u8,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            facilities: Facilities::default(),
            staff: Staff::default(),
            hq_level: 1,
        }
    }
}

impl Modifiers {
    /// HQ maintenance plus staff salaries for one week.
    #[must_use]
    pub fn weekly_upkeep(&self) -> i64 {
        hq_level(self.hq_level)
            .maintenance
            .saturating_add(self.staff.weekly_salary())
    }

    #[must_use]
    pub fn staff_capacity(&self) -> u32 {
        hq_level(self.hq_level).max_staff
    }
}
