//! Weekly schedule slots and the fixed activity effect table.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DAYS_PER_WEEK;
use crate::error::{ScheduleError, UnknownTag};
use crate::modifiers::FacilityTrack;
use crate::performer::Skill;

/// Activity a roster can be booked for on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    VocalTraining,
    DancePractice,
    RapLesson,
    Gym,
    Psychotherapy,
    StreetPerformance,
    LiveStream,
    Rest,
}

/// What a day of training improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingTarget {
    Skill(Skill),
    /// Conditioning work; gains are credited to stamina.
    Endurance,
}

/// Static effect bundle for an activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityEffect {
    pub gains: &'static [(TrainingTarget, f64)],
    pub stamina: f64,
    pub mental: f64,
    pub risk: f64,
    pub price: i64,
    pub facility: Option<FacilityTrack>,
}

impl ActivityEffect {
    /// Mean of the training gains, used as the skill term of the success roll.
    #[must_use]
    pub fn mean_gain(&self) -> Option<f64> {
        if self.gains.is_empty() {
            return None;
        }
        let total: f64 = self.gains.iter().map(|(_, gain)| gain).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = self.gains.len() as f64;
        Some(total / count)
    }
}

const VOCAL_TRAINING: ActivityEffect = ActivityEffect {
    gains: &[(TrainingTarget::Skill(Skill::Vocal), 1.5)],
    stamina: -10.0,
    mental: -10.0,
    risk: 0.0,
    price: 0,
    facility: Some(FacilityTrack::Vocal),
};

const DANCE_PRACTICE: ActivityEffect = ActivityEffect {
    gains: &[
        (TrainingTarget::Skill(Skill::Dance), 1.5),
        (TrainingTarget::Endurance, 0.5),
    ],
    stamina: -25.0,
    mental: -5.0,
    risk: 0.5,
    price: 0,
    facility: Some(FacilityTrack::Dance),
};

const RAP_LESSON: ActivityEffect = ActivityEffect {
    gains: &[(TrainingTarget::Skill(Skill::Rap), 1.5)],
    stamina: -10.0,
    mental: -10.0,
    risk: 0.0,
    price: 0,
    facility: Some(FacilityTrack::Rap),
};

const GYM: ActivityEffect = ActivityEffect {
    gains: &[
        (TrainingTarget::Endurance, 1.0),
        (TrainingTarget::Skill(Skill::Visual), 0.5),
    ],
    stamina: -20.0,
    mental: -5.0,
    risk: 0.0,
    price: 0,
    facility: Some(FacilityTrack::Gym),
};

const PSYCHOTHERAPY: ActivityEffect = ActivityEffect {
    gains: &[(TrainingTarget::Skill(Skill::Leadership), 0.5)],
    stamina: 5.0,
    mental: 30.0,
    risk: 0.0,
    price: -30_000,
    facility: None,
};

const STREET_PERFORMANCE: ActivityEffect = ActivityEffect {
    gains: &[
        (TrainingTarget::Skill(Skill::Visual), 1.0),
        (TrainingTarget::Skill(Skill::Dance), 1.0),
        (TrainingTarget::Skill(Skill::Vocal), 1.0),
    ],
    stamina: -40.0,
    mental: 10.0,
    risk: 5.0,
    price: 20_000,
    facility: None,
};

const LIVE_STREAM: ActivityEffect = ActivityEffect {
    gains: &[
        (TrainingTarget::Skill(Skill::Visual), 0.5),
        (TrainingTarget::Skill(Skill::Leadership), 0.5),
    ],
    stamina: -20.0,
    mental: 20.0,
    risk: 2.0,
    price: 10_000,
    facility: None,
};

const REST: ActivityEffect = ActivityEffect {
    gains: &[],
    stamina: 35.0,
    mental: 25.0,
    risk: 0.0,
    price: 0,
    facility: None,
};

impl Activity {
    pub const ALL: [Self; 8] = [
        Self::VocalTraining,
        Self::DancePractice,
        Self::RapLesson,
        Self::Gym,
        Self::Psychotherapy,
        Self::StreetPerformance,
        Self::LiveStream,
        Self::Rest,
    ];

    /// Look up the fixed effect bundle for this activity.
    #[must_use]
    pub const fn effect(self) -> &'static ActivityEffect {
        match self {
            Self::VocalTraining => &VOCAL_TRAINING,
            Self::DancePractice => &DANCE_PRACTICE,
            Self::RapLesson => &RAP_LESSON,
            Self::Gym => &GYM,
            Self::Psychotherapy => &PSYCHOTHERAPY,
            Self::StreetPerformance => &STREET_PERFORMANCE,
            Self::LiveStream => &LIVE_STREAM,
            Self::Rest => &REST,
        }
    }

    #[must_use]
    pub const fn is_rest(self) -> bool {
        matches!(self, Self::Rest)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VocalTraining => "vocal_training",
            Self::DancePractice => "dance_practice",
            Self::RapLesson => "rap_lesson",
            Self::Gym => "gym",
            Self::Psychotherapy => "psychotherapy",
            Self::StreetPerformance => "street_performance",
            Self::LiveStream => "live_stream",
            Self::Rest => "rest",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|activity| activity.as_str() == key)
            .ok_or_else(|| UnknownTag::new("activity", s))
    }
}

/// Seven daily activity slots, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Activity>", into = "Vec<Activity>")]
pub struct Schedule([Activity; DAYS_PER_WEEK]);

impl Schedule {
    #[must_use]
    pub const fn new(days: [Activity; DAYS_PER_WEEK]) -> Self {
        Self(days)
    }

    /// A schedule with the same activity every day.
    #[must_use]
    pub const fn uniform(activity: Activity) -> Self {
        Self([activity; DAYS_PER_WEEK])
    }

    #[must_use]
    pub const fn day(&self, index: usize) -> Activity {
        self.0[index % DAYS_PER_WEEK]
    }

    pub fn set_day(&mut self, index: usize, activity: Activity) {
        self.0[index % DAYS_PER_WEEK] = activity;
    }

    pub fn iter(&self) -> impl Iterator<Item = Activity> + '_ {
        self.0.iter().copied()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self([
            Activity::VocalTraining,
            Activity::DancePractice,
            Activity::VocalTraining,
            Activity::DancePractice,
            Activity::Gym,
            Activity::StreetPerformance,
            Activity::Rest,
        ])
    }
}

impl TryFrom<Vec<Activity>> for Schedule {
    type Error = ScheduleError;

    fn try_from(value: Vec<Activity>) -> Result<Self, Self::Error> {
        let len = value.len();
        let days: [Activity; DAYS_PER_WEEK] =
            value.try_into().map_err(|_| ScheduleError::WrongLength(len))?;
        Ok(Self(days))
    }
}

impl From<Schedule> for Vec<Activity> {
    fn from(value: Schedule) -> Self {
        value.0.to_vec()
    }
}
