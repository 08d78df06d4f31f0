//! Annual special events keyed by week of year.
use serde::Serialize;

use crate::constants::WEEKS_PER_YEAR;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventRewards {
    pub fans: u64,
    pub reputation: f64,
    pub funds: i64,
}

/// Costs of taking part. Stamina and mental apply to each Active member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventCosts {
    pub stamina: f64,
    pub mental: f64,
    pub funds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpecialEvent {
    pub id: &'static str,
    pub name: &'static str,
    pub week_of_year: u32,
    pub min_reputation: f64,
    pub rewards: EventRewards,
    pub costs: EventCosts,
}

pub const SPECIAL_EVENTS: [SpecialEvent; 5] = [
    SpecialEvent {
        id: "rookie_showcase",
        name: "Rookie Showcase",
        week_of_year: 4,
        min_reputation: 0.0,
        rewards: EventRewards {
            fans: 1_000,
            reputation: 5.0,
            funds: 0,
        },
        costs: EventCosts {
            stamina: 20.0,
            mental: 10.0,
            funds: 50_000,
        },
    },
    SpecialEvent {
        id: "isac_summer",
        name: "Idol Summer Games",
        week_of_year: 12,
        min_reputation: 15.0,
        rewards: EventRewards {
            fans: 5_000,
            reputation: 3.0,
            funds: 0,
        },
        costs: EventCosts {
            stamina: 60.0,
            mental: 20.0,
            funds: 0,
        },
    },
    SpecialEvent {
        id: "summer_festival",
        name: "Summer Music Festival",
        week_of_year: 26,
        min_reputation: 35.0,
        rewards: EventRewards {
            fans: 3_000,
            reputation: 4.0,
            funds: 200_000,
        },
        costs: EventCosts {
            stamina: 40.0,
            mental: 5.0,
            funds: 0,
        },
    },
    SpecialEvent {
        id: "world_tour_start",
        name: "World Tour Kickoff",
        week_of_year: 38,
        min_reputation: 60.0,
        rewards: EventRewards {
            fans: 15_000,
            reputation: 10.0,
            funds: 1_000_000,
        },
        costs: EventCosts {
            stamina: 80.0,
            mental: 40.0,
            funds: 300_000,
        },
    },
    SpecialEvent {
        id: "music_awards",
        name: "Year-End Music Awards",
        week_of_year: 50,
        min_reputation: 80.0,
        rewards: EventRewards {
            fans: 20_000,
            reputation: 15.0,
            funds: 0,
        },
        costs: EventCosts {
            stamina: 50.0,
            mental: 30.0,
            funds: 100_000,
        },
    },
];

/// 1-based week of year for an absolute 1-based week.
#[must_use]
pub const fn week_of_year(week: u32) -> u32 {
    (week.saturating_sub(1) % WEEKS_PER_YEAR) + 1
}

/// The event scheduled for `week`, regardless of reputation.
#[must_use]
pub fn event_for_week(week: u32) -> Option<&'static SpecialEvent> {
    let target = week_of_year(week);
    SPECIAL_EVENTS.iter().find(|event| event.week_of_year == target)
}

impl SpecialEvent {
    #[must_use]
    pub fn is_eligible(&self, reputation: f64) -> bool {
        reputation >= self.min_reputation
    }
}
