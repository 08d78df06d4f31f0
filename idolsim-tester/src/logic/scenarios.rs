use idolsim_game::{Activity, CastingMethod, Concept, Schedule};

/// A release the season attempts whenever the cooldown allows.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub first_week: u32,
    pub concept: Concept,
    pub price: i64,
}

/// What a scenario plays out for each seed.
#[derive(Debug, Clone)]
pub struct SeasonPlan {
    pub casting: CastingMethod,
    pub members: usize,
    pub schedule: Schedule,
    pub weeks: u32,
    pub release: Option<ReleasePlan>,
    pub attend_events: bool,
    pub expectations: Vec<Expectation>,
}

/// Scenario-specific checks on top of the always-on invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Every week's fund delta equals its upkeep exactly.
    UpkeepOnly,
    /// The full planned number of weeks was simulated.
    CompletesSeason,
    /// At least one album was settled, when the season reaches the release week.
    ReleasesAlbum,
}

impl Expectation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpkeepOnly => "fund delta equals upkeep",
            Self::CompletesSeason => "season completes",
            Self::ReleasesAlbum => "album released",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: String,
    pub description: &'static str,
    pub plan: SeasonPlan,
}

const SCENARIO_KEYS: [(&str, &str); 3] = [
    ("smoke", "Four mixed training weeks with a fresh academy group"),
    (
        "season",
        "A full year of training, releases and annual events",
    ),
    ("rest", "Rest-only weeks that must cost exactly the upkeep"),
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCENARIO_KEYS.into_iter()
}

/// Expand `all` and drop duplicates, keeping order.
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for name in requested {
        let lowered = name.to_ascii_lowercase();
        let expanded: Vec<String> = if lowered == "all" {
            SCENARIO_KEYS.iter().map(|(key, _)| (*key).to_string()).collect()
        } else {
            vec![lowered]
        };
        for key in expanded {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

fn training_week() -> Schedule {
    Schedule::new([
        Activity::VocalTraining,
        Activity::DancePractice,
        Activity::Rest,
        Activity::RapLesson,
        Activity::LiveStream,
        Activity::Gym,
        Activity::Rest,
    ])
}

/// Look up a scenario by key; `weeks` overrides the planned length when set.
pub fn get_scenario(key: &str, weeks: Option<u32>) -> Option<TestScenario> {
    let (key, description) = SCENARIO_KEYS
        .into_iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))?;
    let mut plan = match key {
        "smoke" => SeasonPlan {
            casting: CastingMethod::Academy,
            members: 3,
            schedule: training_week(),
            weeks: 4,
            release: None,
            attend_events: true,
            expectations: vec![Expectation::CompletesSeason],
        },
        "season" => SeasonPlan {
            casting: CastingMethod::Academy,
            members: 4,
            schedule: Schedule::new([
                Activity::VocalTraining,
                Activity::DancePractice,
                Activity::Rest,
                Activity::StreetPerformance,
                Activity::Rest,
                Activity::LiveStream,
                Activity::Rest,
            ]),
            weeks: 52,
            release: Some(ReleasePlan {
                first_week: 8,
                concept: Concept::Refreshing,
                price: 20_000,
            }),
            attend_events: true,
            expectations: vec![Expectation::CompletesSeason, Expectation::ReleasesAlbum],
        },
        "rest" => SeasonPlan {
            casting: CastingMethod::Street,
            members: 3,
            schedule: Schedule::uniform(Activity::Rest),
            weeks: 3,
            release: None,
            attend_events: false,
            expectations: vec![Expectation::UpkeepOnly, Expectation::CompletesSeason],
        },
        _ => return None,
    };
    if let Some(weeks) = weeks {
        plan.weeks = weeks.max(1);
    }
    Some(TestScenario {
        key,
        name: key.to_string(),
        description,
        plan,
    })
}
