//! Idolsim Game Engine
//!
//! Platform-agnostic simulation core for the Idolsim talent-agency game:
//! the weekly training tick, the release economics model and the weekly
//! chart. This crate carries no UI or platform-specific dependencies; every
//! probabilistic function takes its random source as a parameter.

pub mod agency;
pub mod archetype;
pub mod calendar;
pub mod config;
pub mod constants;
pub mod error;
pub mod flavor;
pub mod group;
pub mod modifiers;
pub mod numbers;
pub mod performer;
pub mod ranking;
pub mod relationship;
pub mod release;
pub mod rng;
pub mod scandal;
pub mod schedule;
pub mod week;

// Re-export commonly used types
pub use agency::{Agency, CastingMethod, Notice, WeekReport, renewal_cost};
pub use archetype::{Archetype, ArchetypeFamily, is_complementary};
pub use calendar::{SPECIAL_EVENTS, SpecialEvent, event_for_week, week_of_year};
pub use config::WeekConfig;
pub use error::{ConfigError, Rejection, ScheduleError, UnknownTag};
pub use flavor::{FlavorCatalog, FlavorCategory, FlavorText, KeyFlavor};
pub use group::{Group, GroupCategory};
pub use modifiers::{Facilities, FacilityTrack, HqLevel, Modifiers, Staff, StaffRole};
pub use performer::{
    Gender, Performer, PerformerProfile, Position, Skill, Skills, SpecialRelation, Status,
};
pub use ranking::{PlayerEntry, RIVALS, RankingEntry, Rival, Trend, compute_ranking};
pub use relationship::RelationTier;
pub use release::{
    Album, ChartDay, Concept, PriceSentiment, ReleaseProposal, ReleaseRequest, Settlement,
    chart_run, propose_release, settle_release,
};
pub use rng::{CountingRng, RngBundle};
pub use scandal::{RandomEventKind, Scandal, ScandalSeverity};
pub use schedule::{Activity, Schedule, TrainingTarget};
pub use week::{DayLog, WeekContext, WeekOutcome, assert_invariants, run_week};
