//! Error taxonomy for guard rejections and malformed input.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Caller-recoverable guard rejection. No state is mutated when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("release cooldown active: {weeks_left} week(s) remaining")]
    ReleaseCooldown { weeks_left: i64 },
    #[error("no active performers available")]
    EmptyRoster,
    #[error("album price must be positive (got {price})")]
    InvalidPrice { price: i64 },
    #[error("a release proposal is already awaiting settlement")]
    ReleasePending,
    #[error("no release proposal is awaiting settlement")]
    NoPendingRelease,
    #[error("no active group selected")]
    NoActiveGroup,
    #[error("a special event decision is pending")]
    DecisionPending,
    #[error("no special event is awaiting a decision")]
    NoPendingDecision,
    #[error("staff capacity reached ({capacity})")]
    StaffCapacity { capacity: u32 },
    #[error("no {role} on staff to dismiss")]
    NoStaffToDismiss { role: String },
    #[error("already at maximum level {level}")]
    MaxLevel { level: u8 },
    #[error("unknown performer `{id}`")]
    UnknownPerformer { id: String },
    #[error("unknown group `{id}`")]
    UnknownGroup { id: String },
    #[error("performer `{id}` is no longer under contract")]
    PerformerUnavailable { id: String },
    #[error("a group needs at least one member")]
    EmptyGroup,
}

/// A malformed weekly schedule (programming error at the boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("schedule must have exactly 7 slots (got {0})")]
    WrongLength(usize),
}

/// A tuning configuration that violates its documented bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("scandal bands out of order (critical {critical:.1} >= major {major:.1})")]
    ScandalBands { critical: f64, major: f64 },
    #[error("config JSON invalid: {0}")]
    Parse(String),
}

/// An unrecognized enumeration tag read from external data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} tag `{tag}`")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub tag: String,
}

impl UnknownTag {
    #[must_use]
    pub fn new(kind: &'static str, tag: &str) -> Self {
        Self {
            kind,
            tag: tag.to_string(),
        }
    }
}
