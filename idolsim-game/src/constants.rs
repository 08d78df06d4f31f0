//! Centralized balance and tuning constants for Idolsim game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Probabilities that designers tune between builds live in
//! [`crate::config::WeekConfig`]; everything here changes only through code
//! review.

// Clamp ranges ---------------------------------------------------------------
pub(crate) const STAT_MIN: f64 = 0.0;
pub(crate) const STAT_MAX: f64 = 100.0;
pub(crate) const AFFINITY_DEFAULT: f64 = 50.0;

// Calendar -------------------------------------------------------------------
pub const DAYS_PER_WEEK: usize = 7;
pub const WEEKS_PER_YEAR: u32 = 52;
pub(crate) const DAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

// Performer defaults ---------------------------------------------------------
pub const DEFAULT_CONTRACT_WEEKS: u32 = 48;
pub(crate) const DEFAULT_STAMINA: f64 = 100.0;
pub(crate) const DEFAULT_MENTAL: f64 = 100.0;
pub(crate) const DEFAULT_SENTIMENT: f64 = 50.0;
pub(crate) const CONTRACT_WARNING_WEEKS: u32 = 4;
pub(crate) const CONTRACT_NOTICE_WEEKS: u32 = 12;

// Weekly tick ----------------------------------------------------------------
pub(crate) const FACILITY_STEP_BONUS: f64 = 0.2;
pub(crate) const SUCCESS_STAMINA_WEIGHT: f64 = 0.7;
pub(crate) const SUCCESS_STAT_WEIGHT: f64 = 0.3;
pub(crate) const SUCCESS_DEFAULT_STAT_AVG: f64 = 50.0;
pub(crate) const FAILURE_GAIN_FACTOR: f64 = 0.5;
pub(crate) const FAILURE_EARNINGS_FACTOR: f64 = 0.5;
pub(crate) const FAILURE_MENTAL_PENALTY: f64 = 10.0;
pub(crate) const FAILURE_REPUTATION_PENALTY: f64 = 0.5;
pub(crate) const FAN_EARNINGS_PER_FAN: f64 = 5.0;
pub(crate) const HOSPITAL_DAILY_STAMINA: f64 = 20.0;
pub(crate) const HOSPITAL_DAILY_MENTAL: f64 = 5.0;
pub(crate) const HOSPITAL_RELEASE_STAMINA: f64 = 80.0;
pub(crate) const BENCH_DAILY_STAMINA: f64 = 5.0;
pub(crate) const BENCH_DAILY_MENTAL: f64 = 2.0;
pub(crate) const STREET_REPUTATION_PER_DAY: f64 = 0.5;
pub(crate) const STREAM_REPUTATION_PER_DAY: f64 = 0.3;

// Staff ----------------------------------------------------------------------
pub(crate) const MANAGER_FATIGUE_MITIGATION: f64 = 0.1;
pub(crate) const MANAGER_FATIGUE_MITIGATION_CAP: f64 = 0.9;
pub(crate) const MANAGER_RECOVERY_FACTOR: f64 = 0.5;
pub(crate) const TRAINER_SKILL_BONUS: f64 = 0.2;
pub(crate) const STYLIST_VISUAL_BONUS: f64 = 0.2;
pub(crate) const STYLIST_SENTIMENT_GAIN: f64 = 2.0;
pub(crate) const MARKETER_FAN_BONUS: f64 = 0.15;
pub(crate) const MARKETER_FUND_BONUS: f64 = 0.05;
pub(crate) const MARKETER_LOSS_MITIGATION: f64 = 0.1;
pub(crate) const MARKETER_LOSS_FLOOR: f64 = 0.5;

// Relationships --------------------------------------------------------------
pub(crate) const TIER_SOULMATE: f64 = 90.0;
pub(crate) const TIER_BEST_FRIEND: f64 = 80.0;
pub(crate) const TIER_FRIENDLY: f64 = 60.0;
pub(crate) const TIER_NEMESIS: f64 = 10.0;
pub(crate) const TIER_ENEMY: f64 = 20.0;
pub(crate) const TIER_AWKWARD: f64 = 40.0;
pub(crate) const CONFESSION_AFFINITY: f64 = 90.0;
pub(crate) const CONFESSION_MENTAL_BONUS: f64 = 30.0;
pub(crate) const CONFESSION_STAMINA_BONUS: f64 = 20.0;
pub(crate) const EXPOSURE_FAN_RETENTION: f64 = 0.8;
pub(crate) const EXPOSURE_MENTAL_PENALTY: f64 = 40.0;
pub(crate) const EXPOSURE_REPUTATION_PENALTY: f64 = 5.0;
pub(crate) const COMPLEMENTARY_AFFINITY_BONUS: f64 = 2.0;

// Scandals -------------------------------------------------------------------
pub(crate) const SCANDAL_MENTAL_DIVISOR: f64 = 20.0;
pub(crate) const SCANDAL_CRITICAL_REMOVAL_REPUTATION: f64 = 10.0;
pub(crate) const SCANDAL_CRITICAL_SENTIMENT: f64 = 40.0;
pub(crate) const SCANDAL_CRITICAL_FAN_RETENTION: f64 = 0.5;
pub(crate) const SCANDAL_CRITICAL_REPUTATION: f64 = 3.0;
pub(crate) const SCANDAL_MAJOR_SENTIMENT: f64 = 15.0;
pub(crate) const SCANDAL_MAJOR_REPUTATION: f64 = 2.0;
pub(crate) const SCANDAL_MINOR_SENTIMENT: f64 = 5.0;
pub(crate) const BREAKTHROUGH_SKILL_GAIN: f64 = 3.0;

// Releases -------------------------------------------------------------------
pub const REFERENCE_ALBUM_PRICE: i64 = 20_000;
pub const ALBUM_PRODUCTION_COST: i64 = 200_000;
pub const RELEASE_COOLDOWN_WEEKS: i64 = 13;
pub(crate) const QUALITY_FACTOR_MIN: f64 = 0.8;
pub(crate) const QUALITY_FACTOR_SPAN: f64 = 0.4;
pub(crate) const ELASTICITY_EXPONENT: f64 = 2.0;
pub(crate) const SALES_REPUTATION_EXPONENT: f64 = 1.6;
pub(crate) const SALES_SCALE: f64 = 0.8;
pub(crate) const SALES_NOISE_PER_REPUTATION: f64 = 15.0;
pub(crate) const CHART_NOISE_SPAN: f64 = 10.0;
pub(crate) const BREAKOUT_QUALITY: f64 = 92.0;
pub(crate) const BREAKOUT_REPUTATION: f64 = 88.0;
pub(crate) const BREAKOUT_ELASTICITY: f64 = 0.95;
pub(crate) const SETTLE_QUALITY_DIVISOR: f64 = 40.0;
pub(crate) const OVERPRICE_REPUTATION_PENALTY: f64 = 12.0;
pub(crate) const UNDERPRICE_REPUTATION_BONUS: f64 = 6.0;
pub(crate) const OVERPRICE_FAME_MULT: f64 = 0.6;
pub(crate) const UNDERPRICE_FAME_MULT: f64 = 1.4;
pub(crate) const SALES_PER_NEW_FAN: f64 = 120.0;
pub(crate) const PROMOTION_STAMINA_COST: f64 = 45.0;
pub(crate) const PROMOTION_MENTAL_COST: f64 = 35.0;
pub(crate) const PRICE_RESISTANCE_RATIO: f64 = 1.2;
pub(crate) const PRICE_PRAISE_RATIO: f64 = 0.8;
pub(crate) const CHART_RUN_SALES_SHARE: [f64; DAYS_PER_WEEK] = [0.45, 0.2, 0.12, 0.08, 0.06, 0.05, 0.04];

// Ranking --------------------------------------------------------------------
pub(crate) const RANKING_FAN_WEIGHT: f64 = 0.5;
pub(crate) const RANKING_REPUTATION_WEIGHT: f64 = 150.0;
pub(crate) const RIVAL_NOISE_SPAN: f64 = 500.0;

// Agency ---------------------------------------------------------------------
pub const STARTING_FUNDS: i64 = 500_000;
pub const STARTING_REPUTATION: f64 = 10.0;
pub(crate) const MAX_FACILITY_LEVEL: u8 = 10;
pub(crate) const FACILITY_UPGRADE_REPUTATION: f64 = 1.0;
pub(crate) const RENEWAL_BASE_COST: f64 = 50_000.0;
pub(crate) const RENEWAL_COST_PER_FAN: f64 = 20.0;
pub(crate) const RENEWAL_COST_PER_SKILL_POINT: f64 = 1_000.0;
pub(crate) const EVENT_DECLINE_REPUTATION: f64 = 1.0;
pub(crate) const RECRUIT_MAX_SCANDAL_RISK: f64 = 30.0;
