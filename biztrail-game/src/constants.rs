//! Centralized balance and tuning constants for Business Trail simulation logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that balance can only be adjusted via
//! code changes reviewed in version control, rather than through the
//! JSON catalog assets.

// Effect interpretation ----------------------------------------------------
/// Revenue/expense deltas at or above this magnitude are absolute currency amounts.
pub const ABSOLUTE_DELTA_THRESHOLD: f64 = 1_000.0;
pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;

// Coupling -----------------------------------------------------------------
/// Revenue multiplier gained per satisfaction point this turn.
pub const SATISFACTION_REVENUE_COUPLING: f64 = 0.002;
/// Churn multiplier shed per quality point this turn.
pub const QUALITY_CHURN_COUPLING: f64 = 0.01;

// Rounding -----------------------------------------------------------------
pub const CURRENCY_DECIMALS: i32 = 2;

// Default seed -------------------------------------------------------------
pub const DEFAULT_CASH: f64 = 850_000.0;
pub const DEFAULT_REVENUE: f64 = 75_000.0;
pub const DEFAULT_EXPENSES: f64 = 45_000.0;
pub const DEFAULT_CUSTOMERS: i64 = 377;
pub const DEFAULT_CHURN_RATE: f64 = 2.5;
pub const DEFAULT_CUSTOMER_SATISFACTION: f64 = 85.0;
pub const DEFAULT_PRODUCT_QUALITY: f64 = 80.0;
pub const DEFAULT_MARKETING_EFFICIENCY: f64 = 70.0;
pub const DEFAULT_TEAM_SIZE: u32 = 15;
pub const DEFAULT_MARKET_SHARE: f64 = 8.0;
pub const DEFAULT_COMPETITOR_PRESSURE: f64 = 50.0;
pub const FIRST_MONTH: u32 = 1;

// Dashboard metric names ---------------------------------------------------
pub(crate) const METRIC_CASH_ON_HAND: &str = "Cash on Hand";
pub(crate) const METRIC_MRR: &str = "MRR";
pub(crate) const METRIC_OPERATING_EXPENSES: &str = "Operating Expenses";
pub(crate) const METRIC_PAYING_CUSTOMERS: &str = "Paying Customers";
pub(crate) const METRIC_CHURN_RATE: &str = "Churn Rate";

// Trend & advisories -------------------------------------------------------
pub(crate) const TREND_OPENING_PROFITABLE: f64 = 10.0;
pub(crate) const TREND_OPENING_FLAT: f64 = 0.0;
pub(crate) const TREND_FROM_ZERO: f64 = 100.0;
pub(crate) const MOOD_PANIC_THRESHOLD: f64 = -20.0;
pub(crate) const MOOD_HAPPY_THRESHOLD: f64 = 5.0;
/// Runway below this many months raises the low-runway warning.
pub(crate) const LOW_RUNWAY_MONTHS: f64 = 3.0;
/// Churn above this percentage is flagged on the dashboard.
pub(crate) const HIGH_CHURN_RATE: f64 = 5.0;

// Quiz ---------------------------------------------------------------------
/// Points awarded for each question answered correctly.
pub const POINTS_PER_CORRECT_ANSWER: u32 = 10;

// Catalog shape ------------------------------------------------------------
pub(crate) const MIN_OPTIONS_PER_EVENT: usize = 2;
pub(crate) const MAX_OPTIONS_PER_EVENT: usize = 3;
