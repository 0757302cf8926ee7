//! Effect resolution: turns a chosen option into next month's state.
//!
//! Every recognized metric declares how its delta is interpreted
//! ([`DeltaRule`]). Direct deltas are applied first, then the coupling
//! pass runs on unrounded values, and only the final snapshot is rounded.
use serde::{Deserialize, Serialize};

use crate::constants::{
    ABSOLUTE_DELTA_THRESHOLD, PERCENT_MAX, PERCENT_MIN, QUALITY_CHURN_COUPLING,
    SATISFACTION_REVENUE_COUPLING,
};
use crate::data::EffectVector;
use crate::numbers::{i64_to_f64, round_currency, round_f64_to_i64, round_f64_to_u32};
use crate::state::SimulationState;

/// Metrics an effect vector may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Cash,
    Revenue,
    Expenses,
    Customers,
    ChurnRate,
    CustomerSatisfaction,
    ProductQuality,
    MarketingEfficiency,
    TeamSize,
    MarketShare,
    CompetitorPressure,
}

/// How a metric's delta is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaRule {
    /// Additive points, clamped to [0, 100].
    BoundedPoints,
    /// Additive points without bounds.
    Points,
    /// Additive whole headcount, floored at zero.
    Headcount,
    /// Absolute currency when `|delta| >= 1000`, otherwise percent of current value.
    Scaled,
    /// Percent of the current value.
    Proportional,
    /// One-time cash movement, outside the monthly cash flow.
    OneTime,
}

impl Metric {
    pub const ALL: [Self; 11] = [
        Self::Cash,
        Self::Revenue,
        Self::Expenses,
        Self::Customers,
        Self::ChurnRate,
        Self::CustomerSatisfaction,
        Self::ProductQuality,
        Self::MarketingEfficiency,
        Self::TeamSize,
        Self::MarketShare,
        Self::CompetitorPressure,
    ];

    #[must_use]
    pub const fn rule(self) -> DeltaRule {
        match self {
            Self::Cash => DeltaRule::OneTime,
            Self::Revenue | Self::Expenses => DeltaRule::Scaled,
            Self::Customers => DeltaRule::Proportional,
            Self::ChurnRate => DeltaRule::Points,
            Self::TeamSize => DeltaRule::Headcount,
            Self::CustomerSatisfaction
            | Self::ProductQuality
            | Self::MarketingEfficiency
            | Self::MarketShare
            | Self::CompetitorPressure => DeltaRule::BoundedPoints,
        }
    }

    /// Key used in catalog data and serialized state.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Revenue => "revenue",
            Self::Expenses => "expenses",
            Self::Customers => "customers",
            Self::ChurnRate => "churnRate",
            Self::CustomerSatisfaction => "customerSatisfaction",
            Self::ProductQuality => "productQuality",
            Self::MarketingEfficiency => "marketingEfficiency",
            Self::TeamSize => "teamSize",
            Self::MarketShare => "marketShare",
            Self::CompetitorPressure => "competitorPressure",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Unrounded working copy used while a turn is resolved.
#[derive(Debug, Clone)]
struct Ledger {
    cash: f64,
    revenue: f64,
    expenses: f64,
    customers: f64,
    churn_rate: f64,
    customer_satisfaction: f64,
    product_quality: f64,
    marketing_efficiency: f64,
    team_size: f64,
    market_share: f64,
    competitor_pressure: f64,
    one_time_cash: f64,
}

impl Ledger {
    fn open(state: &SimulationState) -> Self {
        Self {
            cash: state.cash,
            revenue: state.revenue,
            expenses: state.expenses,
            customers: state.exact_customers(),
            churn_rate: state.churn_rate,
            customer_satisfaction: state.customer_satisfaction,
            product_quality: state.product_quality,
            marketing_efficiency: state.marketing_efficiency,
            team_size: f64::from(state.team_size),
            market_share: state.market_share,
            competitor_pressure: state.competitor_pressure,
            one_time_cash: 0.0,
        }
    }

    fn slot(&mut self, metric: Metric) -> &mut f64 {
        match metric {
            Metric::Cash => &mut self.one_time_cash,
            Metric::Revenue => &mut self.revenue,
            Metric::Expenses => &mut self.expenses,
            Metric::Customers => &mut self.customers,
            Metric::ChurnRate => &mut self.churn_rate,
            Metric::CustomerSatisfaction => &mut self.customer_satisfaction,
            Metric::ProductQuality => &mut self.product_quality,
            Metric::MarketingEfficiency => &mut self.marketing_efficiency,
            Metric::TeamSize => &mut self.team_size,
            Metric::MarketShare => &mut self.market_share,
            Metric::CompetitorPressure => &mut self.competitor_pressure,
        }
    }

    fn apply_delta(&mut self, metric: Metric, delta: f64) {
        if !delta.is_finite() {
            log::trace!("ignoring non-finite {metric} delta");
            return;
        }
        let slot = self.slot(metric);
        *slot = match metric.rule() {
            DeltaRule::BoundedPoints => clamp_percent(*slot + delta),
            DeltaRule::Points | DeltaRule::OneTime => *slot + delta,
            DeltaRule::Headcount => (*slot + delta.round()).max(0.0),
            DeltaRule::Scaled => *slot + scaled_delta(*slot, delta),
            DeltaRule::Proportional => *slot + *slot * delta / 100.0,
        };
    }
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

/// Resolve a revenue/expense delta against the current amount.
///
/// Magnitudes of at least [`ABSOLUTE_DELTA_THRESHOLD`] are budget items
/// added as-is; anything smaller is a percentage of `current`.
#[must_use]
pub fn scaled_delta(current: f64, delta: f64) -> f64 {
    if delta.abs() >= ABSOLUTE_DELTA_THRESHOLD {
        delta
    } else {
        current * delta / 100.0
    }
}

/// Compute the state that follows `state` once `effect` is chosen.
///
/// Pure: the input is never modified. Keys absent from the effect leave
/// their metric as-is; the monthly cash flow, churn attrition and month
/// advance happen on every call.
#[must_use]
pub fn apply(state: &SimulationState, effect: &EffectVector) -> SimulationState {
    let mut ledger = Ledger::open(state);
    for (metric, delta) in effect.deltas() {
        ledger.apply_delta(metric, delta);
    }

    let satisfaction_change = ledger.customer_satisfaction - state.customer_satisfaction;
    let quality_change = ledger.product_quality - state.product_quality;

    ledger.revenue *= 1.0 + satisfaction_change * SATISFACTION_REVENUE_COUPLING;
    ledger.churn_rate *= 1.0 - quality_change * QUALITY_CHURN_COUPLING;
    // Negative churn never grows the base.
    ledger.customers *= 1.0 - ledger.churn_rate.max(0.0) / 100.0;
    ledger.cash = state.cash + ledger.one_time_cash + (ledger.revenue - ledger.expenses);

    let customers = round_f64_to_i64(ledger.customers);
    SimulationState {
        cash: round_currency(ledger.cash),
        revenue: round_currency(ledger.revenue),
        expenses: round_currency(ledger.expenses),
        customers,
        churn_rate: round_currency(ledger.churn_rate),
        customer_satisfaction: round_currency(clamp_percent(ledger.customer_satisfaction)),
        product_quality: round_currency(clamp_percent(ledger.product_quality)),
        marketing_efficiency: round_currency(clamp_percent(ledger.marketing_efficiency)),
        team_size: round_f64_to_u32(ledger.team_size),
        market_share: round_currency(clamp_percent(ledger.market_share)),
        competitor_pressure: round_currency(clamp_percent(ledger.competitor_pressure)),
        month: state.month.saturating_add(1),
        customer_carry: if customers > 0 {
            ledger.customers.max(0.0) - i64_to_f64(customers)
        } else {
            0.0
        },
    }
}
