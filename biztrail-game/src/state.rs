//! Company health record and the seed data that initializes it.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CASH, DEFAULT_CHURN_RATE, DEFAULT_COMPETITOR_PRESSURE, DEFAULT_CUSTOMER_SATISFACTION,
    DEFAULT_CUSTOMERS, DEFAULT_EXPENSES, DEFAULT_MARKET_SHARE, DEFAULT_MARKETING_EFFICIENCY,
    DEFAULT_PRODUCT_QUALITY, DEFAULT_REVENUE, DEFAULT_TEAM_SIZE, FIRST_MONTH, METRIC_CASH_ON_HAND,
    METRIC_CHURN_RATE, METRIC_MRR, METRIC_OPERATING_EXPENSES, METRIC_PAYING_CUSTOMERS,
};
use crate::numbers::{i64_to_f64, round_f64_to_i64};

/// Canonical record of company health for one simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub cash: f64,
    pub revenue: f64,
    pub expenses: f64,
    pub customers: i64,
    pub churn_rate: f64,
    pub customer_satisfaction: f64,
    pub product_quality: f64,
    pub marketing_efficiency: f64,
    pub team_size: u32,
    pub market_share: f64,
    pub competitor_pressure: f64,
    pub month: u32,
    /// Fraction of a customer not yet reflected in `customers`.
    ///
    /// Churn keeps attriting through this carry when a single turn's loss
    /// rounds away. Kept out of the serialized record.
    #[serde(skip)]
    pub customer_carry: f64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            cash: DEFAULT_CASH,
            revenue: DEFAULT_REVENUE,
            expenses: DEFAULT_EXPENSES,
            customers: DEFAULT_CUSTOMERS,
            churn_rate: DEFAULT_CHURN_RATE,
            customer_satisfaction: DEFAULT_CUSTOMER_SATISFACTION,
            product_quality: DEFAULT_PRODUCT_QUALITY,
            marketing_efficiency: DEFAULT_MARKETING_EFFICIENCY,
            team_size: DEFAULT_TEAM_SIZE,
            market_share: DEFAULT_MARKET_SHARE,
            competitor_pressure: DEFAULT_COMPETITOR_PRESSURE,
            month: FIRST_MONTH,
            customer_carry: 0.0,
        }
    }
}

impl SimulationState {
    /// Monthly operating profit (negative while burning cash).
    #[must_use]
    pub fn profit(&self) -> f64 {
        self.revenue - self.expenses
    }

    #[must_use]
    pub fn is_cash_depleted(&self) -> bool {
        self.cash <= 0.0
    }

    #[must_use]
    pub fn has_no_customers(&self) -> bool {
        self.customers <= 0
    }

    /// Customer count including the unrounded carry.
    #[must_use]
    pub fn exact_customers(&self) -> f64 {
        i64_to_f64(self.customers) + self.customer_carry
    }

    /// Whether this state ends a session.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_cash_depleted() || self.has_no_customers()
    }
}

/// Partially specified starting state; missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedState {
    pub cash: Option<f64>,
    pub revenue: Option<f64>,
    pub expenses: Option<f64>,
    pub customers: Option<i64>,
    pub churn_rate: Option<f64>,
    pub customer_satisfaction: Option<f64>,
    pub product_quality: Option<f64>,
    pub marketing_efficiency: Option<f64>,
    pub team_size: Option<u32>,
    pub market_share: Option<f64>,
    pub competitor_pressure: Option<f64>,
    pub month: Option<u32>,
}

impl SeedState {
    /// Resolve the seed into a full state, filling gaps with defaults.
    #[must_use]
    pub fn into_state(self) -> SimulationState {
        let defaults = SimulationState::default();
        SimulationState {
            cash: self.cash.unwrap_or(defaults.cash),
            revenue: self.revenue.unwrap_or(defaults.revenue),
            expenses: self.expenses.unwrap_or(defaults.expenses),
            customers: self.customers.unwrap_or(defaults.customers),
            churn_rate: self.churn_rate.unwrap_or(defaults.churn_rate),
            customer_satisfaction: self
                .customer_satisfaction
                .unwrap_or(defaults.customer_satisfaction),
            product_quality: self.product_quality.unwrap_or(defaults.product_quality),
            marketing_efficiency: self
                .marketing_efficiency
                .unwrap_or(defaults.marketing_efficiency),
            team_size: self.team_size.unwrap_or(defaults.team_size),
            market_share: self.market_share.unwrap_or(defaults.market_share),
            competitor_pressure: self
                .competitor_pressure
                .unwrap_or(defaults.competitor_pressure),
            month: self.month.unwrap_or(defaults.month),
            customer_carry: 0.0,
        }
    }

    /// Build a seed from dashboard metric records.
    ///
    /// Only the cash, MRR, operating expenses, paying customers and churn
    /// metrics feed the simulation; every other record is ignored and the
    /// remaining fields stay unset.
    #[must_use]
    pub fn from_metric_records(records: &[MetricRecord]) -> Self {
        let find = |name: &str| {
            records
                .iter()
                .find(|record| record.metric_name == name)
                .map(|record| record.value)
        };
        Self {
            cash: find(METRIC_CASH_ON_HAND),
            revenue: find(METRIC_MRR),
            expenses: find(METRIC_OPERATING_EXPENSES),
            customers: find(METRIC_PAYING_CUSTOMERS).map(round_f64_to_i64),
            churn_rate: find(METRIC_CHURN_RATE),
            ..Self::default()
        }
    }

    /// Parse dashboard metric records from JSON and build a seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of metric records.
    pub fn from_metrics_json(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<MetricRecord> = serde_json::from_str(json)?;
        Ok(Self::from_metric_records(&records))
    }
}

impl From<SimulationState> for SeedState {
    fn from(state: SimulationState) -> Self {
        Self {
            cash: Some(state.cash),
            revenue: Some(state.revenue),
            expenses: Some(state.expenses),
            customers: Some(state.customers),
            churn_rate: Some(state.churn_rate),
            customer_satisfaction: Some(state.customer_satisfaction),
            product_quality: Some(state.product_quality),
            marketing_efficiency: Some(state.marketing_efficiency),
            team_size: Some(state.team_size),
            market_share: Some(state.market_share),
            competitor_pressure: Some(state.competitor_pressure),
            month: Some(state.month),
        }
    }
}

/// A named metric as reported by the finance dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub metric_name: String,
    pub value: f64,
    #[serde(default)]
    pub category: Option<String>,
}
