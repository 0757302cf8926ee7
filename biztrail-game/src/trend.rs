//! Profit trend and the presentation projections derived from it.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    HIGH_CHURN_RATE, LOW_RUNWAY_MONTHS, MOOD_HAPPY_THRESHOLD, MOOD_PANIC_THRESHOLD,
    TREND_FROM_ZERO, TREND_OPENING_FLAT, TREND_OPENING_PROFITABLE,
};
use crate::history::HistoryLog;
use crate::state::SimulationState;

/// Percent change in monthly profit between the last two resolved states.
///
/// With no history the trend is a fixed opening value. With a single entry
/// the seed state stands in for the previous month.
#[must_use]
pub fn profit_trend(seed: &SimulationState, history: &HistoryLog) -> f64 {
    let Some(last) = history.last() else {
        return if seed.profit() > 0.0 {
            TREND_OPENING_PROFITABLE
        } else {
            TREND_OPENING_FLAT
        };
    };
    let previous = history.previous().map_or(seed, |entry| &entry.result).profit();
    let current = last.result.profit();
    if previous == 0.0 {
        if current > 0.0 {
            TREND_FROM_ZERO
        } else {
            -TREND_FROM_ZERO
        }
    } else {
        (current - previous) / previous.abs() * 100.0
    }
}

/// Mascot mood shown next to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Dead,
    Panicked,
    Worried,
    Neutral,
    Happy,
}

impl Mood {
    #[must_use]
    pub fn classify(trend: f64, ended: bool) -> Self {
        if ended {
            Self::Dead
        } else if trend <= MOOD_PANIC_THRESHOLD {
            Self::Panicked
        } else if trend < 0.0 {
            Self::Worried
        } else if trend >= MOOD_HAPPY_THRESHOLD {
            Self::Happy
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Dead => "dead",
            Self::Panicked => "panicked",
            Self::Worried => "worried",
            Self::Neutral => "neutral",
            Self::Happy => "happy",
        };
        f.write_str(label)
    }
}

/// Months of cash left at the current burn; `None` while profitable.
#[must_use]
pub fn runway_months(state: &SimulationState) -> Option<f64> {
    let burn = -state.profit();
    (burn > 0.0).then(|| state.cash.max(0.0) / burn)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Advisory {
    LowRunway { months: f64 },
    HighChurn { churn_rate: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowRunway { months } => {
                write!(f, "runway is {months:.1} months; cut burn or raise cash")
            }
            Self::HighChurn { churn_rate } => {
                write!(f, "churn is {churn_rate:.2}% per month; invest in retention")
            }
        }
    }
}

/// Warnings worth surfacing for `state`.
#[must_use]
pub fn advisories(state: &SimulationState) -> Vec<Advisory> {
    let mut out = Vec::new();
    if let Some(months) = runway_months(state)
        && months < LOW_RUNWAY_MONTHS
    {
        out.push(Advisory::LowRunway { months });
    }
    if state.churn_rate > HIGH_CHURN_RATE {
        out.push(Advisory::HighChurn {
            churn_rate: state.churn_rate,
        });
    }
    out
}
