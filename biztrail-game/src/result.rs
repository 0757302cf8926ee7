//! End-of-session summary shown on the game-over screen.
use serde::{Deserialize, Serialize};

use crate::session::{SimulationSession, TerminalReason};
use crate::trend::{Mood, profit_trend};

/// Game-over summary for an ended session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub reason: TerminalReason,
    pub headline: String,
    /// Month the company reached before failing.
    pub months_survived: u32,
    pub decisions: usize,
    pub final_cash: f64,
    pub final_customers: i64,
    pub market_share: f64,
    pub final_trend: f64,
    pub mood: Mood,
}

impl ResultSummary {
    /// Summarize `session`, or `None` while it has not ended.
    #[must_use]
    pub fn from_session(session: &SimulationSession) -> Option<Self> {
        let reason = session.terminal_reason()?;
        let state = session.state();
        Some(Self {
            reason,
            headline: headline(reason).to_string(),
            months_survived: state.month,
            decisions: session.history().len(),
            final_cash: state.cash,
            final_customers: state.customers,
            market_share: state.market_share,
            final_trend: profit_trend(session.seed_state(), session.history()),
            mood: Mood::Dead,
        })
    }
}

#[must_use]
pub const fn headline(reason: TerminalReason) -> &'static str {
    match reason {
        TerminalReason::CashDepleted => "Your company ran out of cash!",
        TerminalReason::CustomersLost => "Your customer base has completely churned!",
    }
}

impl std::fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.headline)?;
        writeln!(f, "Months survived: {}", self.months_survived)?;
        writeln!(f, "Final cash: ${:.2}", self.final_cash)?;
        writeln!(f, "Final customers: {}", self.final_customers)?;
        write!(f, "Market share: {:.1}%", self.market_share)
    }
}
