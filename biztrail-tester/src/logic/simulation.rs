use anyhow::{Context, Result};
use biztrail_game::{CatalogLoader, SeedSource, SessionPhase, SimulationEngine, TerminalReason};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};

/// Default cap on months per playthrough.
pub const DEFAULT_MAX_MONTHS: u32 = 120;

/// Configuration for a single automated playthrough.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub max_months: u32,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            max_months: DEFAULT_MAX_MONTHS,
        }
    }

    #[must_use]
    pub fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }
}

/// How a playthrough finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaythroughEnding {
    CashDepleted,
    CustomersLost,
    Survived,
}

impl From<Option<TerminalReason>> for PlaythroughEnding {
    fn from(reason: Option<TerminalReason>) -> Self {
        match reason {
            Some(TerminalReason::CashDepleted) => Self::CashDepleted,
            Some(TerminalReason::CustomersLost) => Self::CustomersLost,
            None => Self::Survived,
        }
    }
}

impl fmt::Display for PlaythroughEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CashDepleted => write!(f, "cash"),
            Self::CustomersLost => write!(f, "customers"),
            Self::Survived => write!(f, "survived"),
        }
    }
}

/// Snapshot of a resolved scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub month: u32,
    pub event_id: String,
    pub option_index: usize,
    pub option_text: String,
    pub rationale: Option<String>,
    pub cash_after: f64,
    pub customers_after: i64,
}

/// Outcome of one automated playthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaythroughRecord {
    pub strategy: GameplayStrategy,
    pub seed: u64,
    pub iteration: usize,
    pub session_seed: u64,
    pub months_played: usize,
    pub ending: PlaythroughEnding,
    pub final_cash: f64,
    pub final_customers: i64,
    pub final_market_share: f64,
    pub decisions: Vec<DecisionRecord>,
}

impl PlaythroughRecord {
    #[must_use]
    pub fn survived(&self) -> bool {
        self.ending == PlaythroughEnding::Survived
    }
}

/// Session seed for `iteration` of a base seed; iteration 0 uses the seed as-is.
#[must_use]
pub fn iteration_seed(seed: u64, iteration: usize) -> u64 {
    let step = u64::try_from(iteration).unwrap_or(u64::MAX);
    seed.wrapping_add(step.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play one session to its end or to the month cap.
///
/// # Errors
///
/// Returns an error if the engine cannot build a session or a policy picks
/// an option the session rejects.
pub fn run_playthrough<L, S>(
    engine: &SimulationEngine<L, S>,
    config: SimulationConfig,
    iteration: usize,
) -> Result<PlaythroughRecord>
where
    L: CatalogLoader,
    S: SeedSource,
{
    let session_seed = iteration_seed(config.seed, iteration);
    let mut session = engine
        .create_session(session_seed)
        .with_context(|| format!("creating session for seed {session_seed}"))?;
    let mut policy: Box<dyn PlayerPolicy + Send> =
        config.strategy.create_policy(session_seed.rotate_left(17));
    let mut decisions = Vec::new();

    for _ in 0..config.max_months {
        if session.phase() != SessionPhase::Active {
            break;
        }
        let Some(event) = session.current_event().cloned() else {
            break;
        };
        let decision = policy.pick_option(session.state(), &event);
        let outcome = session.choose(decision.option_index).with_context(|| {
            format!(
                "{} picked option {} for {}",
                policy.name(),
                decision.option_index,
                event.id
            )
        })?;
        log::debug!(
            "[{} seed {}] month {}: {} -> {}",
            config.strategy,
            config.seed,
            outcome.month,
            event.id,
            decision.option_index
        );
        decisions.push(DecisionRecord {
            month: outcome.month,
            event_id: event.id.clone(),
            option_index: decision.option_index,
            option_text: event.options[decision.option_index].text.clone(),
            rationale: decision.rationale,
            cash_after: outcome.state.cash,
            customers_after: outcome.state.customers,
        });
    }

    let state = session.state();
    Ok(PlaythroughRecord {
        strategy: config.strategy,
        seed: config.seed,
        iteration,
        session_seed,
        months_played: decisions.len(),
        ending: PlaythroughEnding::from(session.terminal_reason()),
        final_cash: state.cash,
        final_customers: state.customers,
        final_market_share: state.market_share,
        decisions,
    })
}

/// Per-strategy rollup of playthroughs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyAggregate {
    pub strategy: GameplayStrategy,
    pub runs: usize,
    pub survival_rate: f64,
    pub mean_months: f64,
    pub mean_final_cash: f64,
    pub cash_endings: usize,
    pub customer_endings: usize,
    pub survived: usize,
}

/// Group records by strategy, in strategy order.
#[must_use]
pub fn aggregate_records(records: &[PlaythroughRecord]) -> Vec<StrategyAggregate> {
    GameplayStrategy::ALL
        .into_iter()
        .filter_map(|strategy| {
            let runs: Vec<&PlaythroughRecord> =
                records.iter().filter(|r| r.strategy == strategy).collect();
            if runs.is_empty() {
                return None;
            }
            let count = |ending: PlaythroughEnding| runs.iter().filter(|r| r.ending == ending).count();
            let survived = count(PlaythroughEnding::Survived);
            Some(StrategyAggregate {
                strategy,
                runs: runs.len(),
                survival_rate: ratio(survived, runs.len()) * 100.0,
                mean_months: mean(runs.iter().map(|r| usize_to_f64(r.months_played))),
                mean_final_cash: mean(runs.iter().map(|r| r.final_cash)),
                cash_endings: count(PlaythroughEnding::CashDepleted),
                customer_endings: count(PlaythroughEnding::CustomersLost),
                survived,
            })
        })
        .collect()
}

fn usize_to_f64(value: usize) -> f64 {
    biztrail_game::numbers::i64_to_f64(i64::try_from(value).unwrap_or(i64::MAX))
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        usize_to_f64(part) / usize_to_f64(whole)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0_usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / usize_to_f64(n) }
}
