//! Session controller: owns the live state, current scenario and turn log.
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::FIRST_MONTH;
use crate::data::{EventCatalog, EventDefinition};
use crate::effects;
use crate::history::{HistoryEntry, HistoryLog};
use crate::selector;
use crate::state::SimulationState;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Uninitialized,
    Active,
    Ended,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitialized => "uninitialized",
            Self::Active => "active",
            Self::Ended => "ended",
        };
        f.write_str(label)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalReason {
    CashDepleted,
    CustomersLost,
}

impl TerminalReason {
    /// Classify a state; cash is checked before customers.
    #[must_use]
    pub fn of(state: &SimulationState) -> Option<Self> {
        if state.is_cash_depleted() {
            Some(Self::CashDepleted)
        } else if state.has_no_customers() {
            Some(Self::CustomersLost)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CashDepleted => "cash_depleted",
            Self::CustomersLost => "customers_lost",
        }
    }
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CashDepleted => "cash depleted",
            Self::CustomersLost => "customers lost",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("option {index} is out of range ({available} available)")]
    InvalidChoice { index: usize, available: usize },
    #[error("cannot {operation} while the session is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },
}

/// Result of one successful `choose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    /// Month in which the decision was made.
    pub month: u32,
    pub event_id: String,
    pub option_index: usize,
    pub state: SimulationState,
    pub phase: SessionPhase,
    pub terminal_reason: Option<TerminalReason>,
}

impl TurnOutcome {
    #[must_use]
    pub fn ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }
}

/// A single playthrough over a fixed catalog.
///
/// The session is the only writer of its state and history. Randomness comes
/// from a `ChaCha20Rng` seeded at construction so replays are deterministic;
/// the stream carries across restarts.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    catalog: EventCatalog,
    rng: ChaCha20Rng,
    rng_seed: u64,
    phase: SessionPhase,
    seed_state: SimulationState,
    state: SimulationState,
    current_event: Option<usize>,
    history: HistoryLog,
    terminal_reason: Option<TerminalReason>,
}

impl SimulationSession {
    #[must_use]
    pub fn new(catalog: EventCatalog, rng_seed: u64) -> Self {
        Self {
            catalog,
            rng: ChaCha20Rng::seed_from_u64(rng_seed),
            rng_seed,
            phase: SessionPhase::Uninitialized,
            seed_state: SimulationState::default(),
            state: SimulationState::default(),
            current_event: None,
            history: HistoryLog::default(),
            terminal_reason: None,
        }
    }

    /// Begin a playthrough from `seed`. The month always restarts at 1.
    pub fn start(&mut self, seed: SimulationState) {
        let state = SimulationState {
            month: FIRST_MONTH,
            ..seed
        };
        self.seed_state = state.clone();
        self.state = state;
        self.history.clear();
        self.terminal_reason = None;
        self.current_event = Some(self.draw_event(None));
        self.phase = SessionPhase::Active;
        log::info!(
            "session started (rng seed {}, cash {:.2}, customers {})",
            self.rng_seed,
            self.state.cash,
            self.state.customers
        );
    }

    /// Discard the current playthrough and begin again from `seed`.
    pub fn restart(&mut self, seed: SimulationState) {
        log::info!(
            "restarting session after {} decision(s) in phase {}",
            self.history.len(),
            self.phase
        );
        self.start(seed);
    }

    /// Resolve the current scenario with the option at `option_index`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the session is active and
    /// [`SessionError::InvalidChoice`] when the index is out of range. On
    /// error the session is left unchanged.
    pub fn choose(&mut self, option_index: usize) -> Result<TurnOutcome, SessionError> {
        let event_idx = match (self.phase, self.current_event) {
            (SessionPhase::Active, Some(idx)) => idx,
            _ => {
                return Err(SessionError::InvalidState {
                    operation: "choose",
                    phase: self.phase,
                });
            }
        };
        let event = &self.catalog.events()[event_idx];
        let option = event
            .options
            .get(option_index)
            .ok_or(SessionError::InvalidChoice {
                index: option_index,
                available: event.options.len(),
            })?;

        let month = self.state.month;
        let next = effects::apply(&self.state, &option.effect);
        let entry = HistoryEntry {
            month,
            event: event.clone(),
            option_index,
            option_text: option.text.clone(),
            effect: option.effect.clone(),
            result: next.clone(),
        };
        log::debug!(
            "month {month}: {} -> option {option_index} (cash {:.2}, customers {})",
            event.id,
            next.cash,
            next.customers
        );
        let event_id = event.id.clone();

        self.history.push(entry);
        self.state = next;

        if let Some(reason) = TerminalReason::of(&self.state) {
            self.phase = SessionPhase::Ended;
            self.current_event = None;
            self.terminal_reason = Some(reason);
            log::info!(
                "session ended in month {} after {} decision(s): {reason}",
                self.state.month,
                self.history.len()
            );
        } else {
            self.current_event = Some(self.draw_event(Some(&event_id)));
        }

        Ok(TurnOutcome {
            month,
            event_id,
            option_index,
            state: self.state.clone(),
            phase: self.phase,
            terminal_reason: self.terminal_reason,
        })
    }

    fn draw_event(&mut self, previous_id: Option<&str>) -> usize {
        let picked = selector::next(&self.catalog, previous_id, &mut self.rng);
        let id = picked.id.clone();
        self.catalog
            .events()
            .iter()
            .position(|event| event.id == id)
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Scenario awaiting a decision; `None` unless the session is active.
    #[must_use]
    pub fn current_event(&self) -> Option<&EventDefinition> {
        self.current_event
            .and_then(|idx| self.catalog.events().get(idx))
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryLog {
        &self.history
    }

    #[must_use]
    pub const fn terminal_reason(&self) -> Option<TerminalReason> {
        self.terminal_reason
    }

    /// State the current playthrough started from.
    #[must_use]
    pub const fn seed_state(&self) -> &SimulationState {
        &self.seed_state
    }

    #[must_use]
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }
}
