//! Append-only record of resolved turns.
use serde::{Deserialize, Serialize};

use crate::data::{EffectVector, EventDefinition};
use crate::state::SimulationState;

/// One resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Month in which the decision was made.
    pub month: u32,
    pub event: EventDefinition,
    pub option_index: usize,
    pub option_text: String,
    pub effect: EffectVector,
    /// State after the decision resolved.
    pub result: SimulationState,
}

impl HistoryEntry {
    #[must_use]
    pub fn event_id(&self) -> &str {
        &self.event.id
    }
}

/// Ordered turn log. Only the session appends or clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Entry before the most recent one, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&HistoryEntry> {
        self.entries.len().checked_sub(2).map(|idx| &self.entries[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
