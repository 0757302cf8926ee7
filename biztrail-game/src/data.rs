//! Scenario catalog: effect vectors, options, events and their validation.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::{MAX_OPTIONS_PER_EVENT, MIN_OPTIONS_PER_EVENT};
use crate::effects::Metric;

const STANDARD_CATALOG_DATA: &str = include_str!("../data/events.json");

/// Deltas applied when an option is selected.
///
/// Keys absent from the vector leave the metric untouched. Unknown keys in
/// catalog data are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EffectVector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_satisfaction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_share: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EffectVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and programmatic catalogs.
    #[must_use]
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, value);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        *self.slot_mut(metric) = Some(value);
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cash => self.cash,
            Metric::Revenue => self.revenue,
            Metric::Expenses => self.expenses,
            Metric::Customers => self.customers,
            Metric::ChurnRate => self.churn_rate,
            Metric::CustomerSatisfaction => self.customer_satisfaction,
            Metric::ProductQuality => self.product_quality,
            Metric::MarketingEfficiency => self.marketing_efficiency,
            Metric::TeamSize => self.team_size,
            Metric::MarketShare => self.market_share,
            Metric::CompetitorPressure => self.competitor_pressure,
        }
    }

    fn slot_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Cash => &mut self.cash,
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

    /// Present deltas in declaration order.
    pub fn deltas(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .iter()
            .filter_map(|metric| self.get(*metric).map(|value| (*metric, value)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas().next().is_none()
    }
}

/// One mutually exclusive response to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub text: String,
    #[serde(default)]
    pub effect: EffectVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventOption {
    #[must_use]
    pub fn new(text: impl Into<String>, effect: EffectVector) -> Self {
        Self {
            text: text.into(),
            effect,
            description: None,
        }
    }

    /// Human-readable consequence, preferring the option-level text.
    #[must_use]
    pub fn consequence(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.effect.description.as_deref())
    }
}

/// A scenario presented to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub options: Vec<EventOption>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("event catalog must contain at least one event")]
    Empty,
    #[error("duplicate event id {id:?}")]
    DuplicateId { id: String },
    #[error("event {id:?} has {count} options (expected 2-3)")]
    OptionCount { id: String, count: usize },
    #[error("question {id:?} marks option {correct} correct but has {count} options")]
    AnswerOutOfRange {
        id: String,
        correct: usize,
        count: usize,
    },
    #[error("failed to parse event catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    events: Vec<EventDefinition>,
}

impl TryFrom<CatalogDocument> for EventCatalog {
    type Error = CatalogError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        Self::new(document.events)
    }
}

/// Shared shape checks: non-empty, unique ids, 2-3 options per event.
pub(crate) fn validate_events<'a, I>(events: I) -> Result<(), CatalogError>
where
    I: IntoIterator<Item = &'a EventDefinition>,
{
    let mut seen = HashSet::new();
    for event in events {
        if !seen.insert(event.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                id: event.id.clone(),
            });
        }
        let count = event.options.len();
        if !(MIN_OPTIONS_PER_EVENT..=MAX_OPTIONS_PER_EVENT).contains(&count) {
            return Err(CatalogError::OptionCount {
                id: event.id.clone(),
                count,
            });
        }
    }
    if seen.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(())
}

/// Validated, read-only collection of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct EventCatalog {
    events: Vec<EventDefinition>,
}

impl EventCatalog {
    /// Build a catalog from event definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, an id repeats, or an event
    /// offers fewer than two or more than three options.
    pub fn new(events: Vec<EventDefinition>) -> Result<Self, CatalogError> {
        validate_events(&events)?;
        Ok(Self { events })
    }

    /// Load a catalog from a JSON document of the form `{"events": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::try_from(document)
    }

    /// Load the ten-scenario catalog embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset is malformed.
    pub fn load_standard() -> Result<Self, CatalogError> {
        Self::from_json(STANDARD_CATALOG_DATA)
    }

    #[must_use]
    pub fn events(&self) -> &[EventDefinition] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Always false for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EventDefinition> {
        self.events.iter().find(|event| event.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str) -> EventOption {
        EventOption::new(text, EffectVector::new().with(Metric::Cash, -1.0))
    }

    fn event(id: &str, options: usize) -> EventDefinition {
        EventDefinition {
            id: id.to_string(),
            title: format!("Event {id}"),
            description: String::new(),
            options: (0..options).map(|i| option(&format!("opt {i}"))).collect(),
        }
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "events": [
                {
                    "id": "price-war",
                    "title": "Price War",
                    "description": "A competitor cut prices.",
                    "options": [
                        {
                            "text": "Match prices",
                            "effect": { "revenue": -15, "marketShare": 5, "mood": 3 },
                            "description": "Margins shrink."
                        },
                        {
                            "text": "Hold",
                            "effect": { "marketShare": -5, "description": "Share slips." }
                        }
                    ]
                }
            ]
        }"#;

        let catalog = EventCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let event = catalog.get("price-war").unwrap();
        assert_eq!(event.options[0].effect.revenue, Some(-15.0));
        assert_eq!(event.options[0].effect.market_share, Some(5.0));
        assert_eq!(event.options[0].consequence(), Some("Margins shrink."));
        assert_eq!(event.options[1].consequence(), Some("Share slips."));
    }

    #[test]
    fn catalog_rejects_invalid_shapes() {
        assert!(matches!(EventCatalog::new(Vec::new()), Err(CatalogError::Empty)));
        assert!(matches!(
            EventCatalog::new(vec![event("a", 3), event("a", 2)]),
            Err(CatalogError::DuplicateId { id }) if id == "a"
        ));
        assert!(matches!(
            EventCatalog::new(vec![event("solo", 1)]),
            Err(CatalogError::OptionCount { count: 1, .. })
        ));
        assert!(matches!(
            EventCatalog::new(vec![event("wide", 4)]),
            Err(CatalogError::OptionCount { count: 4, .. })
        ));
        assert!(matches!(
            EventCatalog::from_json("{\"events\": 7}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn standard_catalog_covers_ten_scenarios() {
        let catalog = EventCatalog::load_standard().unwrap();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.events().iter().all(|event| event.options.len() == 3));
        assert!(
            catalog
                .events()
                .iter()
                .flat_map(|event| &event.options)
                .all(|option| !option.effect.is_empty() || option.consequence().is_some())
        );
    }

    #[test]
    fn effect_vector_tracks_present_keys() {
        let effect = EffectVector::new()
            .with(Metric::Revenue, -20.0)
            .with(Metric::MarketShare, 5.0);
        let keys: Vec<_> = effect.deltas().map(|(metric, _)| metric).collect();
        assert_eq!(keys, vec![Metric::Revenue, Metric::MarketShare]);
        assert!(EffectVector::new().is_empty());

        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json, serde_json::json!({"revenue": -20.0, "marketShare": 5.0}));
    }
}
