//! Business Trail Simulation Engine
//!
//! Platform-agnostic core of the turn-based business survival game: a company
//! starts from seeded financials, faces one scenario per month, and lives with
//! the consequences until it runs out of cash or customers.
//! This crate provides all mechanics without UI or platform-specific dependencies.

pub mod constants;
pub mod data;
pub mod effects;
pub mod history;
pub mod numbers;
pub mod quiz;
pub mod result;
pub mod selector;
pub mod session;
pub mod state;
pub mod trend;

use std::convert::Infallible;
use thiserror::Error;

// Re-export commonly used types
pub use data::{CatalogError, EffectVector, EventCatalog, EventDefinition, EventOption};
pub use effects::{DeltaRule, Metric, apply};
pub use history::{HistoryEntry, HistoryLog};
pub use quiz::{QuizAnswer, QuizDeck, QuizOutcome, QuizQuestion, QuizSession};
pub use result::ResultSummary;
pub use session::{SessionError, SessionPhase, SimulationSession, TerminalReason, TurnOutcome};
pub use state::{MetricRecord, SeedState, SimulationState};
pub use trend::{Advisory, Mood, advisories, profit_trend, runway_months};

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the scenario catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<EventCatalog, Self::Error>;
}

/// Trait for abstracting where starting financials come from
pub trait SeedSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the seed for a new playthrough
    ///
    /// # Errors
    ///
    /// Returns an error if the seed data cannot be read.
    fn load_seed(&self) -> Result<SeedState, Self::Error>;
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load event catalog: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to load seed state: {0}")]
    Seed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The catalog embedded in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl CatalogLoader for StaticCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<EventCatalog, Self::Error> {
        EventCatalog::load_standard()
    }
}

/// Seeds every playthrough with the built-in default company.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSeed;

impl SeedSource for DefaultSeed {
    type Error = Infallible;

    fn load_seed(&self) -> Result<SeedState, Self::Error> {
        Ok(SeedState::default())
    }
}

/// Seeds from a JSON array of dashboard metric records.
#[derive(Debug, Clone, Default)]
pub struct MetricsSeed {
    json: String,
}

impl MetricsSeed {
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl SeedSource for MetricsSeed {
    type Error = serde_json::Error;

    fn load_seed(&self) -> Result<SeedState, Self::Error> {
        SeedState::from_metrics_json(&self.json)
    }
}

/// Main engine for creating simulation sessions
pub struct SimulationEngine<L, S>
where
    L: CatalogLoader,
    S: SeedSource,
{
    catalog_loader: L,
    seed_source: S,
}

impl<L, S> SimulationEngine<L, S>
where
    L: CatalogLoader,
    S: SeedSource,
{
    /// Create a new engine with the provided catalog loader and seed source
    pub const fn new(catalog_loader: L, seed_source: S) -> Self {
        Self {
            catalog_loader,
            seed_source,
        }
    }

    /// Create and start a session whose randomness derives from `rng_seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or seed cannot be loaded.
    pub fn create_session(&self, rng_seed: u64) -> Result<SimulationSession, EngineError> {
        let catalog = self
            .catalog_loader
            .load_catalog()
            .map_err(|err| EngineError::Catalog(Box::new(err)))?;
        let seed = self.load_seed()?;
        let mut session = SimulationSession::new(catalog, rng_seed);
        session.start(seed);
        Ok(session)
    }

    /// Start `session` over from freshly loaded seed data.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded; the session is then
    /// left as it was.
    pub fn restart_session(&self, session: &mut SimulationSession) -> Result<(), EngineError> {
        let seed = self.load_seed()?;
        session.restart(seed);
        Ok(())
    }

    fn load_seed(&self) -> Result<SimulationState, EngineError> {
        self.seed_source
            .load_seed()
            .map(SeedState::into_state)
            .map_err(|err| EngineError::Seed(Box::new(err)))
    }
}

impl Default for SimulationEngine<StaticCatalog, DefaultSeed> {
    fn default() -> Self {
        Self::new(StaticCatalog, DefaultSeed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fmt;

    #[derive(Debug)]
    struct Offline;

    impl fmt::Display for Offline {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("metrics service offline")
        }
    }

    impl std::error::Error for Offline {}

    #[derive(Default)]
    struct CountingSeed {
        loads: Cell<u32>,
    }

    impl SeedSource for CountingSeed {
        type Error = Infallible;

        fn load_seed(&self) -> Result<SeedState, Self::Error> {
            self.loads.set(self.loads.get() + 1);
            Ok(SeedState {
                cash: Some(f64::from(self.loads.get()) * 1_000_000.0),
                ..SeedState::default()
            })
        }
    }

    struct FailingSeed;

    impl SeedSource for FailingSeed {
        type Error = Offline;

        fn load_seed(&self) -> Result<SeedState, Self::Error> {
            Err(Offline)
        }
    }

    struct BrokenCatalog;

    impl CatalogLoader for BrokenCatalog {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<EventCatalog, Self::Error> {
            EventCatalog::from_json(r#"{"events": []}"#)
        }
    }

    #[test]
    fn default_engine_starts_active_session() {
        let engine: SimulationEngine<StaticCatalog, DefaultSeed> = SimulationEngine::default();
        let session = engine.create_session(0xBEEF).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(*session.state(), SimulationState::default());
        assert_eq!(session.catalog().len(), 10);
        assert_eq!(session.rng_seed(), 0xBEEF);
    }

    #[test]
    fn restart_reloads_seed() {
        let engine = SimulationEngine::new(StaticCatalog, CountingSeed::default());
        let mut session = engine.create_session(1).unwrap();
        assert!((session.state().cash - 1_000_000.0).abs() < f64::EPSILON);
        session.choose(0).unwrap();

        engine.restart_session(&mut session).unwrap();
        assert!((session.state().cash - 2_000_000.0).abs() < f64::EPSILON);
        assert_eq!(session.state().month, 1);
        assert!(session.history().is_empty());
    }

    #[test]
    fn loader_failures_surface_as_engine_errors() {
        let err = SimulationEngine::new(StaticCatalog, FailingSeed)
            .create_session(1)
            .unwrap_err();
        assert!(matches!(err, EngineError::Seed(_)));
        assert!(err.to_string().contains("offline"));

        let err = SimulationEngine::new(BrokenCatalog, DefaultSeed)
            .create_session(1)
            .unwrap_err();
        assert!(matches!(err, EngineError::Catalog(_)));
    }

    #[test]
    fn failed_restart_keeps_session() {
        let engine: SimulationEngine<StaticCatalog, DefaultSeed> = SimulationEngine::default();
        let mut session = engine.create_session(4).unwrap();
        session.choose(0).unwrap();
        let failing = SimulationEngine::new(StaticCatalog, FailingSeed);
        assert!(failing.restart_session(&mut session).is_err());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn metrics_seed_maps_dashboard_values() {
        let json = r#"[{"metric_name": "Cash on Hand", "value": 420000}]"#;
        let engine = SimulationEngine::new(StaticCatalog, MetricsSeed::new(json));
        let session = engine.create_session(9).unwrap();
        assert!((session.state().cash - 420_000.0).abs() < f64::EPSILON);
        assert!((session.state().revenue - 75_000.0).abs() < f64::EPSILON);
    }
}
