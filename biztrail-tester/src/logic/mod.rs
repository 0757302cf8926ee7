pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::GameplayStrategy;
pub use seeds::{resolve_seed_inputs, resolve_strategies};
pub use simulation::{PlaythroughRecord, SimulationConfig, aggregate_records, run_playthrough};
