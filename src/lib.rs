//! Housing Projection - multi-decade rent vs. mortgage comparisons
//!
//! This library provides:
//! - Rent, 15-year and 30-year mortgage housing cost models
//! - Living, healthcare and simplified federal/state tax models
//! - Per-scenario investment accumulation and retirement drawdown
//! - Cross-scenario comparison tables, CSV export and a scenario library

pub mod export;
pub mod healthcare;
pub mod housing;
pub mod inputs;
pub mod investment;
pub mod living;
pub mod projection;
pub mod scenario;
pub mod storage;
pub mod tax;

// Re-export commonly used types
pub use inputs::{load_inputs, InputError, ProjectionInputs};
pub use projection::{Comparison, ComparisonTable, ProjectionEngine, ProjectionResult, ProjectionSummary};
pub use scenario::{Scenario, ScenarioRunner};
pub use storage::{FileStore, KeyValueStore, MemoryStore, ScenarioLibrary, StorageError};
pub use tax::{load_tax_tables, TaxTables};
