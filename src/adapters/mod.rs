// Adapters layer: concrete implementations for the outside world (files, planning format).

pub mod planning_csv;
pub mod storage;

pub use planning_csv::{load_planning, parse_planning, PlanningImport};
pub use storage::LocalStorage;
