pub mod allocator;
pub mod attribution;
pub mod comparator;
pub mod engine;
pub mod grouping;
pub mod zone;

pub use crate::domain::model::{AllocationResult, CommuteRecord, Direction, RideGroup};
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
