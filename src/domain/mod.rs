// Domain layer: records, fleet, result types and ports.

pub mod fleet;
pub mod model;
pub mod ports;
pub mod report;
