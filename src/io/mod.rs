//! Tabular records exchanged with the outside world.

pub mod bounds_record;
pub mod exposure_record;
pub mod scenario_export;
