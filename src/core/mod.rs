pub mod bounds;
pub mod error;
pub mod exposure;
pub mod risk_factor;
