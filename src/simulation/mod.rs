pub mod history;
pub mod impact;
pub mod scenario;
pub mod session;
pub mod variate;
