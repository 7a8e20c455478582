pub mod config;
pub mod error;
pub mod policy;
pub mod simulators;
pub mod time_value;
pub mod types;
pub mod validation;

pub use config::{LoanCategory, RateTable, SimulatorConfig};
pub use error::LoanSimError;
pub use types::*;

/// Standard result type for all loan-sim operations
pub type LoanSimResult<T> = Result<T, LoanSimError>;
