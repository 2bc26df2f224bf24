pub mod config;
pub mod error;
pub mod types;

pub use config::OracleConfig;
pub use error::{OracleError, Result};
pub use types::*;
