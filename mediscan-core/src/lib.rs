//! mediscan-core: shared infrastructure for the MediScan client crates.
pub mod config;
pub mod error;
pub mod observability;

pub use error::{ApiError, AppError};

pub use serde;
pub use serde_json;
pub use tracing;
