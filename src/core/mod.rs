//! Core utilities, configuration, and common functionality

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod retry;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, AppResult, ConfigError, DecodeError, StoreError, StoreResult};
pub use logging::{init_logger, log_startup_configuration};
