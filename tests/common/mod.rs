//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod transport;

#[allow(unused_imports)]
pub use fixtures::{TestEnvironment, ADMIN_ID, ARCHIVE_CHANNEL, VALIDITY_SECS};
#[allow(unused_imports)]
pub use transport::{RecordingTransport, Sent};
