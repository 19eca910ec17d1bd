//! MongoDB connector and helpers
//!
//! Connection management, readiness probes, driver error classification and
//! the serde adapters used by documents that store UUIDs and timestamps as
//! strings.

mod config;
mod connector;
mod errors;
mod health;
pub mod serde_helpers;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use errors::{DUPLICATE_KEY_CODE, is_decode_error, is_duplicate_key, is_unavailable};
pub use health::{HealthStatus, check_health, check_health_detailed};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
