use mongodb::{Database, bson::doc};
use std::time::Instant;

/// Result of a MongoDB readiness probe
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when the probe failed
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping the database. Returns `true` when the server answers.
///
/// # Example
/// ```ignore
/// use database::mongodb::check_health;
///
/// if !check_health(&db).await {
///     tracing::warn!("MongoDB is not reachable");
/// }
/// ```
pub async fn check_health(db: &Database) -> bool {
    db.run_command(doc! { "ping": 1 }).await.is_ok()
}

/// Ping the database and report latency plus any error message.
pub async fn check_health_detailed(db: &Database) -> HealthStatus {
    let start = Instant::now();
    let result = db.run_command(doc! { "ping": 1 }).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
