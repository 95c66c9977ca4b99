//! Small helpers shared by the binary and the HTTP server.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Resolve once Ctrl+C is received.
///
/// If the signal handler cannot be installed this never resolves, so a
/// server using it for graceful shutdown keeps running.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received (Ctrl+C)"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

/// Parse an RFC 3339 timestamp such as `2026-02-18T07:52:47Z`.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value.trim(), &Rfc3339)
}
