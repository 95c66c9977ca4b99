//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::arbitrage::{ArbitrageCalculator, ArbitrageResult};
use crate::bet::{BonusLeg, HedgeLeg};
use crate::config::Config;
use crate::storage;
use crate::summary::{OpportunityAggregator, WeeklySummary, DEFAULT_WINDOW_DAYS};

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Valuation with the configured stake guard.
    pub calculator: ArbitrageCalculator,
    /// Aggregation with the configured top-N.
    pub aggregator: OpportunityAggregator,
    /// Window used when a summary request names none.
    pub window_days: u32,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with default valuation and aggregation settings.
    pub fn new() -> Self {
        Self {
            calculator: ArbitrageCalculator::default(),
            aggregator: OpportunityAggregator::default(),
            window_days: DEFAULT_WINDOW_DAYS,
            metrics: None,
        }
    }

    /// Create state from config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            calculator: ArbitrageCalculator::from_config(config),
            aggregator: OpportunityAggregator::from_config(config),
            window_days: config.window_days,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle served at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Error body for rejected requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

/// Body of `POST /api/v1/evaluate`.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    /// Bonus-funded leg.
    pub bonus_leg: BonusLeg,
    /// Real-money leg.
    pub hedge_leg: HedgeLeg,
    /// Discovery time; the request time when absent.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub discovered_at: Option<OffsetDateTime>,
}

/// Body of `POST /api/v1/summary`.
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    /// Stored records; elements that do not parse count as malformed.
    pub records: Vec<Value>,
    /// End of the window.
    #[serde(with = "time::serde::rfc3339")]
    pub as_of: OffsetDateTime,
    /// Window length; the server default when absent.
    #[serde(default)]
    pub window_days: Option<u32>,
}

fn unprocessable(error: impl ToString) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Evaluate one pairing - 422 when the odds are invalid.
pub async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<ArbitrageResult>, (StatusCode, Json<ErrorResponse>)> {
    let discovered_at = request
        .discovered_at
        .unwrap_or_else(OffsetDateTime::now_utc);

    state
        .calculator
        .evaluate(request.bonus_leg, request.hedge_leg, discovered_at)
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "Rejected pairing");
            unprocessable(e)
        })
}

/// Summarize posted records over a window ending at `as_of`.
pub async fn summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<WeeklySummary>, (StatusCode, Json<ErrorResponse>)> {
    let window_days = request.window_days.unwrap_or(state.window_days);
    if window_days == 0 {
        return Err(unprocessable("window_days must be at least 1"));
    }

    let records = storage::records_from_values(request.records);
    let summary = state
        .aggregator
        .aggregate(&records, request.as_of, window_days);

    info!(
        records = records.len(),
        profitable = summary.profitable_count,
        "Summary served"
    );
    Ok(Json(summary))
}

/// Prometheus text exposition - 503 when no recorder is installed.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn app_state_from_config() {
        let config = Config {
            window_days: 14,
            top_n: 3,
            max_hedge_multiple: dec!(10),
            ..Config::default()
        };
        let state = AppState::from_config(&config);

        assert_eq!(state.window_days, 14);
        assert_eq!(state.aggregator.top_n(), 3);
        assert_eq!(state.calculator.max_hedge_multiple(), dec!(10));
        assert!(state.metrics.is_none());
    }

    #[test]
    fn evaluate_request_defaults_discovery_time() {
        let request: EvaluateRequest = serde_json::from_str(
            r#"{
                "bonus_leg": {"sportsbook": "DraftKings", "selection": "Lakers", "american_odds": 300, "bonus_amount": "100"},
                "hedge_leg": {"sportsbook": "FanDuel", "selection": "Celtics", "american_odds": -120}
            }"#,
        )
        .unwrap();

        assert!(request.discovered_at.is_none());
        assert_eq!(request.bonus_leg.bonus_amount, dec!(100));
        assert_eq!(request.hedge_leg.leg.american_odds, -120);
    }
}
