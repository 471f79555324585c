use crate::logger::Logger;
use crate::models::{AnalysisReport, Device, NetworkEvent, TrafficStats};
use crate::report::ForensicAnalyst;
use crate::security::{deobfuscate, digest, mask};
use crate::synthesizer::{devices, LogSynthesizer};
use crate::traffic::TrafficMonitor;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// État partagé par les routes de l'API
#[derive(Clone)]
pub struct ApiState {
    pub monitor: TrafficMonitor,
    pub analyst: ForensicAnalyst,
    pub synthesizer: Arc<LogSynthesizer>,
    pub batch_size: usize,
    pub logger: Option<Arc<Logger>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    success: bool,
    message: String,
}

/// Présentation de la charge dans le flux
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadView {
    #[default]
    Plain,
    Masked,
    Obfuscated,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    view: Option<PayloadView>,
}

#[derive(Debug, Serialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    event: NetworkEvent,
    display_payload: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    running: bool,
    buffered_events: usize,
    active_alert: Option<NetworkEvent>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    id: Uuid,
    stored_digest: String,
    recomputed_digest: String,
    valid: bool,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    events: Vec<NetworkEvent>,
    report: AnalysisReport,
}

#[derive(Debug, Deserialize)]
pub struct DeobfuscateRequest {
    cipher: String,
}

#[derive(Debug, Serialize)]
pub struct DeobfuscateResponse {
    plain: String,
}

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/logs", get(list_logs))
        .route("/api/v1/logs/:id", get(get_log))
        .route("/api/v1/logs/:id/verify", get(verify_log))
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/start", post(start_monitor))
        .route("/api/v1/stop", post(stop_monitor))
        .route("/api/v1/alert", get(get_alert).delete(clear_alert))
        .route("/api/v1/devices", get(list_devices))
        .route("/api/v1/stats", get(get_stats))
        .route("/api/v1/report", post(generate_report))
        .route("/api/v1/deobfuscate", post(reveal_payload))
        .with_state(state)
}

async fn list_logs(
    State(state): State<ApiState>,
    Query(query): Query<FeedQuery>,
) -> Json<Vec<FeedEntry>> {
    let view = query.view.unwrap_or_default();
    let entries = state
        .monitor
        .logs()
        .await
        .into_iter()
        .map(|event| {
            let display_payload = match view {
                PayloadView::Plain => event.payload.clone(),
                PayloadView::Masked => mask(&event.payload),
                PayloadView::Obfuscated => event.obfuscated_payload.clone(),
            };
            FeedEntry { event, display_payload }
        })
        .collect();
    Json(entries)
}

async fn get_log(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NetworkEvent>, StatusCode> {
    state.monitor.find(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn verify_log(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VerifyResponse>, StatusCode> {
    let event = state.monitor.find(id).await.ok_or(StatusCode::NOT_FOUND)?;
    let recomputed_digest = digest(&event.payload);

    Ok(Json(VerifyResponse {
        id,
        valid: recomputed_digest == event.integrity_digest,
        stored_digest: event.integrity_digest,
        recomputed_digest,
    }))
}

async fn get_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let snapshot = state.monitor.snapshot().await;
    Json(StatusResponse {
        running: snapshot.running,
        buffered_events: snapshot.events.len(),
        active_alert: snapshot.active_alert,
    })
}

async fn start_monitor(State(state): State<ApiState>) -> Json<ApiResponse> {
    state.monitor.start().await;
    Json(ApiResponse {
        success: true,
        message: "Génération de trafic active".to_string(),
    })
}

async fn stop_monitor(State(state): State<ApiState>) -> Json<ApiResponse> {
    state.monitor.stop().await;
    Json(ApiResponse {
        success: true,
        message: "Génération de trafic en pause".to_string(),
    })
}

async fn get_alert(State(state): State<ApiState>) -> Json<Option<NetworkEvent>> {
    Json(state.monitor.active_alert().await)
}

async fn clear_alert(State(state): State<ApiState>) -> Json<ApiResponse> {
    state.monitor.clear_alert().await;
    Json(ApiResponse {
        success: true,
        message: "Alerte acquittée".to_string(),
    })
}

async fn list_devices() -> Json<Vec<Device>> {
    Json(devices().to_vec())
}

async fn get_stats(State(state): State<ApiState>) -> Json<TrafficStats> {
    Json(state.monitor.stats().await)
}

/// Simule l'extraction d'un lot suspect puis le soumet à l'analyste
async fn generate_report(State(state): State<ApiState>) -> Json<ReportResponse> {
    let events = state.synthesizer.batch(state.batch_size).await;
    let report = state.analyst.analyze(&events).await;

    if let Some(logger) = &state.logger {
        logger.log_report(&report);
    }

    Json(ReportResponse { events, report })
}

async fn reveal_payload(Json(request): Json<DeobfuscateRequest>) -> Json<DeobfuscateResponse> {
    Json(DeobfuscateResponse {
        plain: deobfuscate(&request.cipher),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThreatLevel;
    use crate::notifications::SilentNotifier;
    use crate::report::{GeminiClient, FAILURE_RECOMMENDATIONS};
    use crate::security::{obfuscate, DECRYPTION_ERROR};
    use crate::traffic::MonitorSettings;
    use std::time::Duration;

    fn api_state() -> ApiState {
        let synthesizer = Arc::new(LogSynthesizer::new());
        let monitor = TrafficMonitor::new(
            MonitorSettings::default(),
            synthesizer.clone(),
            Arc::new(SilentNotifier),
        );
        let client = GeminiClient::new(None, "gemini-2.5-flash".into(), Duration::from_secs(1));

        ApiState {
            monitor,
            analyst: ForensicAnalyst::new(Arc::new(client)),
            synthesizer,
            batch_size: 15,
            logger: None,
        }
    }

    #[tokio::test]
    async fn test_feed_views_and_verification() {
        let state = api_state();
        let event = state.synthesizer.synthesize().await;
        state.monitor.ingest(event.clone()).await;

        let Json(masked) = list_logs(
            State(state.clone()),
            Query(FeedQuery { view: Some(PayloadView::Masked) }),
        )
        .await;
        assert_eq!(masked.len(), 1);
        assert!(masked[0].display_payload.ends_with("[ENCRYPTED]"));

        let Json(verified) = verify_log(State(state.clone()), Path(event.id)).await.unwrap();
        assert!(verified.valid);

        let missing = get_log(State(state), Path(Uuid::new_v4())).await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stop_and_status() {
        let state = api_state();
        stop_monitor(State(state.clone())).await;

        let Json(status) = get_status(State(state)).await;
        assert!(!status.running);
        assert_eq!(status.buffered_events, 0);
        assert!(status.active_alert.is_none());
    }

    #[tokio::test]
    async fn test_report_without_credential() {
        let state = api_state();
        let Json(response) = generate_report(State(state)).await;

        assert_eq!(response.events.len(), 15);
        assert_eq!(response.report.threat_level, ThreatLevel::Unknown);
        assert_eq!(response.report.recommendations, FAILURE_RECOMMENDATIONS);
    }

    #[tokio::test]
    async fn test_reveal_payload() {
        let Json(ok) = reveal_payload(Json(DeobfuscateRequest { cipher: obfuscate("ping") })).await;
        assert_eq!(ok.plain, "ping");

        let Json(bad) = reveal_payload(Json(DeobfuscateRequest { cipher: "@@".into() })).await;
        assert_eq!(bad.plain, DECRYPTION_ERROR);
    }
}
