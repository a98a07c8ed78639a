//! Request handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use lotto_generation::{
    Combination, CombinationReport, DrawComparison, DrawRecordOutcome, HistoricalDraw,
    MetricsSnapshot, PatternRule, PredictionOutcome, RequesterId,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ApiError;
use super::extract::ApiJson;
use super::AppState;

const DEFAULT_PREDICTION_COUNT: usize = 5;

fn default_count() -> usize {
    DEFAULT_PREDICTION_COUNT
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub requester: Option<String>,
}

pub async fn predict(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PredictRequest>,
) -> Result<Json<PredictionOutcome>, ApiError> {
    let requester = request.requester.map(RequesterId::new);
    let outcome = state
        .api
        .generate_predictions(request.count, requester)
        .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub numbers: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub combination: Combination,
    pub acceptable: bool,
    pub pattern_violation: Option<PatternRule>,
    pub previously_drawn: bool,
}

impl From<CombinationReport> for CheckResponse {
    fn from(report: CombinationReport) -> Self {
        Self {
            acceptable: report.is_acceptable(),
            combination: report.combination,
            pattern_violation: report.pattern_violation,
            previously_drawn: report.previously_drawn,
        }
    }
}

pub async fn check(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let combination = Combination::try_from(request.numbers)?;
    let report = state.api.check_combination(&combination).await?;
    Ok(Json(report.into()))
}

#[derive(Debug, Deserialize)]
pub struct RecordDrawRequest {
    pub draw_no: u32,
    pub numbers: Vec<u8>,
    /// Defaults to today (UTC)
    #[serde(default)]
    pub draw_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RecordDrawResponse {
    pub draw_no: u32,
    pub status: &'static str,
}

pub async fn record_draw(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecordDrawRequest>,
) -> Result<(StatusCode, Json<RecordDrawResponse>), ApiError> {
    if request.draw_no == 0 {
        return Err(ApiError::BadRequest("draw_no must be at least 1".into()));
    }
    let draw = HistoricalDraw {
        draw_no: request.draw_no,
        draw_date: request
            .draw_date
            .unwrap_or_else(|| Utc::now().date_naive()),
        combination: Combination::try_from(request.numbers)?,
    };

    let (status, label) = match state.api.record_draw(draw).await? {
        DrawRecordOutcome::Inserted => (StatusCode::CREATED, "recorded"),
        DrawRecordOutcome::AlreadyRecorded => (StatusCode::CONFLICT, "already_recorded"),
    };
    info!(draw_no = request.draw_no, status = label, "Draw result submitted");
    Ok((
        status,
        Json(RecordDrawResponse {
            draw_no: request.draw_no,
            status: label,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    pub requester: Option<String>,
}

pub async fn compare_draw(
    State(state): State<AppState>,
    Path(draw_no): Path<u32>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<DrawComparison>, ApiError> {
    let requester = query.requester.map(RequesterId::new);
    let comparison = state.api.compare_draw(draw_no, requester).await?;
    Ok(Json(comparison))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
