use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;
use crate::analysis::{Classification, Priority, Sentiment};
use crate::complaint::{Complaint, ComplaintSummary, NewComplaint, Status};
use crate::storage::Stats;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub sentiment: Sentiment,
    pub priority: Priority,
    pub confidence: f32,
}

impl From<Classification> for AnalyzeResponse {
    fn from(c: Classification) -> Self {
        Self {
            sentiment: c.sentiment,
            priority: c.priority,
            confidence: round2(c.confidence.unwrap_or(0.0)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub data: SubmitData,
}

#[derive(Debug, Serialize)]
pub struct SubmitData {
    pub complaint_id: String,
    pub sentiment: Sentiment,
    pub confidence: f32,
    pub priority: Priority,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub complaints: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// POST /api/complaints
pub async fn submit_complaint(
    State(state): State<AppState>,
    Json(intake): Json<NewComplaint>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let missing = intake.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Semua field harus diisi ({})",
            missing.join(", ")
        )));
    }

    let classification = state.analyzer.analyze(&intake.description).await;
    let complaint = state.store.create(intake, classification).await?;
    let classification = complaint.classification();

    Ok(Json(SubmitResponse {
        success: true,
        message: "Pengaduan berhasil dikirim".to_string(),
        data: SubmitData {
            complaint_id: complaint.id,
            sentiment: classification.sentiment,
            confidence: round2(classification.confidence.unwrap_or(0.0)),
            priority: classification.priority,
        },
    }))
}

/// POST /api/analyze, called while the reporter is still typing.
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    Json(state.analyzer.analyze(&req.text).await.into())
}

/// GET /api/complaints/search?q=
pub async fn search_complaints(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListResponse<ComplaintSummary>>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ApiError::BadRequest("Masukkan ID laporan".to_string()));
    }

    let complaints = state
        .store
        .search(&query.q)
        .await
        .iter()
        .map(Complaint::summary)
        .collect();

    Ok(Json(ListResponse {
        success: true,
        complaints,
    }))
}

/// GET /api/admin/complaints
pub async fn list_complaints(State(state): State<AppState>) -> Json<ListResponse<Complaint>> {
    Json(ListResponse {
        success: true,
        complaints: state.store.list().await,
    })
}

/// PUT /api/admin/complaints/{id}
pub async fn update_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status: Status = req
        .status
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Status tidak dikenal: {}", e)))?;

    state.store.update_status(&id, status, req.admin_notes).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Status berhasil diupdate".to_string(),
    }))
}

/// GET /api/admin/stats
pub async fn stats(State(state): State<AppState>) -> Json<Stats> {
    Json(state.store.stats().await)
}
