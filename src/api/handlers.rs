//! API request handlers
//!
//! Handlers for all REST API endpoints. Request bodies are the raw `.xlsx`
//! bytes; selections travel in the query string.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::LayoutConfig;
use crate::delivery::{today, UpdatedWorkbook, XLSX_CONTENT_TYPE};
use crate::error::{UpdaterError, UpdaterResult};
use crate::session::UpdateSession;
use crate::types::{SkipReason, UpdateReport, UpdateTarget, WriteOutcome};

use super::server::AppState;

/// Header listing the A1 addresses written by an update
pub const UPDATED_CELLS_HEADER: &str = "x-updated-cells";
/// Header listing the A1 addresses whose non-numeric content was replaced
pub const OVERWRITTEN_CELLS_HEADER: &str = "x-overwritten-cells";
/// Header listing skipped targets as `Target:reason`
pub const SKIPPED_FIELDS_HEADER: &str = "x-skipped-fields";
/// Header carrying the full update report as JSON
pub const UPDATE_REPORT_HEADER: &str = "x-update-report";
/// Header carrying the request id of a binary response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "Sales Updater API Server".to_string(),
        version: state.version.clone(),
        description: "Add daily stock and sales figures to an Excel workbook".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint(
                "/api/v1/choices",
                "POST",
                "Companies, varieties and targets for an uploaded workbook",
            ),
            endpoint(
                "/api/v1/update",
                "POST",
                "Apply increments and download the updated workbook",
            ),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub data_sheet: String,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        data_sheet: state.layout.data_sheet.clone(),
    }))
}

/// Choices query: the selections made so far
#[derive(Debug, Default, Deserialize)]
pub struct ChoicesQuery {
    pub company: Option<String>,
    pub variety: Option<String>,
}

/// Choices response: lists to offer plus the resolved selection
#[derive(Debug, Default, Serialize)]
pub struct ChoicesResponse {
    pub companies: Vec<String>,
    pub company: Option<String>,
    pub varieties: Vec<String>,
    pub variety: Option<String>,
    pub targets: Vec<UpdateTarget>,
    pub stock_column: String,
    pub sales_column: String,
}

/// POST /api/v1/choices - Derive selection lists from an uploaded workbook
pub async fn choices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChoicesQuery>,
    body: Bytes,
) -> Response {
    let layout = state.layout.clone();
    let result =
        tokio::task::spawn_blocking(move || build_choices(body.to_vec(), layout, query)).await;

    match result {
        Ok(Ok(choices)) => Json(ApiResponse::ok(choices)).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => internal_error(e),
    }
}

fn build_choices(
    bytes: Vec<u8>,
    layout: LayoutConfig,
    query: ChoicesQuery,
) -> UpdaterResult<ChoicesResponse> {
    let session = UpdateSession::open(bytes, layout)?;

    let mut selections = session.initial_selections();
    if let Some(ref company) = query.company {
        selections = session.choose_company(selections, company)?;
    }
    if let Some(ref variety) = query.variety {
        selections = session.choose_variety(selections, variety)?;
    }

    let varieties = selections
        .company
        .as_deref()
        .map(|c| session.varieties(c))
        .unwrap_or_default();

    Ok(ChoicesResponse {
        companies: session.companies(),
        company: selections.company,
        varieties,
        variety: selections.variety,
        targets: crate::selection::targets(),
        stock_column: session.layout().stock_column.clone(),
        sales_column: session.layout().sales_column.clone(),
    })
}

/// Update query: the complete set of selections
#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub company: String,
    pub variety: String,
    /// Comma separated, e.g. `Stock,Sales`; both when omitted
    pub targets: Option<String>,
    #[serde(default)]
    pub stock: u64,
    #[serde(default)]
    pub sales: u64,
}

/// POST /api/v1/update - Apply increments and return the updated workbook
pub async fn update(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpdateQuery>,
    body: Bytes,
) -> Response {
    let layout = state.layout.clone();
    let result =
        tokio::task::spawn_blocking(move || apply_update(body.to_vec(), layout, query)).await;

    match result {
        Ok(Ok(updated)) => {
            info!(
                company = %updated.report.company,
                variety = %updated.report.variety,
                cells = ?updated.report.addresses(),
                "workbook updated"
            );
            workbook_response(updated)
        }
        Ok(Err(e)) => error_response(e),
        Err(e) => internal_error(e),
    }
}

fn apply_update(
    bytes: Vec<u8>,
    layout: LayoutConfig,
    query: UpdateQuery,
) -> UpdaterResult<UpdatedWorkbook> {
    let session = UpdateSession::open(bytes, layout)?;

    let mut selections = session.choose_company(session.initial_selections(), &query.company)?;
    selections = session.choose_variety(selections, &query.variety)?;
    if let Some(ref targets) = query.targets {
        let targets = UpdateTarget::parse_list(targets).map_err(|_| UpdaterError::UnknownChoice {
            kind: "update target",
            value: targets.clone(),
        })?;
        selections = session.choose_targets(selections, targets);
    }
    selections = session.set_increment(selections, UpdateTarget::Stock, query.stock);
    selections = session.set_increment(selections, UpdateTarget::Sales, query.sales);

    session.confirm(&selections, today())
}

/// `Target:reason` for every skipped field, comma separated
fn skipped_fields(report: &UpdateReport) -> String {
    report
        .skipped
        .iter()
        .map(|field| {
            let reason = match field.reason {
                SkipReason::ZeroIncrement => "zero_increment",
                SkipReason::ColumnMissing { .. } => "column_missing",
            };
            format!("{}:{}", field.target, reason)
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn overwritten_cells(report: &UpdateReport) -> String {
    report
        .changes
        .iter()
        .filter(|change| matches!(change.outcome, WriteOutcome::Overwrote { .. }))
        .map(|change| change.address.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn workbook_response(updated: UpdatedWorkbook) -> Response {
    let disposition = updated.content_disposition();
    let cells = updated.report.addresses().join(",");
    let overwritten = overwritten_cells(&updated.report);
    let skipped = skipped_fields(&updated.report);
    // serde_json escapes control characters, so only UTF-8 bytes remain
    let report = serde_json::to_string(&updated.report).unwrap_or_default();
    let UpdatedWorkbook { bytes, .. } = updated;

    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(XLSX_CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&cells) {
        headers.insert(HeaderName::from_static(UPDATED_CELLS_HEADER), value);
    }
    if let Ok(value) = HeaderValue::from_str(&overwritten) {
        headers.insert(HeaderName::from_static(OVERWRITTEN_CELLS_HEADER), value);
    }
    if let Ok(value) = HeaderValue::from_str(&skipped) {
        headers.insert(HeaderName::from_static(SKIPPED_FIELDS_HEADER), value);
    }
    if let Ok(value) = HeaderValue::from_bytes(report.as_bytes()) {
        headers.insert(HeaderName::from_static(UPDATE_REPORT_HEADER), value);
    }
    if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
        headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// Status code for a library error
pub fn status_for(err: &UpdaterError) -> StatusCode {
    match err {
        UpdaterError::SelectionNotFound { .. } => StatusCode::NOT_FOUND,
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        e if e.is_layout_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: UpdaterError) -> Response {
    let status = status_for(&err);
    (status, Json(ApiResponse::<()>::err(err.to_string()))).into_response()
}

fn internal_error(err: tokio::task::JoinError) -> Response {
    error!("update task failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::err("Internal error while processing workbook")),
    )
        .into_response()
}
