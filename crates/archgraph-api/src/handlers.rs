use crate::error::{ApiError, ApiResult, Operation};
use crate::response::{success, ApiResponse};
use crate::AppState;
use archgraph_analysis::{AnalysisOptions, ExportOutput, ExportRequest, ListQuery};
use archgraph_core::{AnalysisPage, AnalysisRecord, ValidationResult};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{Method, Uri},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Body of analyze and validate requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[serde(default)]
    pub root_path: Option<String>,
    #[serde(default)]
    pub config: Option<AnalysisOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub format: Option<String>,
    pub layout: Option<String>,
    pub color_scheme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub analysis_id: String,
    pub deleted: bool,
}

pub async fn analyze_modules(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AnalysisRecord>>> {
    let Json(request) = payload?;
    let options = request.config.unwrap_or_default();

    let record = state
        .service
        .run_analysis(request.root_path.as_deref(), &options)
        .await
        .map_err(|e| ApiError::from_domain(e, Operation::Analyze))?;
    Ok(success(record))
}

pub async fn validate_architecture(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<ValidationResult>>> {
    let Json(request) = payload?;
    let options = request.config.unwrap_or_default();

    let result = state
        .service
        .validate(request.root_path.as_deref(), &options)
        .await
        .map_err(|e| ApiError::from_domain(e, Operation::Validate))?;
    Ok(success(result))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<Json<ApiResponse<AnalysisRecord>>> {
    let record = state
        .service
        .get(&analysis_id)
        .await
        .map_err(|e| ApiError::from_domain(e, Operation::Lookup))?;
    Ok(success(record.as_ref().clone()))
}

pub async fn export_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
    params: Result<Query<ExportParams>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<ExportOutput>>> {
    let Query(params) = params?;
    // Unknown tokens are rejected before the record lookup.
    let request = ExportRequest::parse(
        params.format.as_deref(),
        params.layout.as_deref(),
        params.color_scheme.as_deref(),
    )
    .map_err(|e| ApiError::from_domain(e, Operation::Export))?;
    debug!(analysis_id = %analysis_id, format = %request.format, "Export requested");

    let output = state
        .service
        .export(&analysis_id, &request)
        .await
        .map_err(|e| ApiError::from_domain(e, Operation::Export))?;
    Ok(success(output))
}

pub async fn list_analyses(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<AnalysisPage>>> {
    let Query(params) = params?;
    let query = ListQuery::from_params(
        params.limit.as_deref(),
        params.offset.as_deref(),
        params.sort.as_deref(),
        params.order.as_deref(),
    );

    let page = state
        .service
        .list(&query)
        .await
        .map_err(|e| ApiError::from_domain(e, Operation::Lookup))?;
    Ok(success(page))
}

pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<Json<ApiResponse<DeleteResponse>>> {
    state
        .service
        .delete(&analysis_id)
        .await
        .map_err(|e| ApiError::from_domain(e, Operation::Lookup))?;
    Ok(success(DeleteResponse {
        analysis_id,
        deleted: true,
    }))
}

/// Unmatched paths and methods still answer with the error envelope.
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route not found: {} {}", method, uri.path()))
}
