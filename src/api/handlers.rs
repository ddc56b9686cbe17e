use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{multipart::Multipart, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tracing::{error, info};

use super::models::*;
use crate::analysis::{ContextAnalyzer, GeminiAnalyzer, LocationAnalysis};
use crate::batch::project_csv;
use crate::config::Config;
use crate::error::Result;
use crate::projection::{project, unproject};
use crate::share::SharePayload;
use crate::types::LocationFix;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Shared handler state
#[derive(Clone, Default)]
pub struct AppState {
    pub analyzer: Option<Arc<GeminiAnalyzer>>,
}

impl AppState {
    /// Builds the state; the analyzer is only created when an API key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let analyzer = match config.analysis.api_key {
            Some(_) => Some(Arc::new(GeminiAnalyzer::new(&config.analysis)?)),
            None => None,
        };
        Ok(Self { analyzer })
    }
}

pub async fn get_projection(Query(req): Query<ProjectRequest>) -> Json<ProjectResponse> {
    let start = Instant::now();
    let projected = project(req.latitude, req.longitude);
    let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    Json(ProjectResponse {
        latitude: req.latitude,
        longitude: req.longitude,
        easting: projected.easting,
        northing: projected.northing,
        execution_time_ms,
    })
}

pub async fn get_unprojection(
    Query(req): Query<UnprojectRequest>,
) -> std::result::Result<Json<UnprojectResponse>, ApiError> {
    match unproject(req.easting, req.northing) {
        Ok(geo) => Ok(Json(UnprojectResponse {
            latitude: geo.latitude,
            longitude: geo.longitude,
        })),
        Err(e) => Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Failed to unproject: {}", e),
        )),
    }
}

pub async fn upload_csv(mut multipart: Multipart) -> std::result::Result<Response, ApiError> {
    let start = Instant::now();

    let mut csv_data: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("csv") {
            let bytes = field.bytes().await.map_err(|e| {
                api_error(StatusCode::BAD_REQUEST, format!("Failed to read CSV: {}", e))
            })?;
            csv_data = Some(bytes.to_vec());
        }
    }

    let csv_data = csv_data.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing CSV file"))?;

    // Parsing and the rayon fan-out are CPU bound; keep them off the async workers
    let output = tokio::task::spawn_blocking(move || project_csv(csv_data.as_slice(), start))
        .await
        .map_err(|e| {
            error!(error = %e, "CSV batch task failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "CSV processing was interrupted")
        })?
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to process CSV: {}", e),
            )
        })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.as_ref())
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"stereo70_results.csv\"",
        )
        .body(Body::from(output.csv))
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

pub async fn get_share(Query(req): Query<ShareRequest>) -> Json<SharePayload> {
    let fix = LocationFix::new(req.latitude, req.longitude, req.accuracy.unwrap_or(0.0));
    Json(SharePayload::new(&fix, req.description.as_deref()))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Query(req): Query<AnalyzeRequest>,
) -> std::result::Result<Json<LocationAnalysis>, ApiError> {
    let analyzer = state.analyzer.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Context analysis is not configured",
        )
    })?;

    match analyzer.analyze(req.latitude, req.longitude).await {
        Ok(analysis) => {
            info!(sources = analysis.sources.len(), "analysis served");
            Ok(Json(analysis))
        }
        Err(e) => {
            error!(error = %e, "analysis request failed");
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}
