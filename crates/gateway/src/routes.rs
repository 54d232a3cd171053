use crate::error::GatewayError;
use crate::pages::{ComparisonPanel, PageView, ResultView};
use crate::pipeline;
use crate::state::AppState;
use crate::upload::{Upload, decode_image};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use image::{DynamicImage, ImageFormat};
use inference::InferenceBackend;
use schema::{ClassLabel, ClassificationReport, StatusMessage};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;

pub fn router<B>(state: AppState<B>) -> Router
where
    B: InferenceBackend + Send + Sync + 'static,
{
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(index::<B>))
        .route("/classify", post(classify_page::<B>))
        .route("/api/classify", post(classify_json::<B>))
        .route("/api/models", get(models::<B>))
        .route("/comparison-image", get(comparison_image::<B>))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index<B>(State(state): State<AppState<B>>) -> Result<Html<String>, GatewayError>
where
    B: Send + Sync + 'static,
{
    let view = PageView::new(&state.statuses, comparison_panel(&state));
    Ok(Html(state.pages.render(&view)?))
}

async fn classify_page<B>(
    State(state): State<AppState<B>>,
    multipart: Multipart,
) -> Result<Html<String>, GatewayError>
where
    B: InferenceBackend + Send + Sync + 'static,
{
    let upload = Upload::read(multipart, state.max_upload_bytes).await?;
    let (format, image) = decode_image(&upload.bytes)?;

    let report = run_classification(&state, image, upload.expected).await?;

    let view = PageView::new(&state.statuses, comparison_panel(&state))
        .with_result(ResultView::new(&report, &upload.bytes, format));
    Ok(Html(state.pages.render(&view)?))
}

async fn classify_json<B>(
    State(state): State<AppState<B>>,
    multipart: Multipart,
) -> Result<Json<ClassificationReport>, GatewayError>
where
    B: InferenceBackend + Send + Sync + 'static,
{
    let upload = Upload::read(multipart, state.max_upload_bytes).await?;
    let (_, image) = decode_image(&upload.bytes)?;

    let report = run_classification(&state, image, upload.expected).await?;
    Ok(Json(report))
}

async fn models<B>(State(state): State<AppState<B>>) -> Json<Vec<StatusMessage>>
where
    B: Send + Sync + 'static,
{
    Json(state.statuses.to_vec())
}

async fn comparison_image<B>(State(state): State<AppState<B>>) -> Response
where
    B: Send + Sync + 'static,
{
    let panel = comparison_panel(&state);
    let path = match (&state.comparison_image, panel.error) {
        (Some(path), None) => path,
        (_, error) => {
            let message = error.unwrap_or_default();
            return (StatusCode::NOT_FOUND, message).into_response();
        }
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = ImageFormat::from_path(path)
                .map(|format| format.to_mime_type())
                .unwrap_or("application/octet-stream");
            ([(header::CONTENT_TYPE, mime)], bytes).into_response()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read comparison image");
            (
                StatusCode::NOT_FOUND,
                format!("Error: {} does not exist.", path.display()),
            )
                .into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

fn comparison_panel<B>(state: &AppState<B>) -> ComparisonPanel {
    ComparisonPanel::for_path(state.comparison_image.as_deref())
}

/// Run the pipeline on a blocking worker and record request metrics.
async fn run_classification<B>(
    state: &AppState<B>,
    image: DynamicImage,
    expected: Option<ClassLabel>,
) -> Result<ClassificationReport, GatewayError>
where
    B: InferenceBackend + Send + Sync + 'static,
{
    state.metrics.record_request();
    let started = Instant::now();
    let registry = Arc::clone(&state.registry);

    let result = tokio::task::spawn_blocking(move || {
        pipeline::classify(&image, &registry, expected)
    })
    .await
    .map_err(anyhow::Error::from)
    .and_then(|report| report);

    match result {
        Ok(report) => {
            state
                .metrics
                .record_success(started.elapsed(), report.predictions.len());
            Ok(report)
        }
        Err(e) => {
            state.metrics.record_failure("inference");
            Err(e.into())
        }
    }
}
