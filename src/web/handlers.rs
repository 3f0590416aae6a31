//! HTTP handlers for the job-status API

use std::path::{Component, Path};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, Path as UrlPath, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use crate::config::{
    Config, IntroOutroConfig, OutputConfig, ProcessingConfig, QualityPreset,
    SUPPORTED_EXTENSIONS,
};
use crate::jobs::Job;
use crate::pipeline::Splitter;
use crate::web::{ApiError, ApiResult, AppState};

/// Parameters for a split request.
#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    #[serde(default = "default_max_length")]
    pub max_length: f64,
    #[serde(default = "default_quality")]
    pub quality: QualityPreset,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_naming_pattern")]
    pub naming_pattern: String,
}

fn default_max_length() -> f64 {
    1200.0
}

fn default_quality() -> QualityPreset {
    QualityPreset::High
}

fn default_format() -> String {
    "mp4".to_string()
}

fn default_naming_pattern() -> String {
    "{title}_part{index:02d}_{date}".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SplitQuery {
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub job_id: u64,
    pub status: &'static str,
}

/// GET / - main page, served from the static directory when present.
pub async fn index(State(state): State<AppState>) -> Response {
    if let Some(static_dir) = &state.options.static_dir {
        if let Ok(html) = tokio::fs::read_to_string(static_dir.join("index.html")).await {
            return Html(html).into_response();
        }
    }
    Html("<h1>StreamSplit</h1><p>Frontend not found. Use the JSON API under /api.</p>")
        .into_response()
}

/// Reject path traversal and unsupported extensions before any disk write.
fn validate_upload_name(filename: &str) -> Result<(), ApiError> {
    let path = Path::new(filename);
    let is_bare_name = path
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        && path.components().count() == 1;
    if !is_bare_name {
        return Err(ApiError::bad_request("Invalid filename"));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::bad_request("Unsupported file format"));
    }
    Ok(())
}

/// POST /api/upload - spool a video file, streamed chunk by chunk.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?
        .ok_or_else(|| ApiError::bad_request("No file field in upload"))?;

    let filename = field
        .file_name()
        .map(|n| n.to_string())
        .ok_or_else(|| ApiError::bad_request("Upload is missing a filename"))?;
    validate_upload_name(&filename)?;

    let file_path = state.options.upload_dir.join(&filename);
    let mut file = tokio::fs::File::create(&file_path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create file: {}", e)))?;

    let mut total_size: u64 = 0;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if let Err(e) = file.write_all(&chunk).await {
                    // Do not leave a truncated spool file behind.
                    drop(file);
                    let _ = tokio::fs::remove_file(&file_path).await;
                    return Err(ApiError::internal(format!("Failed to save file: {}", e)));
                }
                total_size += chunk.len() as u64;
            }
            Ok(None) => break,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&file_path).await;
                return Err(ApiError::bad_request(format!("Upload aborted: {}", e)));
            }
        }
    }
    file.flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to save file: {}", e)))?;

    info!("Uploaded {} ({} bytes)", filename, total_size);
    Ok(Json(UploadResponse {
        path: file_path.display().to_string(),
        filename,
        size: total_size,
    }))
}

/// POST /api/split?filename=... - create a job and start processing.
pub async fn split(
    State(state): State<AppState>,
    Query(query): Query<SplitQuery>,
    Json(request): Json<SplitRequest>,
) -> ApiResult<Json<SplitResponse>> {
    validate_upload_name(&query.filename)?;

    let input_path = state.options.upload_dir.join(&query.filename);
    if !input_path.exists() {
        return Err(ApiError::not_found(format!(
            "Uploaded file not found: {}",
            query.filename
        )));
    }

    let job = state.store.create().await;
    let job_id = job.id;

    tokio::spawn(process_video(state.clone(), job, query.filename, request));

    Ok(Json(SplitResponse {
        job_id,
        status: "started",
    }))
}

/// GET /api/jobs/:job_id - job status.
pub async fn get_job(
    State(state): State<AppState>,
    UrlPath(job_id): UrlPath<u64>,
) -> ApiResult<Json<Job>> {
    state
        .store
        .get(job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Job not found"))
}

/// GET /api/jobs - all jobs.
pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.store.list().await)
}

/// GET /api/download/:job_id/:filename - stream a produced file.
pub async fn download(
    State(state): State<AppState>,
    UrlPath((job_id, filename)): UrlPath<(u64, String)>,
) -> ApiResult<Response> {
    let job = state
        .store
        .get(job_id)
        .await
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if !job.output_files.iter().any(|f| f == &filename) {
        return Err(ApiError::not_found("File not found"));
    }

    let file_path = state
        .options
        .output_dir
        .join(job_id.to_string())
        .join(&filename);
    let file = tokio::fs::File::open(&file_path)
        .await
        .map_err(|_| ApiError::not_found("File not found on disk"))?;

    let stream = ReaderStream::new(file);
    let response = Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(response)
}

/// Background task driving the pipeline for one job.
///
/// The job record is only ever written from here; API handlers read it.
async fn process_video(state: AppState, mut job: Job, filename: String, request: SplitRequest) {
    job.mark_processing("Setting up video processing...", 0);
    state.store.put(job.clone()).await;

    let result = run_split(&state, job.id, &mut job, &filename, &request).await;

    match result {
        Ok(output_files) => job.mark_completed(output_files),
        Err(e) => {
            error!("Job {} failed: {}", job.id, e);
            job.mark_failed(e.to_string());
        }
    }
    state.store.put(job).await;
}

async fn run_split(
    state: &AppState,
    job_id: u64,
    job: &mut Job,
    filename: &str,
    request: &SplitRequest,
) -> Result<Vec<String>, anyhow::Error> {
    let input_path = state.options.upload_dir.join(filename);
    let output_dir = state.options.output_dir.join(job_id.to_string());

    let config = Config {
        input_path,
        output: OutputConfig {
            directory: output_dir,
            format: request.format.clone(),
            naming_pattern: request.naming_pattern.clone(),
            max_segment_length: request.max_length,
        },
        intro_outro: IntroOutroConfig::default(),
        processing: ProcessingConfig {
            quality: request.quality,
            crf: request.quality.default_crf(),
            ..ProcessingConfig::default()
        },
    };
    config.validate()?;

    job.mark_processing("Splitting video into segments...", 25);
    state.store.put(job.clone()).await;

    let splitter = Splitter::new(config, Arc::clone(&state.engine));
    let outcome = splitter.run().await?;

    Ok(outcome
        .output_files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect())
}
