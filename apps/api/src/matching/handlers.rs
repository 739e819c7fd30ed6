//! Axum route handlers for the Matching API.

use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::formatter::ScoringResult;
use crate::matching::pipeline::MatchLabels;
use crate::matching::profile::CandidateProfile;
use crate::state::AppState;

/// Longest JD excerpt echoed back by `/match-cv-jd`.
const JD_ECHO_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractCvResponse {
    pub status: &'static str,
    pub filename: String,
    pub extracted_info: CandidateProfile,
}

#[derive(Debug, Serialize)]
pub struct LoadJdResponse {
    pub status: &'static str,
    pub filename: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub status: &'static str,
    pub cv_filename: String,
    pub jd_filename: String,
    pub jd_text: String,
    pub extracted_cv_info: CandidateProfile,
    pub matching_result: ScoringResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Upload helpers
// ────────────────────────────────────────────────────────────────────────────

struct Upload {
    filename: String,
    bytes: Bytes,
}

async fn collect_uploads(mut multipart: Multipart) -> Result<HashMap<String, Upload>, AppError> {
    let mut uploads = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error("Invalid multipart body", e))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let filename = field.file_name().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(&format!("Failed to read `{name}`"), e))?;
        uploads.insert(name, Upload { filename, bytes });
    }

    Ok(uploads)
}

/// Over-limit bodies become 413; anything else malformed is a 400.
fn upload_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("{context}: {e}"))
    }
}

/// Removes `field` from the uploads and checks its extension (case-insensitive).
fn take_upload(
    uploads: &mut HashMap<String, Upload>,
    field: &str,
    extension: &str,
    wrong_type: &str,
) -> Result<Upload, AppError> {
    let upload = uploads
        .remove(field)
        .ok_or_else(|| AppError::BadRequest(format!("Missing `{field}` upload")))?;

    if !upload.filename.to_lowercase().ends_with(extension) {
        return Err(AppError::BadRequest(wrong_type.to_string()));
    }
    Ok(upload)
}

/// UTF-8 decode and trim a JD upload. Empty content is a client error.
fn decode_jd(bytes: &[u8]) -> Result<String, AppError> {
    let text = std::str::from_utf8(bytes).map_err(|_| {
        AppError::BadRequest(
            "Unable to decode file. Please ensure it's a valid UTF-8 text file".to_string(),
        )
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("JD file is empty".to_string()));
    }
    Ok(text.to_string())
}

fn truncate_jd(jd_text: &str) -> String {
    if jd_text.chars().count() > JD_ECHO_CHARS {
        let head: String = jd_text.chars().take(JD_ECHO_CHARS).collect();
        format!("{head}...")
    } else {
        jd_text.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /extract-cv
///
/// Extracts a structured profile from an uploaded PDF résumé (`cv_file`).
pub async fn handle_extract_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractCvResponse>, AppError> {
    let mut uploads = collect_uploads(multipart).await?;
    let cv = take_upload(
        &mut uploads,
        "cv_file",
        ".pdf",
        "Only PDF files are supported for CV",
    )?;

    let extracted_info = state.pipeline.extract_profile(&cv.bytes).await?;
    info!(filename = %cv.filename, "CV profile extracted");

    Ok(Json(ExtractCvResponse {
        status: "success",
        filename: cv.filename,
        extracted_info,
    }))
}

/// POST /load-jd
///
/// Loads and echoes a UTF-8 job description (`jd_file`).
pub async fn handle_load_jd(multipart: Multipart) -> Result<Json<LoadJdResponse>, AppError> {
    let mut uploads = collect_uploads(multipart).await?;
    let jd = take_upload(
        &mut uploads,
        "jd_file",
        ".txt",
        "Only TXT files are supported for JD",
    )?;
    let jd_text = decode_jd(&jd.bytes)?;

    Ok(Json(LoadJdResponse {
        status: "success",
        filename: jd.filename,
        jd_text,
    }))
}

/// POST /match-cv-jd
///
/// Full pipeline: CV PDF (`cv_file`) + JD text (`jd_file`) → weighted matching result.
pub async fn handle_match_cv_jd(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let mut uploads = collect_uploads(multipart).await?;
    let cv = take_upload(&mut uploads, "cv_file", ".pdf", "CV file must be PDF format")?;
    let jd = take_upload(&mut uploads, "jd_file", ".txt", "JD file must be TXT format")?;
    let jd_text = decode_jd(&jd.bytes)?;

    let labels = MatchLabels {
        cv: cv.filename.clone(),
        jd: jd.filename.clone(),
    };
    let outcome = state.pipeline.run(&cv.bytes, &jd_text, &labels).await?;
    info!(
        cv = %labels.cv,
        jd = %labels.jd,
        final_score = outcome.result.final_score,
        "CV/JD match completed"
    );

    Ok(Json(MatchResponse {
        status: "success",
        cv_filename: cv.filename,
        jd_filename: jd.filename,
        jd_text: truncate_jd(&jd_text),
        extracted_cv_info: outcome.profile,
        matching_result: outcome.result,
    }))
}
