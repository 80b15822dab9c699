//! Axum route handlers for the pipeline API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::pipeline::artifacts::Tone;
use crate::pipeline::fit::{analyze_fit, extract_resume_skills, FitAnalysis, MatchBand};
use crate::pipeline::requirements::{extract_requirements, normalize_requirements};
use crate::pipeline::{run_pipeline, PipelineInput, PipelineOutput};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseRequirementsRequest {
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseRequirementsResponse {
    pub requirements: Value,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub requirements: Value,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub normalized_requirements: Value,
}

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub requirements: Value,
    #[serde(default)]
    pub profile_text: String,
}

#[derive(Debug, Serialize)]
pub struct FitResponse {
    pub resume_skills: Vec<String>,
    pub fit: FitAnalysis,
    pub match_band: MatchBand,
    pub match_band_label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub filename: String,
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/requirements/parse
///
/// Extracts the structured requirements object from raw JD text.
/// Useful for previewing extraction before running the full pipeline.
pub async fn handle_parse_requirements(
    State(state): State<AppState>,
    Json(request): Json<ParseRequirementsRequest>,
) -> Result<Json<ParseRequirementsResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let requirements = extract_requirements(&request.jd_text, state.llm.as_ref()).await?;

    Ok(Json(ParseRequirementsResponse { requirements }))
}

/// POST /api/v1/requirements/normalize
///
/// Second model pass over an already-extracted requirements object.
pub async fn handle_normalize_requirements(
    State(state): State<AppState>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let normalized_requirements =
        normalize_requirements(&request.requirements, state.llm.as_ref()).await?;

    Ok(Json(NormalizeResponse {
        normalized_requirements,
    }))
}

/// POST /api/v1/fit
///
/// Skills extraction plus fit analysis against a requirements object.
pub async fn handle_fit(
    State(state): State<AppState>,
    Json(request): Json<FitRequest>,
) -> Result<Json<FitResponse>, AppError> {
    let resume_skills = extract_resume_skills(&request.profile_text, state.llm.as_ref()).await?;
    let fit = analyze_fit(&request.requirements, &resume_skills, state.llm.as_ref()).await?;
    let match_band = MatchBand::from_score(fit.match_score);

    Ok(Json(FitResponse {
        resume_skills,
        fit,
        match_band,
        match_band_label: match_band.label(),
    }))
}

/// POST /api/v1/generate (multipart)
///
/// Full pipeline over uploaded files. Fields: `jd_file` (required),
/// `resume_file` (optional), `profile_text`, `name`, `job_title`, `tone`.
/// Pasted profile text, when non-blank, takes precedence over the resume file.
pub async fn handle_generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PipelineOutput>, AppError> {
    let mut jd_upload: Option<(String, Vec<u8>)> = None;
    let mut resume_upload: Option<(String, Vec<u8>)> = None;
    let mut profile_text = String::new();
    let mut name = String::new();
    let mut job_title = String::new();
    let mut tone = Tone::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart request: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "jd_file" | "resume_file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read {field_name}: {e}")))?
                    .to_vec();
                tracing::debug!(field = %field_name, file = %filename, bytes = data.len(), "upload received");
                if field_name == "jd_file" {
                    jd_upload = Some((filename, data));
                } else {
                    resume_upload = Some((filename, data));
                }
            }
            "profile_text" => profile_text = read_text_field(field).await?,
            "name" => name = read_text_field(field).await?,
            "job_title" => job_title = read_text_field(field).await?,
            "tone" => {
                let raw = read_text_field(field).await?;
                tone = raw.parse().unwrap_or_default();
            }
            _ => {} // unknown fields are ignored
        }
    }

    let Some((jd_name, jd_data)) = jd_upload else {
        return Err(AppError::Validation(
            "jd_file is required — upload a job description to continue".to_string(),
        ));
    };

    let jd_text = extract_text(&jd_data, &jd_name);
    let resume_text = resume_upload
        .map(|(filename, data)| extract_text(&data, &filename))
        .unwrap_or_default();
    let profile_text = if profile_text.trim().is_empty() {
        resume_text
    } else {
        profile_text
    };

    let output = run_pipeline(
        state.llm.as_ref(),
        PipelineInput {
            jd_text,
            profile_text,
            name,
            job_title_override: job_title,
            tone,
        },
    )
    .await?;

    Ok(Json(output))
}

/// POST /api/v1/download
///
/// Echoes posted artifact text back as a text/plain attachment so the browser
/// can save it. Nothing is stored server-side.
pub async fn handle_download(Json(request): Json<DownloadRequest>) -> Result<Response, AppError> {
    if request.filename.trim().is_empty() {
        return Err(AppError::Validation("filename cannot be empty".to_string()));
    }

    let filename = sanitize_filename(&request.filename);
    let disposition = format!("attachment; filename=\"{filename}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        request.content,
    )
        .into_response())
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read text field: {e}")))
}

/// Keeps the download filename header-safe: strips quotes, path separators,
/// and control characters.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '/') && !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_unsafe_characters() {
        assert_eq!(
            sanitize_filename("../secret/\"cover\".txt"),
            "..secretcover.txt"
        );
        assert_eq!(sanitize_filename("cover_letter.txt"), "cover_letter.txt");
        assert_eq!(sanitize_filename("a\r\nb.txt"), "ab.txt");
    }
}
