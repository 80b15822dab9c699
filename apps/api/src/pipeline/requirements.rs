//! Requirements extraction and normalization stages.

use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client::{recover_json, TextGenerator};
use crate::pipeline::prompts::{
    NORMALIZE_PROMPT_TEMPLATE, NORMALIZE_SYSTEM, REQUIREMENTS_PROMPT_TEMPLATE, REQUIREMENTS_SYSTEM,
};

/// Extracts a structured requirements object from raw job-description text.
///
/// Recognized keys: title, responsibilities, must_have, nice_to_have,
/// experience_years, skills, keywords. A malformed model response degrades to
/// `{"raw": <model output>}` and the pipeline continues with it.
pub async fn extract_requirements(
    jd_text: &str,
    llm: &dyn TextGenerator,
) -> Result<Value, AppError> {
    let prompt = REQUIREMENTS_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);
    let out = llm
        .generate(REQUIREMENTS_SYSTEM, &prompt, 800, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("requirements extraction failed: {e}")))?;

    let fallback = json!({ "raw": &out });
    Ok(recover_json(&out, fallback))
}

/// Second model pass: rewrites vague or metaphorical requirement text into
/// concrete technical terms while preserving the object's structure.
/// Same fallback shape as extraction.
pub async fn normalize_requirements(
    requirements: &Value,
    llm: &dyn TextGenerator,
) -> Result<Value, AppError> {
    let prompt =
        NORMALIZE_PROMPT_TEMPLATE.replace("{requirements_json}", &requirements.to_string());
    let out = llm
        .generate(NORMALIZE_SYSTEM, &prompt, 800, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("requirements normalization failed: {e}")))?;

    let fallback = json!({ "raw": &out });
    Ok(recover_json(&out, fallback))
}

/// Job title precedence: non-blank caller override, then the extracted
/// `title` key, then empty.
pub fn resolve_job_title(override_title: &str, requirements: &Value) -> String {
    let trimmed = override_title.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    requirements
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
