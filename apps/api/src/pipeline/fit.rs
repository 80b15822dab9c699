//! Resume skills extraction and fit analysis stages.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client::{recover_json, TextGenerator};
use crate::pipeline::prompts::{
    FIT_PROMPT_TEMPLATE, FIT_SYSTEM, SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM,
};

/// Severity band for a match score: strong ≥ 80, moderate 50–79, low < 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,
    Moderate,
    Low,
}

impl MatchBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            MatchBand::Strong
        } else if score >= 50 {
            MatchBand::Moderate
        } else {
            MatchBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchBand::Strong => "Strong match — apply with confidence.",
            MatchBand::Moderate => "Moderate match — emphasize transferable skills.",
            MatchBand::Low => "Low match — consider closing the key gaps first.",
        }
    }
}

/// Model-generated comparison of the candidate's skills against the
/// normalized requirements. Missing fields deserialize to the same defaults
/// the full fallback uses, so a partially valid response keeps what it has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitAnalysis {
    #[serde(default)]
    pub match_score: u32,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default = "unavailable")]
    pub project_suggestion: String,
    #[serde(default = "unavailable")]
    pub advice: String,
}

fn unavailable() -> String {
    "error: fit analysis unavailable".to_string()
}

impl FitAnalysis {
    /// Fixed zero-score object used when the model response cannot be parsed
    /// at all.
    pub fn fallback() -> Self {
        Self {
            match_score: 0,
            missing_keywords: Vec::new(),
            project_suggestion: unavailable(),
            advice: unavailable(),
        }
    }
}

/// Extracts a flat skill list from the candidate profile.
///
/// A blank profile yields an empty list without an LLM call; the fit stage
/// still runs so the user sees the full gap picture.
pub async fn extract_resume_skills(
    profile_text: &str,
    llm: &dyn TextGenerator,
) -> Result<Vec<String>, AppError> {
    if profile_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let prompt = SKILLS_PROMPT_TEMPLATE.replace("{profile_text}", profile_text);
    let out = llm
        .generate(SKILLS_SYSTEM, &prompt, 400, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("resume skills extraction failed: {e}")))?;

    let value = recover_json(&out, json!({ "skills": [] }));
    Ok(skill_list(&value))
}

fn skill_list(value: &Value) -> Vec<String> {
    value
        .get("skills")
        .and_then(Value::as_array)
        .map(|skills| {
            skills
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Scores the candidate against the requirements. Parse failure degrades to
/// the fixed zero-score fallback and the pipeline continues.
pub async fn analyze_fit(
    requirements: &Value,
    skills: &[String],
    llm: &dyn TextGenerator,
) -> Result<FitAnalysis, AppError> {
    let prompt = FIT_PROMPT_TEMPLATE
        .replace("{requirements_json}", &requirements.to_string())
        .replace("{skills_json}", &json!(skills).to_string());
    let out = llm
        .generate(FIT_SYSTEM, &prompt, 500, 0.0)
        .await
        .map_err(|e| AppError::Llm(format!("fit analysis failed: {e}")))?;

    let value = recover_json(&out, Value::Null);
    Ok(serde_json::from_value(value).unwrap_or_else(|_| FitAnalysis::fallback()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(MatchBand::from_score(100), MatchBand::Strong);
        assert_eq!(MatchBand::from_score(80), MatchBand::Strong);
        assert_eq!(MatchBand::from_score(79), MatchBand::Moderate);
        assert_eq!(MatchBand::from_score(50), MatchBand::Moderate);
        assert_eq!(MatchBand::from_score(49), MatchBand::Low);
        assert_eq!(MatchBand::from_score(0), MatchBand::Low);
    }

    #[test]
    fn test_fit_analysis_deserializes_full_object() {
        let value = json!({
            "match_score": 72,
            "missing_keywords": ["Kubernetes", "Terraform"],
            "project_suggestion": "Deploy a small service to a managed K8s cluster.",
            "advice": "Lead with your distributed-systems work."
        });
        let fit: FitAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(fit.match_score, 72);
        assert_eq!(fit.missing_keywords.len(), 2);
        assert_eq!(MatchBand::from_score(fit.match_score), MatchBand::Moderate);
    }

    #[test]
    fn test_fit_analysis_partial_object_keeps_what_it_has() {
        let value = json!({ "match_score": 91 });
        let fit: FitAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(fit.match_score, 91);
        assert!(fit.missing_keywords.is_empty());
        assert_eq!(fit.advice, "error: fit analysis unavailable");
    }

    #[test]
    fn test_fallback_is_zero_score() {
        let fit = FitAnalysis::fallback();
        assert_eq!(fit.match_score, 0);
        assert!(fit.missing_keywords.is_empty());
        assert_eq!(MatchBand::from_score(fit.match_score), MatchBand::Low);
    }

    #[test]
    fn test_skill_list_reads_skills_array() {
        let value = json!({"skills": ["rust", "sql", 7, "docker"]});
        // Non-string entries are dropped, not errors.
        assert_eq!(skill_list(&value), vec!["rust", "sql", "docker"]);
    }

    #[test]
    fn test_skill_list_empty_on_fallback_shape() {
        assert!(skill_list(&json!({"raw": "prose"})).is_empty());
        assert!(skill_list(&json!({"skills": "not an array"})).is_empty());
    }
}
