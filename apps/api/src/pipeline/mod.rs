// Pipeline: JD text → requirements → normalization → skills → fit → artifacts.
// Stages are independent functions over plain data and the TextGenerator
// seam, strictly sequenced by run_pipeline. All LLM calls go through
// llm_client — no direct vendor API calls here.

pub mod artifacts;
pub mod fit;
pub mod handlers;
pub mod prompts;
pub mod requirements;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::pipeline::artifacts::{
    generate_cover_letter, generate_video_script, Tone, COVER_LETTER_FILENAME,
    VIDEO_SCRIPT_FILENAME,
};
use crate::pipeline::fit::{analyze_fit, extract_resume_skills, FitAnalysis, MatchBand};
use crate::pipeline::requirements::{
    extract_requirements, normalize_requirements, resolve_job_title,
};

/// Inputs for one full pipeline run — plain data only, already extracted from
/// any uploads, so every stage is testable without a network.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub jd_text: String,
    pub profile_text: String,
    pub name: String,
    pub job_title_override: String,
    pub tone: Tone,
}

/// Everything a single interaction produces. Nothing outlives the response.
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub requirements: Value,
    pub normalized_requirements: Value,
    pub resume_skills: Vec<String>,
    pub fit: FitAnalysis,
    pub match_band: MatchBand,
    pub match_band_label: &'static str,
    pub job_title: String,
    pub cover_letter: String,
    pub cover_letter_filename: &'static str,
    pub video_script: String,
    pub video_script_filename: &'static str,
}

/// Runs the full sequence. An empty job description is a blocking validation
/// error before any LLM call; after that, stages degrade (never abort) on
/// malformed model output, and every downstream stage consumes degraded data
/// as if it were valid.
pub async fn run_pipeline(
    llm: &dyn TextGenerator,
    input: PipelineInput,
) -> Result<PipelineOutput, AppError> {
    if input.jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "job description text is empty — upload a job description to continue".to_string(),
        ));
    }

    let requirements = extract_requirements(&input.jd_text, llm).await?;
    info!("requirements extracted");

    let normalized_requirements = normalize_requirements(&requirements, llm).await?;
    info!("requirements normalized");

    let resume_skills = extract_resume_skills(&input.profile_text, llm).await?;
    let fit = analyze_fit(&normalized_requirements, &resume_skills, llm).await?;
    info!(score = fit.match_score, "fit analysis complete");

    let job_title = resolve_job_title(&input.job_title_override, &requirements);

    let cover_letter = generate_cover_letter(
        &input.profile_text,
        &normalized_requirements,
        &job_title,
        input.tone,
        llm,
    )
    .await?;
    info!("cover letter generated");

    let video_script = generate_video_script(
        &input.profile_text,
        &normalized_requirements,
        &job_title,
        &input.name,
        llm,
    )
    .await?;
    info!("video script generated");

    let match_band = MatchBand::from_score(fit.match_score);

    Ok(PipelineOutput {
        requirements,
        normalized_requirements,
        resume_skills,
        match_band,
        match_band_label: match_band.label(),
        fit,
        job_title,
        cover_letter,
        cover_letter_filename: COVER_LETTER_FILENAME,
        video_script,
        video_script_filename: VIDEO_SCRIPT_FILENAME,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::pipeline::prompts::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Deterministic TextGenerator that labels each call by its system prompt
    /// and records the order.
    struct ScriptedGenerator {
        calls: Mutex<Vec<&'static str>>,
        /// stage label → canned response; unlisted stages get valid defaults.
        responses: Vec<(&'static str, String)>,
    }

    impl ScriptedGenerator {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Vec::new(),
            }
        }

        fn with_response(mut self, stage: &'static str, response: &str) -> Self {
            self.responses.push((stage, response.to_string()));
            self
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn default_response(stage: &str) -> String {
            match stage {
                "requirements" => json!({
                    "title": "Senior Rust Engineer",
                    "responsibilities": ["build services"],
                    "must_have": ["Rust"],
                    "nice_to_have": ["Kubernetes"],
                    "experience_years": "5+",
                    "skills": ["Rust", "SQL"],
                    "keywords": ["rust", "backend"]
                })
                .to_string(),
                "normalize" => json!({
                    "title": "Senior Rust Engineer",
                    "responsibilities": ["design and operate backend services"],
                    "must_have": ["Rust (async, tokio)"],
                    "nice_to_have": ["Kubernetes"],
                    "experience_years": "5+",
                    "skills": ["Rust", "SQL"],
                    "keywords": ["rust", "backend"]
                })
                .to_string(),
                "skills" => json!({"skills": ["Rust", "Python"]}).to_string(),
                "fit" => json!({
                    "match_score": 85,
                    "missing_keywords": ["Kubernetes"],
                    "project_suggestion": "Deploy a toy service on K8s.",
                    "advice": "Lead with Rust depth."
                })
                .to_string(),
                "cover" => "Dear hiring manager, ...".to_string(),
                "script" => "0:00-0:10 (medium close-up) Hi, I'm ...".to_string(),
                other => panic!("unexpected stage {other}"),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            system: &str,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            let stage = match system {
                REQUIREMENTS_SYSTEM => "requirements",
                NORMALIZE_SYSTEM => "normalize",
                SKILLS_SYSTEM => "skills",
                FIT_SYSTEM => "fit",
                COVER_LETTER_SYSTEM => "cover",
                VIDEO_SCRIPT_SYSTEM => "script",
                other => panic!("unknown system prompt: {other}"),
            };
            self.calls.lock().unwrap().push(stage);

            let response = self
                .responses
                .iter()
                .find(|(s, _)| *s == stage)
                .map(|(_, r)| r.clone())
                .unwrap_or_else(|| Self::default_response(stage));
            Ok(response)
        }
    }

    fn full_input() -> PipelineInput {
        PipelineInput {
            jd_text: "Senior Rust Engineer. 5+ years Rust required.".to_string(),
            profile_text: "Rust developer, 6 years, built trading systems.".to_string(),
            name: "Alex Doe".to_string(),
            job_title_override: String::new(),
            tone: Tone::Professional,
        }
    }

    #[tokio::test]
    async fn test_empty_jd_blocks_before_any_llm_call() {
        let llm = ScriptedGenerator::new();
        let input = PipelineInput {
            jd_text: "   \n".to_string(),
            ..full_input()
        };

        let err = run_pipeline(&llm, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(llm.calls().is_empty(), "no external call may happen");
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let llm = ScriptedGenerator::new();
        run_pipeline(&llm, full_input()).await.unwrap();

        assert_eq!(
            llm.calls(),
            vec!["requirements", "normalize", "skills", "fit", "cover", "script"]
        );
    }

    #[tokio::test]
    async fn test_full_run_output() {
        let llm = ScriptedGenerator::new();
        let output = run_pipeline(&llm, full_input()).await.unwrap();

        assert_eq!(output.job_title, "Senior Rust Engineer");
        assert_eq!(output.resume_skills, vec!["Rust", "Python"]);
        assert_eq!(output.fit.match_score, 85);
        assert_eq!(output.match_band, MatchBand::Strong);
        assert_eq!(output.cover_letter_filename, "cover_letter.txt");
        assert_eq!(output.video_script_filename, "video_script.txt");
        assert!(!output.cover_letter.is_empty());
        assert!(!output.video_script.is_empty());
    }

    #[tokio::test]
    async fn test_prose_wrapped_requirements_still_parse() {
        let llm = ScriptedGenerator::new().with_response(
            "requirements",
            "Here you go:\n{\"title\": \"Data Engineer\", \"skills\": [\"SQL\"]}\nEnjoy!",
        );
        let output = run_pipeline(&llm, full_input()).await.unwrap();
        assert_eq!(output.requirements["title"], "Data Engineer");
        assert_eq!(output.job_title, "Data Engineer");
    }

    #[tokio::test]
    async fn test_unparseable_requirements_degrade_to_raw_wrapper() {
        let llm = ScriptedGenerator::new()
            .with_response("requirements", "I cannot produce JSON today, sorry.");
        let output = run_pipeline(&llm, full_input()).await.unwrap();

        assert_eq!(
            output.requirements,
            json!({"raw": "I cannot produce JSON today, sorry."})
        );
        // Downstream stages still ran on the degraded object.
        assert_eq!(llm.calls().len(), 6);
        assert_eq!(output.job_title, "");
    }

    #[tokio::test]
    async fn test_unparseable_fit_degrades_to_zero_score_fallback() {
        let llm = ScriptedGenerator::new().with_response("fit", "no braces at all");
        let output = run_pipeline(&llm, full_input()).await.unwrap();

        assert_eq!(output.fit.match_score, 0);
        assert_eq!(output.match_band, MatchBand::Low);
        assert_eq!(output.fit.advice, "error: fit analysis unavailable");
        // Artifacts are still generated after the degraded fit stage.
        assert!(!output.cover_letter.is_empty());
    }

    #[tokio::test]
    async fn test_blank_profile_skips_skills_call() {
        let llm = ScriptedGenerator::new();
        let input = PipelineInput {
            profile_text: String::new(),
            ..full_input()
        };
        let output = run_pipeline(&llm, input).await.unwrap();

        assert!(output.resume_skills.is_empty());
        assert_eq!(
            llm.calls(),
            vec!["requirements", "normalize", "fit", "cover", "script"]
        );
    }

    #[tokio::test]
    async fn test_job_title_override_beats_extraction() {
        let llm = ScriptedGenerator::new();
        let input = PipelineInput {
            job_title_override: "Principal Engineer".to_string(),
            ..full_input()
        };
        let output = run_pipeline(&llm, input).await.unwrap();
        assert_eq!(output.job_title, "Principal Engineer");
    }
}
