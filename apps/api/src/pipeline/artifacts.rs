//! Cover letter and video script generation — the two downloadable artifacts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::pipeline::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM, VIDEO_SCRIPT_PROMPT_TEMPLATE,
    VIDEO_SCRIPT_SYSTEM,
};

/// Suggested download filenames. Artifacts are never stored server-side.
pub const COVER_LETTER_FILENAME: &str = "cover_letter.txt";
pub const VIDEO_SCRIPT_FILENAME: &str = "video_script.txt";

/// Cover letter tone selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Direct,
    Enthusiastic,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Direct => "direct",
            Tone::Enthusiastic => "enthusiastic",
        }
    }
}

impl FromStr for Tone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "friendly" => Ok(Tone::Friendly),
            "direct" => Ok(Tone::Direct),
            "enthusiastic" => Ok(Tone::Enthusiastic),
            _ => Err(()),
        }
    }
}

/// Generates a ~300-400 word cover letter calibrated to the requested tone.
pub async fn generate_cover_letter(
    profile_text: &str,
    requirements: &Value,
    job_title: &str,
    tone: Tone,
    llm: &dyn TextGenerator,
) -> Result<String, AppError> {
    let prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{tone}", tone.as_str())
        .replace("{job_title}", job_title)
        .replace("{requirements_json}", &requirements.to_string())
        .replace("{profile_text}", profile_text);

    llm.generate(COVER_LETTER_SYSTEM, &prompt, 700, 0.2)
        .await
        .map_err(|e| AppError::Llm(format!("cover letter generation failed: {e}")))
}

/// Generates a 60-second intro video script with timestamps and shot notes.
pub async fn generate_video_script(
    profile_text: &str,
    requirements: &Value,
    job_title: &str,
    name: &str,
    llm: &dyn TextGenerator,
) -> Result<String, AppError> {
    let name = if name.trim().is_empty() {
        "Candidate"
    } else {
        name.trim()
    };
    let prompt = VIDEO_SCRIPT_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{requirements_json}", &requirements.to_string())
        .replace("{name}", name)
        .replace("{profile_text}", profile_text);

    llm.generate(VIDEO_SCRIPT_SYSTEM, &prompt, 500, 0.3)
        .await
        .map_err(|e| AppError::Llm(format!("video script generation failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_parses_all_variants() {
        assert_eq!("professional".parse::<Tone>(), Ok(Tone::Professional));
        assert_eq!("Friendly".parse::<Tone>(), Ok(Tone::Friendly));
        assert_eq!(" direct ".parse::<Tone>(), Ok(Tone::Direct));
        assert_eq!("ENTHUSIASTIC".parse::<Tone>(), Ok(Tone::Enthusiastic));
    }

    #[test]
    fn test_unknown_tone_is_an_error() {
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_tone_default_is_professional() {
        assert_eq!(Tone::default(), Tone::Professional);
    }

    #[test]
    fn test_tone_serde_lowercase() {
        let tone: Tone = serde_json::from_str(r#""friendly""#).unwrap();
        assert_eq!(tone, Tone::Friendly);
        assert_eq!(serde_json::to_string(&Tone::Direct).unwrap(), r#""direct""#);
    }
}
