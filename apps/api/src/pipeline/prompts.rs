// All LLM prompt constants for the pipeline module.
// Each JSON-returning prompt instructs the model to emit raw JSON; the
// resilient parser in llm_client recovers the common prose-wrapped case.

/// System prompt for requirements extraction — enforces JSON-only output.
pub const REQUIREMENTS_SYSTEM: &str =
    "You are an expert technical recruiter and extractor. Return only valid JSON (no markdown).";

/// Requirements extraction prompt template. Replace `{jd_text}` before sending.
pub const REQUIREMENTS_PROMPT_TEMPLATE: &str = "Job description below. Extract a JSON object with keys:\n\
title (string), responsibilities (array of short strings), must_have (array), nice_to_have (array), \
experience_years (string or null), skills (array), keywords (array).\n\n\
Job description:\n{jd_text}\n\n\
IMPORTANT: Output only valid JSON.";

/// System prompt for requirements normalization — enforces JSON-only output.
pub const NORMALIZE_SYSTEM: &str =
    "You are a precise technical editor. Return only valid JSON (no markdown).";

/// Normalization prompt template. Replace `{requirements_json}` before sending.
pub const NORMALIZE_PROMPT_TEMPLATE: &str = "Below is a JSON object of extracted job requirements. \
Rewrite any vague, metaphorical, or marketing-flavored requirement text into concrete technical terms. \
Preserve the JSON structure and keys EXACTLY — same keys, same array shapes — changing only the wording of values.\n\n\
Requirements JSON:\n{requirements_json}\n\n\
IMPORTANT: Output only valid JSON with the same keys.";

/// System prompt for resume skills extraction — enforces JSON-only output.
pub const SKILLS_SYSTEM: &str =
    "You are an expert resume analyst. Return only valid JSON (no markdown).";

/// Skills extraction prompt template. Replace `{profile_text}` before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str = "Candidate profile below. Extract a JSON object with a single key:\n\
skills (array of short skill strings, e.g. languages, frameworks, tools, practices).\n\n\
Candidate profile:\n{profile_text}\n\n\
IMPORTANT: Output only valid JSON.";

/// System prompt for fit analysis — enforces JSON-only output.
pub const FIT_SYSTEM: &str =
    "You are a pragmatic career advisor comparing a candidate against job requirements. \
    Return only valid JSON (no markdown).";

/// Fit analysis prompt template.
/// Replace `{requirements_json}` and `{skills_json}` before sending.
pub const FIT_PROMPT_TEMPLATE: &str = "Compare the candidate's skills against the job requirements below.\n\n\
Job requirements JSON:\n{requirements_json}\n\n\
Candidate skills JSON (may be empty if no resume was provided):\n{skills_json}\n\n\
Return a JSON object with keys:\n\
match_score (integer 0-100), missing_keywords (array of strings), \
project_suggestion (one short string describing a small project that would bridge the biggest gap), \
advice (one short string of strategic advice).\n\n\
IMPORTANT: Output only valid JSON.";

/// System prompt for cover letter generation — plain-text output.
pub const COVER_LETTER_SYSTEM: &str =
    "You are a helpful career coach that writes tailored cover letters.";

/// Cover letter prompt template.
/// Replace: `{tone}`, `{job_title}`, `{requirements_json}`, `{profile_text}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "\
Write a concise, tailored cover letter for the job below. Use the candidate's profile to highlight exact matches to the MUST_HAVE requirements.
Keep it to ~300-400 words. Use a confident, {tone} tone.

Job title: {job_title}
Extracted requirements JSON: {requirements_json}

Candidate profile / resume:
{profile_text}

Output the cover letter as plain text (no headers).";

/// System prompt for video script generation — plain-text output.
pub const VIDEO_SCRIPT_SYSTEM: &str =
    "You are a scriptwriter for short professional intro videos.";

/// Video script prompt template.
/// Replace: `{job_title}`, `{requirements_json}`, `{name}`, `{profile_text}`.
pub const VIDEO_SCRIPT_PROMPT_TEMPLATE: &str = "\
Produce a one-minute (60 seconds) video script introducing the candidate for this role.
Provide timestamps for sections (e.g., 0:00-0:10) and short camera/shot suggestions (e.g., medium close-up).
Keep it natural, concise and persuasive.

Job title: {job_title}
Extracted requirements: {requirements_json}
Candidate name: {name}
Candidate profile:
{profile_text}

Make the script ~60 seconds and include a 1-line spoken call-to-action at the end (e.g., 'I'd love to discuss how I can help at ...').";
