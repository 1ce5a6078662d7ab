//! Tutor Instructions
//!
//! System instructions for each kind of tutor turn, plus the builders that
//! embed course content into the matching user instructions. Defaults are
//! compiled in; a deployment can replace any of them with a Markdown file.

use crate::catalog::{Module, Pedagogy};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const WELCOME: &str = "You are a friendly and encouraging AI programming tutor. Your goal is to explain concepts to a brand new student.
Use simple, welcoming language.
**Format your output using Markdown.** Use backticks for `code` and code blocks for examples.";

const TRANSITION: &str = "You are an AI tutor. Seamlessly transition to the next topic.
Explain the following concept simply and clearly.
**Use Markdown for formatting, especially for code examples.**";

const FEEDBACK_CODE_SUBMISSION: &str = "You are a helpful and patient AI programming tutor. Your role is to analyze a student's code and provide constructive feedback.
- If the code is correct, praise them enthusiastically.
- If the code is incorrect, gently point out the mistake without giving the direct answer.
- **Format your entire response using Markdown.** Use backticks for `code` and bold for emphasis.
- Keep your feedback concise (2-4 sentences).";

const FEEDBACK_GUIDED_HINT: &str = "You are a warm and patient tutor guiding a student through a concept in their own words.
- If the answer captures the idea, tell them it is correct and praise them warmly.
- If the answer is incomplete or off track, do not reveal the answer. Ask one guiding question or give a single hint that points them in the right direction.
- **Format your response using Markdown.**
- Keep your reply short (2-4 sentences).";

/// The set of system instructions used by the lesson engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSet {
    pub welcome: String,
    pub transition: String,
    pub feedback_code_submission: String,
    pub feedback_guided_hint: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            welcome: WELCOME.to_string(),
            transition: TRANSITION.to_string(),
            feedback_code_submission: FEEDBACK_CODE_SUBMISSION.to_string(),
            feedback_guided_hint: FEEDBACK_GUIDED_HINT.to_string(),
        }
    }
}

impl PromptSet {
    /// Builds a prompt set from the defaults, replacing any instruction whose
    /// key appears in `overrides`. Unknown keys are ignored with a warning.
    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        let mut prompts = Self::default();
        for (key, content) in overrides {
            let slot = match key.as_str() {
                "welcome" => &mut prompts.welcome,
                "transition" => &mut prompts.transition,
                "feedback_code_submission" => &mut prompts.feedback_code_submission,
                "feedback_guided_hint" => &mut prompts.feedback_guided_hint,
                _ => {
                    warn!(prompt = %key, "Ignoring unknown prompt override");
                    continue;
                }
            };
            info!(prompt = %key, "Using prompt override");
            *slot = content;
        }
        prompts
    }

    /// Loads overrides from the `.md` files in `dir`, keyed by file stem.
    ///
    /// A missing directory is not an error; the defaults are used as-is.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut overrides = HashMap::new();
        if !dir.is_dir() {
            info!(path = %dir.display(), "No prompt overrides directory; using built-in instructions.");
            return Ok(Self::default());
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
                let prompt_key = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .context("Could not get file stem")?
                    .to_string();
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read prompt {}", path.display()))?;
                overrides.insert(prompt_key, content);
            }
        }
        Ok(Self::with_overrides(overrides))
    }

    /// The feedback instruction matching a course's teaching style.
    pub fn feedback_for(&self, pedagogy: Pedagogy) -> &str {
        match pedagogy {
            Pedagogy::CodeSubmission => &self.feedback_code_submission,
            Pedagogy::GuidedHint => &self.feedback_guided_hint,
        }
    }
}

pub fn welcome_request(module: &Module) -> String {
    format!(
        "Please start the lesson by explaining this concept: '{}'",
        module.explanation
    )
}

pub fn transition_request(next: &Module) -> String {
    format!("Explain this next concept: '{}'", next.explanation)
}

/// Describes the question, the verbatim submission and the advisory keywords.
pub fn feedback_request(module: &Module, pedagogy: Pedagogy, answer: &str) -> String {
    let question = module.question.as_deref().unwrap_or("(no question was posed)");
    let keywords = module
        .answer_keywords
        .iter()
        .map(|keyword| format!("`{}`", keyword))
        .collect::<Vec<_>>()
        .join(", ");

    match pedagogy {
        Pedagogy::CodeSubmission => format!(
            "The student was asked this question: '{question}'\n\n\
             They submitted the following code:\n`{answer}`\n\n\
             The key components of a correct answer are: [{keywords}]. Please provide feedback based on their submission."
        ),
        Pedagogy::GuidedHint => format!(
            "The student was asked this question: '{question}'\n\n\
             They answered:\n> {answer}\n\n\
             A good answer touches on ideas such as: [{keywords}]. Please respond based on their answer."
        ),
    }
}
