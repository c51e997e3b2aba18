//! Feedback generator: renders the coaching prompt and returns the text
//! collaborator's reply verbatim.
//!
//! The reply is not parsed or validated. Text generation may be
//! non-deterministic, so identical inputs can legitimately yield different
//! feedback while the score, verdict and skill lists stay identical.

use async_trait::async_trait;

use crate::scoring::error::ScoringError;
use crate::scoring::prompts::{
    ACTION_PLAN_INTRO, ACTION_PLAN_STEP_ADVICE, EMPTY_LIST_PLACEHOLDER, FEEDBACK_PROMPT_ADVICE,
    FEEDBACK_PROMPT_INTRO, FEEDBACK_PROMPT_MISSING_LABEL,
};
use crate::scoring::semantic::BoxError;

/// A text-generation capability (language model) invoked with a single prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, BoxError>;
}

/// Builds the deterministic coaching prompt for a matched/missing partition.
pub fn build_feedback_prompt(matched: &[String], missing: &[String]) -> String {
    let matched = render_skill_list(matched);
    let missing = render_skill_list(missing);
    [
        FEEDBACK_PROMPT_INTRO,
        matched.as_str(),
        FEEDBACK_PROMPT_MISSING_LABEL,
        missing.as_str(),
        FEEDBACK_PROMPT_ADVICE,
    ]
    .concat()
}

/// Deterministic study plan: one markdown step per missing skill, in order.
pub fn action_plan(missing: &[String]) -> Vec<String> {
    missing
        .iter()
        .map(|skill| format!("- **{skill}:** {ACTION_PLAN_STEP_ADVICE}"))
        .collect()
}

/// Fallback feedback built without the text collaborator. `notice` leads;
/// the action plan follows when any skill is missing.
pub fn fallback_feedback(notice: &str, missing: &[String]) -> String {
    let plan = action_plan(missing);
    if plan.is_empty() {
        return notice.to_string();
    }
    format!("{notice}\n\n{ACTION_PLAN_INTRO}\n{}", plan.join("\n"))
}

pub async fn generate_feedback(
    matched: &[String],
    missing: &[String],
    generator: &dyn TextGenerator,
) -> Result<String, ScoringError> {
    let prompt = build_feedback_prompt(matched, missing);
    generator
        .generate(&prompt)
        .await
        .map_err(ScoringError::text_generation)
}

fn render_skill_list(skills: &[String]) -> String {
    if skills.is_empty() {
        EMPTY_LIST_PLACEHOLDER.to_string()
    } else {
        skills.join(", ")
    }
}
