//! Hybrid combiner: the single entry point of the scoring core.
//!
//! Blends the lexical hard-match percentage with the semantic soft score:
//!
//! ```text
//! final = trunc(0.6 * hard + 0.4 * soft)
//! High  : final >= 80
//! Medium: 50 <= final < 80
//! Low   : final < 50
//! ```
//!
//! Weights and thresholds are fixed policy, not configuration.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::scoring::criteria::SkillCriteria;
use crate::scoring::error::ScoringError;
use crate::scoring::feedback::{fallback_feedback, generate_feedback, TextGenerator};
use crate::scoring::lexical::{match_skills, SkillMatchResult};
use crate::scoring::semantic::{semantic_score, Embedder};

pub const HARD_MATCH_WEIGHT: f64 = 0.6;
pub const SEMANTIC_WEIGHT: f64 = 0.4;
pub const HIGH_THRESHOLD: i32 = 80;
pub const MEDIUM_THRESHOLD: i32 = 50;

pub const NO_TEXT_FEEDBACK: &str =
    "No text could be extracted from your resume. Please try a different file.";
pub const DEGRADED_FEEDBACK: &str =
    "Personalised feedback is unavailable right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Low,
    Medium,
    High,
}

impl Verdict {
    pub fn from_score(score: i32) -> Self {
        if score >= HIGH_THRESHOLD {
            Verdict::High
        } else if score >= MEDIUM_THRESHOLD {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }
}

/// The value returned to callers. Built fresh per evaluation, never persisted here.
///
/// `score` is normally in [0, 100]. Because semantic similarity is not clamped,
/// a strongly dissimilar resume can in theory push it below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceResult {
    pub score: i32,
    pub verdict: Verdict,
    #[serde(rename = "matched_skills")]
    pub matched: Vec<String>,
    #[serde(rename = "missing_skills")]
    pub missing: Vec<String>,
    pub feedback: String,
}

impl RelevanceResult {
    /// Zero-score result for a resume with no usable text: nothing matched,
    /// every criterion missing, `message` as the feedback.
    pub fn no_text(criteria: &SkillCriteria, message: &str) -> Self {
        Self {
            score: 0,
            verdict: Verdict::Low,
            matched: vec![],
            missing: criteria.as_slice().to_vec(),
            feedback: message.to_string(),
        }
    }
}

/// Everything in a result except the feedback text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResume {
    pub hard_score: f64,
    pub soft_score: f64,
    pub score: i32,
    pub verdict: Verdict,
    pub skills: SkillMatchResult,
}

impl ScoredResume {
    pub fn with_feedback(self, feedback: String) -> RelevanceResult {
        RelevanceResult {
            score: self.score,
            verdict: self.verdict,
            matched: self.skills.matched,
            missing: self.skills.missing,
            feedback,
        }
    }
}

/// How a text-generation failure is handled once the resume has been scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackPolicy {
    /// Fail the evaluation with `CollaboratorFailure(TextGeneration)`.
    #[default]
    Propagate,
    /// Keep the score and substitute `DEGRADED_FEEDBACK` followed by the
    /// per-skill action plan.
    Degrade,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: RelevanceResult,
    pub feedback_degraded: bool,
}

/// `trunc(0.6 * hard + 0.4 * soft)`, truncating toward zero.
pub fn blend(hard_score: f64, soft_score: f64) -> i32 {
    (HARD_MATCH_WEIGHT * hard_score + SEMANTIC_WEIGHT * soft_score).trunc() as i32
}

/// Lexical + semantic scoring of non-empty resume text.
pub async fn score_resume(
    resume_text: &str,
    criteria: &SkillCriteria,
    embedder: &dyn Embedder,
) -> Result<ScoredResume, ScoringError> {
    let skills = match_skills(resume_text, criteria);
    let hard_score = skills.hard_score();
    let soft_score = semantic_score(resume_text, criteria, embedder).await?;

    let score = blend(hard_score, soft_score);
    let verdict = Verdict::from_score(score);

    debug!(hard_score, soft_score, score, ?verdict, "Resume scored");

    Ok(ScoredResume {
        hard_score,
        soft_score,
        score,
        verdict,
        skills,
    })
}

/// Scores a resume against job criteria and attaches coaching feedback.
///
/// Empty resume text short-circuits to a zero-score result without touching
/// either collaborator. Collaborator failures propagate; nothing is retried.
pub async fn evaluate(
    resume_text: &str,
    criteria: &SkillCriteria,
    embedder: &dyn Embedder,
    generator: &dyn TextGenerator,
) -> Result<RelevanceResult, ScoringError> {
    evaluate_with_policy(
        resume_text,
        criteria,
        embedder,
        generator,
        FeedbackPolicy::Propagate,
    )
    .await
    .map(|evaluation| evaluation.result)
}

pub async fn evaluate_with_policy(
    resume_text: &str,
    criteria: &SkillCriteria,
    embedder: &dyn Embedder,
    generator: &dyn TextGenerator,
    policy: FeedbackPolicy,
) -> Result<Evaluation, ScoringError> {
    if resume_text.is_empty() {
        info!(criteria = criteria.len(), "Empty resume text, returning zero score");
        return Ok(Evaluation {
            result: RelevanceResult::no_text(criteria, NO_TEXT_FEEDBACK),
            feedback_degraded: false,
        });
    }

    let scored = score_resume(resume_text, criteria, embedder).await?;

    let (feedback, feedback_degraded) =
        match generate_feedback(&scored.skills.matched, &scored.skills.missing, generator).await {
            Ok(text) => (text, false),
            Err(e) if policy == FeedbackPolicy::Degrade => {
                warn!(collaborator = ?e.collaborator(), "Feedback generation failed, degrading: {e}");
                (fallback_feedback(DEGRADED_FEEDBACK, &scored.skills.missing), true)
            }
            Err(e) => return Err(e),
        };

    info!(
        hard_score = scored.hard_score,
        soft_score = scored.soft_score,
        score = scored.score,
        verdict = ?scored.verdict,
        matched = scored.skills.matched.len(),
        missing = scored.skills.missing.len(),
        feedback_degraded,
        "Evaluation complete"
    );

    Ok(Evaluation {
        result: scored.with_feedback(feedback),
        feedback_degraded,
    })
}
