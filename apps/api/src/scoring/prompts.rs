// Prompt constants for resume coaching feedback.

/// Placeholder rendered when a skill list is empty.
pub const EMPTY_LIST_PLACEHOLDER: &str = "None";

/// Coaching prompt, split around the two skill lists so caller text is
/// inserted once and never re-scanned.
pub const FEEDBACK_PROMPT_INTRO: &str = "\
As a helpful career coach, provide personalized, actionable feedback for a student's resume.
The student is applying for a job that requires the following skills:
Matched Skills: ";

pub const FEEDBACK_PROMPT_MISSING_LABEL: &str = "\nMissing Skills: ";

pub const FEEDBACK_PROMPT_ADVICE: &str = "

Based on this, offer a concise paragraph of advice. Focus on how to acquire or demonstrate \
the missing skills to improve their resume and job prospects.";

/// Lead-in shown above the action plan when personalised feedback is unavailable.
pub const ACTION_PLAN_INTRO: &str =
    "Here are some steps to bridge your skill gaps and boost your score:";

/// Advice attached to each missing skill in the action plan.
pub const ACTION_PLAN_STEP_ADVICE: &str =
    "Consider completing an online certification or a personal project focused on this technology.";
