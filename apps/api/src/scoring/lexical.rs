//! Lexical matcher: exact, case-insensitive keyword presence.
//!
//! Matching is plain substring containment on lower-cased text, NOT token-aware:
//! "SQL" matches inside "PostgreSQL". Existing scores depend on this, so keep it.

use serde::{Deserialize, Serialize};

use crate::scoring::criteria::SkillCriteria;

/// Partition of the criteria into skills found / not found in the resume.
///
/// Every criteria entry lands in exactly one list, with the casing it had in
/// the criteria (not the resume).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillMatchResult {
    /// Hard-match percentage in [0, 100]. Zero when there are no criteria.
    pub fn hard_score(&self) -> f64 {
        let total = self.matched.len() + self.missing.len();
        if total == 0 {
            return 0.0;
        }
        (self.matched.len() as f64 / total as f64) * 100.0
    }
}

pub fn match_skills(resume_text: &str, criteria: &SkillCriteria) -> SkillMatchResult {
    let resume_lower = resume_text.to_lowercase();

    let mut result = SkillMatchResult::default();
    for skill in criteria {
        if resume_lower.contains(&skill.to_lowercase()) {
            result.matched.push(skill.clone());
        } else {
            result.missing.push(skill.clone());
        }
    }
    result
}
