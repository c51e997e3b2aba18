//! Skill criteria: the validated, ordered list of job-required skills.
//!
//! Criteria reach the core only through these constructors. Stored or uploaded
//! skill lists are parsed as a JSON array of strings; nothing is ever evaluated
//! as free-form text.

use serde::Serialize;
use serde_json::Value;

use crate::scoring::error::ScoringError;

/// Ordered sequence of non-empty skill names.
///
/// Order is kept for display only. Duplicates are preserved: deduplication is
/// the caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillCriteria(Vec<String>);

impl SkillCriteria {
    pub fn new(skills: Vec<String>) -> Result<Self, ScoringError> {
        for (index, skill) in skills.iter().enumerate() {
            if skill.is_empty() {
                return Err(ScoringError::InvalidInput(format!(
                    "skill_criteria[{index}] must be a non-empty string"
                )));
            }
        }
        Ok(Self(skills))
    }

    /// Validates loosely-typed entries (e.g. a JSON request body).
    /// Nulls, numbers, objects and empty strings are rejected, never coerced.
    pub fn from_json_values(values: Vec<Value>) -> Result<Self, ScoringError> {
        let mut skills = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match value {
                Value::String(s) => skills.push(s),
                Value::Null => {
                    return Err(ScoringError::InvalidInput(format!(
                        "skill_criteria[{index}] is null"
                    )))
                }
                other => {
                    return Err(ScoringError::InvalidInput(format!(
                        "skill_criteria[{index}] must be a string, got {}",
                        json_type_name(&other)
                    )))
                }
            }
        }
        Self::new(skills)
    }

    /// Parses a JSON array literal such as `["Python", "SQL"]`.
    pub fn parse_json(raw: &str) -> Result<Self, ScoringError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| {
            ScoringError::InvalidInput(format!("skill_criteria is not valid JSON: {e}"))
        })?;
        match value {
            Value::Array(values) => Self::from_json_values(values),
            other => Err(ScoringError::InvalidInput(format!(
                "skill_criteria must be a JSON array, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whitespace-joined criteria, order preserved. Input to the semantic scorer.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl<'a> IntoIterator for &'a SkillCriteria {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
