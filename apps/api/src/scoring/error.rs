use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The external capability that failed during an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    Embedding,
    TextGeneration,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::Embedding => f.write_str("embedding"),
            Collaborator::TextGeneration => f.write_str("text-generation"),
        }
    }
}

/// Errors surfaced by the scoring core.
///
/// An empty resume is NOT an error: it produces a defined zero-score result.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{collaborator} collaborator failed: {message}")]
    CollaboratorFailure {
        collaborator: Collaborator,
        message: String,
    },
}

impl ScoringError {
    pub fn embedding(err: impl fmt::Display) -> Self {
        ScoringError::CollaboratorFailure {
            collaborator: Collaborator::Embedding,
            message: err.to_string(),
        }
    }

    pub fn text_generation(err: impl fmt::Display) -> Self {
        ScoringError::CollaboratorFailure {
            collaborator: Collaborator::TextGeneration,
            message: err.to_string(),
        }
    }

    /// Returns the failing collaborator, if this is a collaborator failure.
    pub fn collaborator(&self) -> Option<Collaborator> {
        match self {
            ScoringError::CollaboratorFailure { collaborator, .. } => Some(*collaborator),
            ScoringError::InvalidInput(_) => None,
        }
    }
}
