//! Semantic scorer: cosine similarity between sentence embeddings of the
//! resume and of the whole criteria set.
//!
//! The embedding model itself is an injected collaborator (`Embedder`), built
//! once at startup and shared through `AppState`.

use async_trait::async_trait;
use tracing::debug;

use crate::scoring::criteria::SkillCriteria;
use crate::scoring::error::ScoringError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A sentence-embedding capability. The same instance (same model) must embed
/// both sides of a comparison for the similarity to mean anything.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BoxError>;
}

/// Cosine similarity in [-1, 1], accumulated in f64.
///
/// Returns `None` when the vectors differ in length. A zero-norm vector (e.g.
/// a degenerate embedding of empty text) yields `0.0` rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    // sqrt of the product keeps identical vectors at exactly 1.0
    Some(dot / (norm_a * norm_b).sqrt())
}

/// Soft score: `cosine(embed(resume), embed(joined criteria)) * 100`.
///
/// NOT clamped. The theoretical range is [-100, 100]; sentence embeddings are
/// rarely negative in practice, but callers must not assume a floor of 0.
/// Callers never pass empty resume text (the combiner short-circuits first).
pub async fn semantic_score(
    resume_text: &str,
    criteria: &SkillCriteria,
    embedder: &dyn Embedder,
) -> Result<f64, ScoringError> {
    let joined = criteria.joined();

    let (resume_vec, criteria_vec) =
        tokio::try_join!(embedder.embed(resume_text), embedder.embed(&joined))
            .map_err(ScoringError::embedding)?;

    let similarity = cosine_similarity(&resume_vec, &criteria_vec).ok_or_else(|| {
        ScoringError::embedding(format!(
            "embedding dimensions differ: resume={} criteria={}",
            resume_vec.len(),
            criteria_vec.len()
        ))
    })?;

    debug!(
        resume_chars = resume_text.len(),
        criteria_chars = joined.len(),
        dims = resume_vec.len(),
        similarity,
        "Semantic similarity computed"
    );

    Ok(similarity * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::testing::{FailingEmbedder, FixedEmbedder, KeyedEmbedder};

    fn criteria(skills: &[&str]) -> SkillCriteria {
        SkillCriteria::new(skills.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = [0.3_f32, -1.7, 2.25, 0.01];
        assert_eq!(cosine_similarity(&v, &v), Some(1.0));
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
    }

    #[test]
    fn test_cosine_opposite_is_negative_one() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]), Some(-1.0));
    }

    #[test]
    fn test_cosine_zero_vector_is_zero_not_nan() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), Some(0.0));
    }

    #[test]
    fn test_cosine_length_mismatch_is_none() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), None);
    }

    #[tokio::test]
    async fn test_identical_embeddings_score_100() {
        let embedder = FixedEmbedder::new(vec![0.5, 0.5, 0.5]);
        let score = semantic_score("Python developer", &criteria(&["Python"]), &embedder)
            .await
            .unwrap();
        assert_eq!(score, 100.0);
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn test_embeds_whitespace_joined_criteria() {
        let embedder = KeyedEmbedder::new(vec![1.0, 0.0])
            .with("Python SQL AWS", vec![0.0, 1.0]);
        let score = semantic_score("resume body", &criteria(&["Python", "SQL", "AWS"]), &embedder)
            .await
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn test_negative_similarity_is_not_clamped() {
        let embedder = KeyedEmbedder::new(vec![1.0, 0.0]).with("Rust", vec![-1.0, 0.0]);
        let score = semantic_score("resume body", &criteria(&["Rust"]), &embedder)
            .await
            .unwrap();
        assert_eq!(score, -100.0);
    }

    #[tokio::test]
    async fn test_empty_criteria_does_not_crash() {
        // Degenerate zero vector for the empty joined string.
        let embedder = KeyedEmbedder::new(vec![1.0, 1.0]).with("", vec![0.0, 0.0]);
        let score = semantic_score("resume body", &criteria(&[]), &embedder)
            .await
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_embedding_failure() {
        let embedder = KeyedEmbedder::new(vec![1.0, 0.0]).with("Go", vec![1.0, 0.0, 0.0]);
        let err = semantic_score("resume body", &criteria(&["Go"]), &embedder)
            .await
            .unwrap_err();
        assert_eq!(err.collaborator(), Some(crate::scoring::error::Collaborator::Embedding));
    }

    #[tokio::test]
    async fn test_embedder_failure_propagates() {
        let err = semantic_score("resume body", &criteria(&["Go"]), &FailingEmbedder)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("embedding collaborator failed"));
    }
}
