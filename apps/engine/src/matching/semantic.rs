//! Semantic similarity between the joined keyword texts of a CV and a job.
//!
//! Pluggable, trait-based provider selected once at startup. The default is
//! [`NoopSimilarity`]: a permanently-zero signal the aggregator tolerates, so
//! a missing embedding resource degrades matching instead of failing it.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use siphasher::sip::SipHasher13;
use tracing::info;

use crate::config::{MatcherConfig, SemanticBackend};

/// A semantic similarity backend. Implementations must be cheap to call and
/// deterministic; the matcher promises bit-identical results for identical
/// inputs.
pub trait SimilarityProvider: Send + Sync {
    /// Similarity in [0, 1] between the two keyword sets. Must return 0.0
    /// when either set is empty.
    fn similarity(&self, cv_skills: &[String], job_skills: &[String]) -> f64;

    fn name(&self) -> &'static str;
}

/// Constructs the provider the configuration asks for.
pub fn provider_from_config(config: &MatcherConfig) -> Arc<dyn SimilarityProvider> {
    let provider: Arc<dyn SimilarityProvider> = match config.semantic_backend {
        SemanticBackend::None => Arc::new(NoopSimilarity),
        SemanticBackend::Hash => Arc::new(HashEmbeddingSimilarity::default()),
    };
    info!(backend = provider.name(), "semantic similarity backend selected");
    provider
}

/// The degrade path: no semantic signal at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSimilarity;

impl SimilarityProvider for NoopSimilarity {
    fn similarity(&self, _cv_skills: &[String], _job_skills: &[String]) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

// Fixed seed keys; changing them changes every embedding.
const HASH_SEED_K0: u64 = 0x6d61_7463_6865_6e67;
const HASH_SEED_K1: u64 = 0x736b_696c_6c73_696d;

/// Feature-hashed bag-of-tokens embedding with cosine similarity.
///
/// Needs no model download: each whitespace token of the joined keyword blob
/// is hashed (SipHash-1-3 with fixed keys, so the embedding is stable across
/// processes and Rust versions) into a fixed-dimension vector with sign
/// hashing, then L2-normalized.
#[derive(Debug, Clone)]
pub struct HashEmbeddingSimilarity {
    dimension: usize,
}

impl Default for HashEmbeddingSimilarity {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

impl HashEmbeddingSimilarity {
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_token(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for token in text.split_whitespace() {
            let idx = self.hash_token(token);
            let sign = if self.hash_token(&format!("{token}_sign")) % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl SimilarityProvider for HashEmbeddingSimilarity {
    fn similarity(&self, cv_skills: &[String], job_skills: &[String]) -> f64 {
        if cv_skills.is_empty() || job_skills.is_empty() {
            return 0.0;
        }
        let cv_vec = self.embed(&cv_skills.join(" "));
        let job_vec = self.embed(&job_skills.join(" "));
        cosine_similarity(&cv_vec, &job_vec)
    }

    fn name(&self) -> &'static str {
        "hash"
    }
}

/// Cosine similarity mapped to [0, 1]. Zero vectors compare as 0.0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (f64::from(dot / (norm_a * norm_b)) + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_noop_always_zero() {
        let provider = NoopSimilarity;
        assert_eq!(
            provider.similarity(&skills(&["python"]), &skills(&["python"])),
            0.0
        );
    }

    #[test]
    fn test_identical_sets_score_one() {
        let provider = HashEmbeddingSimilarity::default();
        let cv = skills(&["python", "react", "docker"]);
        let sim = provider.similarity(&cv, &cv);
        assert!((sim - 1.0).abs() < 1e-6, "similarity was {sim}");
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let provider = HashEmbeddingSimilarity::default();
        assert_eq!(provider.similarity(&[], &skills(&["python"])), 0.0);
        assert_eq!(provider.similarity(&skills(&["python"]), &[]), 0.0);
    }

    #[test]
    fn test_similarity_is_deterministic() {
        let provider = HashEmbeddingSimilarity::default();
        let cv = skills(&["python", "django"]);
        let job = skills(&["python", "kubernetes"]);
        let first = provider.similarity(&cv, &job);
        let second = provider.similarity(&cv, &job);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_similarity_stays_in_unit_interval() {
        let provider = HashEmbeddingSimilarity::with_dimension(16);
        let cv = skills(&["python", "java", "go", "rust"]);
        let job = skills(&["teamwork", "leadership"]);
        let sim = provider.similarity(&cv, &job);
        assert!((0.0..=1.0).contains(&sim), "similarity was {sim}");
    }

    #[test]
    fn test_overlapping_sets_score_higher_than_disjoint() {
        let provider = HashEmbeddingSimilarity::default();
        let cv = skills(&["python", "react", "docker"]);
        let overlapping = skills(&["python", "react", "kubernetes"]);
        let disjoint = skills(&["teamwork", "leadership", "creativity"]);
        assert!(
            provider.similarity(&cv, &overlapping) > provider.similarity(&cv, &disjoint)
        );
    }

    #[test]
    fn test_cosine_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_provider_selection_follows_config() {
        let mut config = MatcherConfig::default();
        assert_eq!(provider_from_config(&config).name(), "noop");
        config.semantic_backend = SemanticBackend::Hash;
        assert_eq!(provider_from_config(&config).name(), "hash");
    }
}
