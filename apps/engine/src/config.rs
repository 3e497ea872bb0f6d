use anyhow::{bail, Context, Result};

/// Which semantic similarity backend to construct at startup.
///
/// `None` is the degrade path: the matcher runs with a permanently-zero
/// semantic signal rather than failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SemanticBackend {
    #[default]
    None,
    /// Deterministic feature-hashed bag-of-tokens embedding.
    Hash,
}

impl SemanticBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Ok(SemanticBackend::None),
            "hash" => Ok(SemanticBackend::Hash),
            other => bail!("unknown semantic backend '{other}' (expected 'none' or 'hash')"),
        }
    }
}

/// Tuning knobs for the matching pipeline, loaded from environment variables.
/// The score blend coefficients are contractual and live as constants in
/// `matching::aggregate`; only the heuristics below are configurable.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Minimum edit-similarity ratio (0-100 scale) for a fuzzy hit.
    pub fuzzy_ratio_threshold: f64,
    /// Substring containment only counts for job skills longer than this.
    pub fuzzy_min_token_len: usize,
    pub semantic_backend: SemanticBackend,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_ratio_threshold: 80.0,
            fuzzy_min_token_len: 2,
            semantic_backend: SemanticBackend::None,
        }
    }
}

impl MatcherConfig {
    /// Reads overrides from the environment (`.env` honored if present).
    /// Unset variables fall back to defaults; malformed values are an error.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Self::default();

        let fuzzy_ratio_threshold = match std::env::var("ENGINE_FUZZY_THRESHOLD") {
            Ok(raw) => raw
                .parse::<f64>()
                .context("ENGINE_FUZZY_THRESHOLD must be a number")?,
            Err(_) => defaults.fuzzy_ratio_threshold,
        };
        if !(0.0..=100.0).contains(&fuzzy_ratio_threshold) {
            bail!("ENGINE_FUZZY_THRESHOLD must be within 0-100, got {fuzzy_ratio_threshold}");
        }

        let fuzzy_min_token_len = match std::env::var("ENGINE_FUZZY_MIN_TOKEN_LEN") {
            Ok(raw) => raw
                .parse::<usize>()
                .context("ENGINE_FUZZY_MIN_TOKEN_LEN must be a non-negative integer")?,
            Err(_) => defaults.fuzzy_min_token_len,
        };

        let semantic_backend = match std::env::var("ENGINE_SEMANTIC_BACKEND") {
            Ok(raw) => SemanticBackend::parse(&raw)?,
            Err(_) => defaults.semantic_backend,
        };

        Ok(Self {
            fuzzy_ratio_threshold,
            fuzzy_min_token_len,
            semantic_backend,
        })
    }
}
