//! The matching pipeline: exact and fuzzy keyword matching, the optional
//! semantic signal, category-weighted scoring, and final aggregation.

pub mod aggregate;
pub mod category;
pub mod exact;
pub mod fuzzy;
pub mod gap;
pub mod keywords;
pub mod semantic;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::categories::CategoryRegistry;
use crate::config::MatcherConfig;
use crate::matching::aggregate::MatchResult;
use crate::matching::category::CategoryScores;
use crate::matching::gap::SkillGapReport;
use crate::matching::keywords::KeywordSet;
use crate::matching::semantic::{provider_from_config, SimilarityProvider};

/// Rounds to `places` decimal places, as the result contract requires.
pub(crate) fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// The matching engine: a pure function pipeline over immutable, startup-time
/// configuration. Cheap to clone (`Arc` internals) and safe to share across
/// threads; concurrent matches need no locking.
#[derive(Clone)]
pub struct Matcher {
    registry: Arc<CategoryRegistry>,
    similarity: Arc<dyn SimilarityProvider>,
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(
        registry: Arc<CategoryRegistry>,
        similarity: Arc<dyn SimilarityProvider>,
        config: MatcherConfig,
    ) -> Self {
        Self {
            registry,
            similarity,
            config,
        }
    }

    /// Built-in category table, no semantic backend, default heuristics.
    pub fn with_defaults() -> Self {
        let config = MatcherConfig::default();
        let similarity = provider_from_config(&config);
        Self::new(Arc::new(CategoryRegistry::defaults()), similarity, config)
    }

    /// Builds a matcher from environment configuration (see
    /// [`MatcherConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        let config = MatcherConfig::from_env()?;
        let similarity = provider_from_config(&config);
        Ok(Self::new(
            Arc::new(CategoryRegistry::defaults()),
            similarity,
            config,
        ))
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Matches one CV keyword set against one job keyword set.
    ///
    /// `cv_quality_score` is the host's overall CV score (0-100); it only
    /// influences recommendations, never the match percentage.
    pub fn match_skills(
        &self,
        cv_skills: &KeywordSet,
        job_skills: &KeywordSet,
        cv_quality_score: u8,
    ) -> MatchResult {
        let cv = cv_skills.as_slice();
        let job = job_skills.as_slice();

        let exact = exact::find_exact(cv, job);
        let fuzzy = fuzzy::find_fuzzy(cv, job, &exact, &self.config);
        let semantic = self.similarity.similarity(cv, job);
        let categories = category::category_scores(&self.registry, cv, job);

        debug!(
            exact = exact.len(),
            fuzzy = fuzzy.len(),
            semantic,
            categories = categories.len(),
            "match signals computed"
        );

        aggregate::aggregate(
            &self.registry,
            cv,
            job,
            exact,
            fuzzy,
            semantic,
            categories,
            cv_quality_score,
        )
    }

    /// Per-category score breakdown without the full aggregation.
    pub fn category_scores(
        &self,
        cv_skills: &KeywordSet,
        job_skills: &KeywordSet,
    ) -> CategoryScores {
        category::category_scores(&self.registry, cv_skills.as_slice(), job_skills.as_slice())
    }

    /// Market-demand gap lookup; see [`gap::skill_gap_analysis`].
    pub fn skill_gap_analysis(
        &self,
        cv_skills: &KeywordSet,
        market_demand: Option<&HashMap<String, u32>>,
    ) -> SkillGapReport {
        gap::skill_gap_analysis(cv_skills.as_slice(), market_demand)
    }
}
