//! CV-to-job matching engine.
//!
//! Given the normalized skill keywords extracted from a resume and the
//! keyword list of a target job profile, the [`Matcher`] computes a composite
//! match score (exact + fuzzy + semantic + category-weighted signals) and a
//! bounded list of improvement recommendations. The [`batch`] module ranks
//! one CV against many job profiles (and the reverse) concurrently.
//!
//! The crate is a pure computation core: text extraction, persistence, and
//! transport are the host's concern. Inputs are expected to be lowercase,
//! whitespace-normalized tokens; [`KeywordSet`] is the canonical way to get
//! there.

pub mod batch;
pub mod categories;
pub mod config;
pub mod errors;
pub mod matching;
pub mod models;

pub use crate::batch::{BatchMatcher, BatchStatsSnapshot, CvJobRanking, JobCvRanking};
pub use crate::categories::{CategoryRegistry, SkillCategory};
pub use crate::config::{MatcherConfig, SemanticBackend};
pub use crate::errors::EngineError;
pub use crate::matching::aggregate::MatchResult;
pub use crate::matching::category::{CategoryScore, CategoryScores};
pub use crate::matching::gap::SkillGapReport;
pub use crate::matching::keywords::KeywordSet;
pub use crate::matching::semantic::{
    HashEmbeddingSimilarity, NoopSimilarity, SimilarityProvider,
};
pub use crate::matching::Matcher;
pub use crate::models::{CvAnalysis, JobProfile};
