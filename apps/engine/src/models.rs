//! Host-facing value objects consumed by the batch driver. Keyword lists and
//! quality scores are produced by the host's extraction/scoring stages; this
//! crate never fetches them itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job opening with its required keyword list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProfile {
    pub id: Uuid,
    pub title: String,
    /// Skills the role asks for, as raw tokens. Normalized by the matcher.
    pub suggested_keywords: Vec<String>,
}

/// The analysis record of one parsed resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvAnalysis {
    pub id: Uuid,
    pub cv_file_id: Uuid,
    pub file_name: String,
    /// Overall CV quality score (0-100) from the host's scoring stage.
    pub score: u8,
    /// Skills extracted from the resume, as raw tokens.
    pub matched_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}
