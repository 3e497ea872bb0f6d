//! Category-weighted scoring.
//!
//! Job and CV skills are partitioned by the configured categories; each
//! category relevant to the job gets a match rate and a weight-scaled score.
//! Categories the job does not touch are omitted entirely so they cannot
//! dilute the aggregate.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::categories::CategoryRegistry;
use crate::matching::round_dp;

/// Score breakdown for one skill category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Job skills recognized by this category, in job order.
    pub required_skills: Vec<String>,
    /// The subset of `required_skills` the CV covers.
    pub matched_skills: Vec<String>,
    /// |matched| / |required|, 0-1, 3-decimal rounding.
    pub match_rate: f64,
    /// match_rate x weight x 100. May exceed 100 before aggregate
    /// normalization; that is expected, not a bug.
    pub weighted_score: f64,
    pub weight: f64,
}

/// Category id to [`CategoryScore`] mapping that preserves registry insertion
/// order. Serialized as a JSON object in that order; a plain `HashMap` would
/// destroy the ordering contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScores {
    entries: Vec<(String, CategoryScore)>,
}

impl CategoryScores {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryScore)> {
        self.entries.iter().map(|(id, score)| (id.as_str(), score))
    }

    pub fn get(&self, id: &str) -> Option<&CategoryScore> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, score)| score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, id: String, score: CategoryScore) {
        self.entries.push((id, score));
    }
}

impl Serialize for CategoryScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, score) in &self.entries {
            map.serialize_entry(id, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = CategoryScores;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category id to category score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = CategoryScores::default();
                while let Some((id, score)) = access.next_entry::<String, CategoryScore>()? {
                    scores.push(id, score);
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// Computes per-category scores. Categories with no required skills in the
/// job are skipped. Inputs must already be normalized.
pub fn category_scores(
    registry: &CategoryRegistry,
    cv_skills: &[String],
    job_skills: &[String],
) -> CategoryScores {
    let mut scores = CategoryScores::default();

    for category in registry.iter() {
        let required_skills: Vec<String> = job_skills
            .iter()
            .filter(|skill| category.contains(skill))
            .cloned()
            .collect();
        if required_skills.is_empty() {
            continue;
        }

        let present: Vec<&String> = cv_skills
            .iter()
            .filter(|skill| category.contains(skill))
            .collect();
        let matched_skills: Vec<String> = required_skills
            .iter()
            .filter(|skill| present.iter().any(|p| p == skill))
            .cloned()
            .collect();

        let match_rate = matched_skills.len() as f64 / required_skills.len() as f64;
        let weighted_score = match_rate * category.weight * 100.0;

        scores.push(
            category.id.clone(),
            CategoryScore {
                required_skills,
                matched_skills,
                match_rate: round_dp(match_rate, 3),
                weighted_score: round_dp(weighted_score, 2),
                weight: category.weight,
            },
        );
    }

    scores
}
