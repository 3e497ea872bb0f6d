//! Skill category registry.
//!
//! Categories partition the skill vocabulary into weighted groups
//! (programming languages count for more than soft skills). The registry is
//! built once at startup, validated, and shared read-only for the process
//! lifetime; iteration order is insertion order and part of the scoring
//! contract.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::EngineError;
use crate::matching::keywords::normalize_token;

/// Built-in category table: weighted skill groups and their canonical
/// vocabulary.
const DEFAULT_CATEGORIES: &[(&str, f64, &[&str])] = &[
    (
        "programming_languages",
        1.2,
        &[
            "python",
            "java",
            "javascript",
            "typescript",
            "c#",
            "c++",
            "php",
            "ruby",
            "go",
            "rust",
            "swift",
            "kotlin",
            "scala",
            "dart",
        ],
    ),
    (
        "frameworks",
        1.1,
        &[
            "react", "angular", "vue", "next.js", "nuxt.js", "django", "fastapi", "flask",
            "spring", "laravel", ".net", "asp.net", "express",
        ],
    ),
    (
        "databases",
        1.0,
        &[
            "postgresql",
            "mysql",
            "mongodb",
            "redis",
            "elasticsearch",
            "sql server",
            "sqlite",
            "oracle",
        ],
    ),
    (
        "tools_technologies",
        0.9,
        &[
            "docker",
            "kubernetes",
            "git",
            "jenkins",
            "nginx",
            "apache",
            "rabbitmq",
            "kafka",
        ],
    ),
    (
        "cloud_platforms",
        1.1,
        &[
            "aws",
            "azure",
            "gcp",
            "google cloud",
            "heroku",
            "vercel",
            "digitalocean",
        ],
    ),
    (
        "soft_skills",
        0.7,
        &[
            "teamwork",
            "leadership",
            "communication",
            "problem solving",
            "analytical thinking",
            "creativity",
        ],
    ),
];

/// A weighted skill category. Skills are lowercase canonical tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub id: String,
    pub weight: f64,
    pub skills: Vec<String>,
}

impl SkillCategory {
    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// Immutable, ordered collection of [`SkillCategory`] values.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<SkillCategory>,
}

impl CategoryRegistry {
    /// Builds the registry from explicit entries, validating each one.
    ///
    /// Rejected configurations: non-positive or non-finite weights, empty
    /// skill lists, duplicate category ids. Skill tokens are normalized
    /// (trimmed, lowercased) on the way in.
    pub fn from_entries(entries: Vec<SkillCategory>) -> Result<Self, EngineError> {
        let mut seen_ids = HashSet::new();
        let mut categories = Vec::with_capacity(entries.len());

        for entry in entries {
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(EngineError::CategoryConfig(format!(
                    "category '{}' has invalid weight {}",
                    entry.id, entry.weight
                )));
            }

            let skills: Vec<String> = {
                let mut seen = HashSet::new();
                entry
                    .skills
                    .iter()
                    .filter_map(|s| normalize_token(s))
                    .filter(|s| seen.insert(s.clone()))
                    .collect()
            };
            if skills.is_empty() {
                return Err(EngineError::CategoryConfig(format!(
                    "category '{}' has an empty skill set",
                    entry.id
                )));
            }

            if !seen_ids.insert(entry.id.clone()) {
                return Err(EngineError::CategoryConfig(format!(
                    "duplicate category id '{}'",
                    entry.id
                )));
            }

            categories.push(SkillCategory {
                id: entry.id,
                weight: entry.weight,
                skills,
            });
        }

        Ok(Self { categories })
    }

    /// The built-in category table.
    pub fn defaults() -> Self {
        let entries = DEFAULT_CATEGORIES
            .iter()
            .map(|(id, weight, skills)| SkillCategory {
                id: (*id).to_string(),
                weight: *weight,
                skills: skills.iter().map(|s| (*s).to_string()).collect(),
            })
            .collect();

        // The built-in table is known-valid.
        Self::from_entries(entries).expect("default category table must validate")
    }

    /// Loads a registry from a JSON file: an array of
    /// `{"id": ..., "weight": ..., "skills": [...]}` entries, in the order
    /// they should be scored and reported.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<SkillCategory> = serde_json::from_str(&raw)?;
        let registry = Self::from_entries(entries)?;
        info!(
            path = %path.as_ref().display(),
            categories = registry.len(),
            "loaded skill category configuration"
        );
        Ok(registry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCategory> {
        self.categories.iter()
    }

    pub fn get(&self, id: &str) -> Option<&SkillCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, weight: f64, skills: &[&str]) -> SkillCategory {
        SkillCategory {
            id: id.to_string(),
            weight,
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_defaults_preserve_order_and_weights() {
        let registry = CategoryRegistry::defaults();
        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "programming_languages",
                "frameworks",
                "databases",
                "tools_technologies",
                "cloud_platforms",
                "soft_skills"
            ]
        );
        assert_eq!(registry.get("programming_languages").unwrap().weight, 1.2);
        assert_eq!(registry.get("soft_skills").unwrap().weight, 0.7);
    }

    #[test]
    fn test_zero_weight_rejected() {
        let err = CategoryRegistry::from_entries(vec![category("x", 0.0, &["python"])])
            .unwrap_err();
        assert!(matches!(err, EngineError::CategoryConfig(_)));
    }

    #[test]
    fn test_negative_and_nan_weight_rejected() {
        assert!(CategoryRegistry::from_entries(vec![category("x", -1.0, &["python"])]).is_err());
        assert!(
            CategoryRegistry::from_entries(vec![category("x", f64::NAN, &["python"])]).is_err()
        );
    }

    #[test]
    fn test_empty_skill_set_rejected() {
        assert!(CategoryRegistry::from_entries(vec![category("x", 1.0, &[])]).is_err());
        // Whitespace-only tokens normalize away to nothing.
        assert!(CategoryRegistry::from_entries(vec![category("x", 1.0, &["  "])]).is_err());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let entries = vec![
            category("x", 1.0, &["python"]),
            category("x", 1.1, &["java"]),
        ];
        assert!(CategoryRegistry::from_entries(entries).is_err());
    }

    #[test]
    fn test_skills_normalized_on_load() {
        let registry =
            CategoryRegistry::from_entries(vec![category("x", 1.0, &["  Python ", "python"])])
                .unwrap();
        assert_eq!(registry.get("x").unwrap().skills, vec!["python"]);
    }
}
