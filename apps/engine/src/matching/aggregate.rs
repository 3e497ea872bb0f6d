//! Signal aggregation and recommendation generation.
//!
//! Combines the exact, fuzzy, semantic, and category signals into the final
//! match percentage and derives a bounded list of improvement hints. The
//! blend coefficients are contractual scoring constants; tune with care,
//! every stored and displayed percentage depends on them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::categories::CategoryRegistry;
use crate::matching::category::CategoryScores;
use crate::matching::round_dp;

// Final blend: raw overlap vs weighted signal.
const BASIC_BLEND: f64 = 0.6;
const WEIGHTED_BLEND: f64 = 0.4;

// Weighted-score sub-blend.
const EXACT_BLEND: f64 = 0.4;
const FUZZY_BLEND: f64 = 0.2;
const SEMANTIC_BLEND: f64 = 0.2;
const CATEGORY_BLEND: f64 = 0.2;

// A fuzzy hit is worth half an exact hit; semantic contribution is capped.
const FUZZY_HIT_VALUE: f64 = 50.0;
const SEMANTIC_CEILING: f64 = 30.0;

const EXTRA_KEYWORDS_CAP: usize = 10;
const MAX_RECOMMENDATIONS: usize = 5;
const HIGH_PRIORITY_WEIGHT: f64 = 1.0;
const WEAK_CATEGORY_RATE: f64 = 0.5;
const WEAK_CATEGORY_MIN_REQUIRED: usize = 2;
const LOW_CV_QUALITY: u8 = 70;
const HIGH_PRIORITY_LIST_CAP: usize = 5;
const MISSING_COUNT_NOTE_THRESHOLD: usize = 5;

/// The complete outcome of matching one CV against one job profile.
/// Immutable once produced; constructed fresh per match request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0-100, two-decimal rounding.
    pub match_percentage: f64,
    /// Exact hits in job order, then fuzzy hits in job order, deduplicated.
    pub matched_keywords: Vec<String>,
    /// Job skills with no hit, in job order.
    pub missing_keywords: Vec<String>,
    /// CV skills the job does not ask for, capped for display.
    pub extra_keywords: Vec<String>,
    /// 0.0-1.0, three-decimal rounding.
    pub semantic_similarity: f64,
    /// 0-100, two-decimal rounding.
    pub weighted_score: f64,
    pub category_scores: CategoryScores,
    /// At most five entries, highest priority first.
    pub recommendations: Vec<String>,
}

/// Combines the four signals into a [`MatchResult`].
///
/// `exact` and `fuzzy` must come from [`find_exact`](crate::matching::exact::find_exact)
/// and [`find_fuzzy`](crate::matching::fuzzy::find_fuzzy) over the same
/// normalized inputs. Empty `job_skills` is a defined edge case: everything
/// scores zero, nothing errors.
#[allow(clippy::too_many_arguments)]
pub fn aggregate(
    registry: &CategoryRegistry,
    cv_skills: &[String],
    job_skills: &[String],
    exact: Vec<String>,
    fuzzy: Vec<String>,
    semantic_similarity: f64,
    category_scores: CategoryScores,
    cv_quality_score: u8,
) -> MatchResult {
    let mut seen = HashSet::new();
    let matched_keywords: Vec<String> = exact
        .iter()
        .chain(fuzzy.iter())
        .filter(|skill| seen.insert((*skill).clone()))
        .cloned()
        .collect();

    let missing_keywords: Vec<String> = job_skills
        .iter()
        .filter(|skill| !seen.contains(*skill))
        .cloned()
        .collect();

    let job_set: HashSet<&str> = job_skills.iter().map(String::as_str).collect();
    let extra_keywords: Vec<String> = cv_skills
        .iter()
        .filter(|skill| !job_set.contains(skill.as_str()))
        .take(EXTRA_KEYWORDS_CAP)
        .cloned()
        .collect();

    let basic_percentage = if job_skills.is_empty() {
        0.0
    } else {
        matched_keywords.len() as f64 / job_skills.len() as f64 * 100.0
    };

    let weighted_score = weighted_score(
        exact.len(),
        fuzzy.len(),
        semantic_similarity,
        &category_scores,
        job_skills.len(),
    );

    let final_percentage =
        (BASIC_BLEND * basic_percentage + WEIGHTED_BLEND * weighted_score).clamp(0.0, 100.0);

    let recommendations = build_recommendations(
        registry,
        &missing_keywords,
        &category_scores,
        cv_quality_score,
    );

    MatchResult {
        match_percentage: round_dp(final_percentage, 2),
        matched_keywords,
        missing_keywords,
        extra_keywords,
        semantic_similarity: round_dp(semantic_similarity, 3),
        weighted_score: round_dp(weighted_score, 2),
        category_scores,
        recommendations,
    }
}

fn weighted_score(
    exact_count: usize,
    fuzzy_count: usize,
    semantic_similarity: f64,
    category_scores: &CategoryScores,
    job_skill_count: usize,
) -> f64 {
    if job_skill_count == 0 {
        return 0.0;
    }

    let exact_component = exact_count as f64 / job_skill_count as f64 * 100.0;
    let fuzzy_component = fuzzy_count as f64 / job_skill_count as f64 * FUZZY_HIT_VALUE;
    let semantic_component = semantic_similarity * SEMANTIC_CEILING;

    let mut category_sum = 0.0;
    let mut weight_sum = 0.0;
    for (_, score) in category_scores.iter() {
        category_sum += score.weighted_score;
        weight_sum += score.weight * 100.0;
    }
    let category_component = if weight_sum > 0.0 {
        category_sum / weight_sum * 100.0
    } else {
        0.0
    };

    (EXACT_BLEND * exact_component
        + FUZZY_BLEND * fuzzy_component
        + SEMANTIC_BLEND * semantic_component
        + CATEGORY_BLEND * category_component)
        .clamp(0.0, 100.0)
}

/// Deterministic recommendation rules, highest priority first, hard-capped.
fn build_recommendations(
    registry: &CategoryRegistry,
    missing_keywords: &[String],
    category_scores: &CategoryScores,
    cv_quality_score: u8,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !missing_keywords.is_empty() {
        let high_priority_missing: Vec<&str> = registry
            .iter()
            .filter(|category| category.weight > HIGH_PRIORITY_WEIGHT)
            .flat_map(|category| {
                missing_keywords
                    .iter()
                    .filter(|skill| category.contains(skill))
                    .map(String::as_str)
            })
            .collect();

        if !high_priority_missing.is_empty() {
            let listed: Vec<&str> = high_priority_missing
                .into_iter()
                .take(HIGH_PRIORITY_LIST_CAP)
                .collect();
            recommendations.push(format!(
                "Focus on developing these high-priority skills: {}",
                listed.join(", ")
            ));
        }

        if missing_keywords.len() > MISSING_COUNT_NOTE_THRESHOLD {
            recommendations.push(format!(
                "Consider learning {} additional skills to improve match rate",
                missing_keywords.len()
            ));
        }
    }

    for (id, score) in category_scores.iter() {
        if recommendations.len() >= MAX_RECOMMENDATIONS {
            return recommendations;
        }
        if score.match_rate < WEAK_CATEGORY_RATE
            && score.required_skills.len() > WEAK_CATEGORY_MIN_REQUIRED
        {
            recommendations.push(format!("Strengthen your {} skills", id.replace('_', " ")));
        }
    }

    if recommendations.len() < MAX_RECOMMENDATIONS && cv_quality_score < LOW_CV_QUALITY {
        recommendations.push(
            "Improve your CV overall score by enhancing format and content quality".to_string(),
        );
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::category::category_scores;
    use crate::matching::exact::find_exact;
    use crate::matching::fuzzy::find_fuzzy;
    use crate::config::MatcherConfig;

    fn skills(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn run(cv: &[&str], job: &[&str], semantic: f64, quality: u8) -> MatchResult {
        let registry = CategoryRegistry::defaults();
        let config = MatcherConfig::default();
        let cv = skills(cv);
        let job = skills(job);
        let exact = find_exact(&cv, &job);
        let fuzzy = find_fuzzy(&cv, &job, &exact, &config);
        let categories = category_scores(&registry, &cv, &job);
        aggregate(
            &registry, &cv, &job, exact, fuzzy, semantic, categories, quality,
        )
    }

    #[test]
    fn test_known_scenario_scores_exactly() {
        let result = run(
            &["python", "django", "postgresql", "docker", "aws"],
            &["python", "django", "postgresql", "redis", "docker", "kubernetes"],
            0.0,
            80,
        );
        // basic = 4/6*100; category = 325/420*100; weighted = 0.4*66.667 +
        // 0.2*77.381 = 42.142857; final = 0.6*66.667 + 0.4*42.143 = 56.857.
        assert_eq!(result.match_percentage, 56.86);
        assert_eq!(result.weighted_score, 42.14);
        assert_eq!(
            result.matched_keywords,
            skills(&["python", "django", "postgresql", "docker"])
        );
        assert_eq!(result.missing_keywords, skills(&["redis", "kubernetes"]));
        assert_eq!(result.extra_keywords, skills(&["aws"]));
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_empty_job_is_all_zeroes_not_an_error() {
        let result = run(&["python", "react"], &[], 0.5, 90);
        assert_eq!(result.match_percentage, 0.0);
        assert_eq!(result.weighted_score, 0.0);
        assert!(result.matched_keywords.is_empty());
        assert!(result.missing_keywords.is_empty());
        assert!(result.category_scores.is_empty());
        assert_eq!(result.extra_keywords, skills(&["python", "react"]));
    }

    #[test]
    fn test_extra_keywords_capped_at_ten() {
        let cv: Vec<&str> = vec![
            "a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9", "a10", "a11", "a12",
        ];
        let result = run(&cv, &["python"], 0.0, 80);
        assert_eq!(result.extra_keywords.len(), 10);
        assert_eq!(result.extra_keywords[0], "a1");
    }

    #[test]
    fn test_semantic_contribution_and_rounding() {
        let result = run(&["python"], &["python"], 0.87654, 80);
        assert_eq!(result.semantic_similarity, 0.877);
        // exact = 100, semantic = 0.87654*30 = 26.2962, category = 100.
        // weighted = 0.4*100 + 0.2*26.2962 + 0.2*100 = 65.25924 -> 65.26
        assert_eq!(result.weighted_score, 65.26);
    }

    #[test]
    fn test_perfect_match_clamps_to_100() {
        let result = run(&["python"], &["python"], 1.0, 95);
        // basic = 100, weighted = 40 + 6 + 20 = 66 -> final = 86.4
        assert_eq!(result.match_percentage, 86.4);
        assert!(result.match_percentage <= 100.0);
    }

    #[test]
    fn test_high_priority_recommendation_lists_missing_skills() {
        let result = run(&[], &["python", "react"], 0.0, 50);
        assert_eq!(
            result.recommendations[0],
            "Focus on developing these high-priority skills: python, react"
        );
        assert!(result
            .recommendations
            .contains(&"Improve your CV overall score by enhancing format and content quality"
                .to_string()));
    }

    #[test]
    fn test_recommendations_capped_at_five() {
        let result = run(
            &[],
            &[
                "python",
                "java",
                "go",
                "react",
                "angular",
                "vue",
                "postgresql",
                "mysql",
                "mongodb",
            ],
            0.0,
            40,
        );
        assert_eq!(result.recommendations.len(), 5);
        // The cap cuts off the lower-priority CV-quality rule.
        assert!(!result
            .recommendations
            .iter()
            .any(|r| r.contains("CV overall score")));
        assert!(result
            .recommendations
            .contains(&"Strengthen your programming languages skills".to_string()));
    }

    #[test]
    fn test_missing_count_note_appears_above_threshold() {
        let result = run(
            &[],
            &["python", "java", "go", "ruby", "php", "kotlin"],
            0.0,
            90,
        );
        assert!(result
            .recommendations
            .contains(&"Consider learning 6 additional skills to improve match rate".to_string()));
    }

    #[test]
    fn test_monotonicity_adding_missing_skill_never_decreases() {
        let job = &["python", "django", "redis", "docker"];
        let before = run(&["python", "django"], job, 0.0, 80);
        let after = run(&["python", "django", "redis"], job, 0.0, 80);
        assert!(after.match_percentage >= before.match_percentage);
        assert!(after.match_percentage > before.match_percentage);
    }

    #[test]
    fn test_idempotence_bit_identical_results() {
        let cv = &["python", "reactjs", "docker", "aws"];
        let job = &["python", "react", "kubernetes", "aws", "terraform"];
        let first = run(cv, job, 0.0, 60);
        let second = run(cv, job, 0.0, 60);
        assert_eq!(first, second);
        assert_eq!(
            first.match_percentage.to_bits(),
            second.match_percentage.to_bits()
        );
    }
}
