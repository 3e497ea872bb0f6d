//! Approximate matching for near-spellings and variants ("postgres" vs
//! "postgresql", "node.js" vs "nodejs").

use std::collections::HashSet;

use strsim::normalized_levenshtein;

use crate::config::MatcherConfig;

/// Edit-similarity ratio on the 0-100 scale the acceptance threshold uses.
fn similarity_ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Finds fuzzy hits among the job skills not already matched exactly.
///
/// A candidate is accepted when either rule fires:
/// - its best ratio against any CV skill reaches `fuzzy_ratio_threshold`, or
/// - one string contains the other and the job skill is longer than
///   `fuzzy_min_token_len` (containment alone on tokens like "c" or "go"
///   would match nearly anything).
///
/// Results keep job-skill iteration order; acceptance is boolean, no ranking.
pub fn find_fuzzy(
    cv_skills: &[String],
    job_skills: &[String],
    already_matched: &[String],
    config: &MatcherConfig,
) -> Vec<String> {
    let matched: HashSet<&str> = already_matched.iter().map(String::as_str).collect();

    let mut hits = Vec::new();
    for job_skill in job_skills {
        if matched.contains(job_skill.as_str()) {
            continue;
        }

        let best_ratio = cv_skills
            .iter()
            .map(|cv_skill| similarity_ratio(job_skill, cv_skill))
            .fold(0.0_f64, f64::max);
        let ratio_hit = best_ratio >= config.fuzzy_ratio_threshold;

        let containment_hit = job_skill.len() > config.fuzzy_min_token_len
            && cv_skills
                .iter()
                .any(|cv_skill| cv_skill.contains(job_skill.as_str()) || job_skill.contains(cv_skill.as_str()));

        if ratio_hit || containment_hit {
            hits.push(job_skill.clone());
        }
    }
    hits
}
