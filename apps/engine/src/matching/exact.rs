//! Exact set-membership matching.

use std::collections::HashSet;

/// Returns the job skills present verbatim in the CV skills, in job-skill
/// iteration order. Inputs must already be normalized.
pub fn find_exact(cv_skills: &[String], job_skills: &[String]) -> Vec<String> {
    let cv_set: HashSet<&str> = cv_skills.iter().map(String::as_str).collect();
    job_skills
        .iter()
        .filter(|skill| cv_set.contains(skill.as_str()))
        .cloned()
        .collect()
}
