//! Skill gap analysis against market demand. A lookup utility, not part of
//! the scoring pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Skills currently in high market demand. Static until a real market-data
/// feed replaces it.
pub const TRENDING_SKILLS: &[&str] = &["docker", "kubernetes", "react", "python", "aws"];

/// Demand counts above this mark a skill as worth flagging.
const HIGH_DEMAND_THRESHOLD: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub trending_skills: Vec<String>,
    /// High-demand skills absent from the CV, sorted for stable output.
    pub missing_from_cv: Vec<String>,
}

/// Compares CV skills against optional market demand data. Without demand
/// data only the trending list is reported.
pub fn skill_gap_analysis(
    cv_skills: &[String],
    market_demand: Option<&HashMap<String, u32>>,
) -> SkillGapReport {
    let mut missing_from_cv = Vec::new();

    if let Some(demand) = market_demand {
        for (skill, count) in demand {
            if *count > HIGH_DEMAND_THRESHOLD && !cv_skills.iter().any(|s| s == skill) {
                missing_from_cv.push(skill.clone());
            }
        }
        missing_from_cv.sort();
    }

    SkillGapReport {
        trending_skills: TRENDING_SKILLS.iter().map(|s| (*s).to_string()).collect(),
        missing_from_cv,
    }
}
