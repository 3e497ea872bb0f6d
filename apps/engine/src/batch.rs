//! Batch ranking driver.
//!
//! Ranks one CV against many job profiles (or many CVs against one job) by
//! fanning the independent pairwise matches out across blocking worker tasks
//! and sorting the collected results. Profile data arrives in memory; whoever
//! fetches it from storage is outside this crate.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::matching::aggregate::MatchResult;
use crate::matching::keywords::KeywordSet;
use crate::matching::{round_dp, Matcher};
use crate::models::{CvAnalysis, JobProfile};

/// One job profile's ranked match against a CV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatchRow {
    pub job_profile_id: Uuid,
    pub job_title: String,
    pub total_job_keywords: usize,
    pub matched_keywords_count: usize,
    pub result: MatchResult,
}

/// One CV's ranked match against a job profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvMatchRow {
    pub cv_id: Uuid,
    pub cv_file_name: String,
    pub cv_score: u8,
    pub analysis_date: DateTime<Utc>,
    pub matched_keywords_count: usize,
    pub result: MatchResult,
}

/// Ranking of all job profiles for a single CV, best first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvJobRanking {
    pub cv_id: Uuid,
    pub cv_title: String,
    pub total_job_profiles: usize,
    pub matches: Vec<JobMatchRow>,
    pub best_match: Option<JobMatchRow>,
    pub average_match_percentage: f64,
}

/// Top CV matches for a single job profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCvRanking {
    pub job_profile_id: Uuid,
    pub job_title: String,
    pub total_cvs_analyzed: usize,
    pub top_matches: Vec<CvMatchRow>,
    pub average_match_percentage: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct BatchCounters {
    batches: u64,
    pairs_matched: u64,
    pairs_failed: u64,
}

/// Read-only view of the driver's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatsSnapshot {
    pub batches: u64,
    pub pairs_matched: u64,
    pub pairs_failed: u64,
}

/// Wraps a shared [`Matcher`] with concurrent fan-out and result ranking.
///
/// The stats counters are the driver's only mutable state; they are updated
/// at exactly one site per batch and read through [`BatchMatcher::stats`].
pub struct BatchMatcher {
    matcher: Arc<Matcher>,
    stats: Mutex<BatchCounters>,
}

impl BatchMatcher {
    pub fn new(matcher: Arc<Matcher>) -> Self {
        Self {
            matcher,
            stats: Mutex::new(BatchCounters::default()),
        }
    }

    /// Matches one CV against every job profile, sorted by descending match
    /// percentage. A pair whose worker task dies is counted as failed and
    /// dropped from the ranking; the remaining rows are still returned.
    pub async fn rank_jobs_for_cv(&self, cv: &CvAnalysis, jobs: &[JobProfile]) -> CvJobRanking {
        let cv_keywords = KeywordSet::new(&cv.matched_keywords);

        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            let matcher = Arc::clone(&self.matcher);
            let cv_keywords = cv_keywords.clone();
            let job = job.clone();
            let quality = cv.score;
            let title = job.title.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let job_keywords = KeywordSet::new(&job.suggested_keywords);
                let total = job_keywords.len();
                let result = matcher.match_skills(&cv_keywords, &job_keywords, quality);
                (job, total, result)
            });
            handles.push((title, handle));
        }

        let mut matches = Vec::with_capacity(jobs.len());
        let mut failed = 0_u64;
        for (title, handle) in handles {
            match handle.await {
                Ok((job, total_job_keywords, result)) => matches.push(JobMatchRow {
                    job_profile_id: job.id,
                    job_title: job.title,
                    total_job_keywords,
                    matched_keywords_count: result.matched_keywords.len(),
                    result,
                }),
                Err(err) => {
                    warn!(job_title = %title, error = %err, "match worker failed; dropping pair");
                    failed += 1;
                }
            }
        }

        sort_by_percentage_desc(&mut matches, |row| row.result.match_percentage);
        let average_match_percentage = average(matches.iter().map(|r| r.result.match_percentage));
        let best_match = matches.first().cloned();

        self.record_batch(matches.len() as u64, failed);
        info!(
            cv = %cv.file_name,
            jobs = jobs.len(),
            failed,
            "ranked job profiles for cv"
        );

        CvJobRanking {
            cv_id: cv.cv_file_id,
            cv_title: cv.file_name.clone(),
            total_job_profiles: jobs.len(),
            matches,
            best_match,
            average_match_percentage,
        }
    }

    /// Finds the `limit` best CV matches for one job profile. The average
    /// covers every CV examined, not just the returned top slice.
    pub async fn top_cvs_for_job(
        &self,
        job: &JobProfile,
        cvs: &[CvAnalysis],
        limit: usize,
    ) -> JobCvRanking {
        let job_keywords = KeywordSet::new(&job.suggested_keywords);

        let mut handles = Vec::with_capacity(cvs.len());
        for cv in cvs {
            let matcher = Arc::clone(&self.matcher);
            let job_keywords = job_keywords.clone();
            let cv = cv.clone();
            let file_name = cv.file_name.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let cv_keywords = KeywordSet::new(&cv.matched_keywords);
                let result = matcher.match_skills(&cv_keywords, &job_keywords, cv.score);
                (cv, result)
            });
            handles.push((file_name, handle));
        }

        let mut matches = Vec::with_capacity(cvs.len());
        let mut failed = 0_u64;
        for (file_name, handle) in handles {
            match handle.await {
                Ok((cv, result)) => matches.push(CvMatchRow {
                    cv_id: cv.cv_file_id,
                    cv_file_name: cv.file_name,
                    cv_score: cv.score,
                    analysis_date: cv.created_at,
                    matched_keywords_count: result.matched_keywords.len(),
                    result,
                }),
                Err(err) => {
                    warn!(cv_file = %file_name, error = %err, "match worker failed; dropping pair");
                    failed += 1;
                }
            }
        }

        sort_by_percentage_desc(&mut matches, |row| row.result.match_percentage);
        let average_match_percentage = average(matches.iter().map(|r| r.result.match_percentage));
        let matched = matches.len() as u64;
        matches.truncate(limit);

        self.record_batch(matched, failed);
        info!(
            job = %job.title,
            cvs = cvs.len(),
            failed,
            limit,
            "ranked cvs for job profile"
        );

        JobCvRanking {
            job_profile_id: job.id,
            job_title: job.title.clone(),
            total_cvs_analyzed: cvs.len(),
            top_matches: matches,
            average_match_percentage,
        }
    }

    pub fn stats(&self) -> BatchStatsSnapshot {
        let counters = self.stats.lock().expect("stats lock poisoned");
        BatchStatsSnapshot {
            batches: counters.batches,
            pairs_matched: counters.pairs_matched,
            pairs_failed: counters.pairs_failed,
        }
    }

    // The single stats update site; both ranking entry points funnel here
    // once per batch.
    fn record_batch(&self, matched: u64, failed: u64) {
        let mut counters = self.stats.lock().expect("stats lock poisoned");
        counters.batches += 1;
        counters.pairs_matched += matched;
        counters.pairs_failed += failed;
    }
}

fn sort_by_percentage_desc<T>(rows: &mut [T], percentage: impl Fn(&T) -> f64) {
    // Stable sort keeps spawn order for ties, so rankings are deterministic.
    rows.sort_by(|a, b| {
        percentage(b)
            .partial_cmp(&percentage(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn average(percentages: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = percentages.fold((0.0, 0_usize), |(s, c), p| (s + p, c + 1));
    if count == 0 {
        0.0
    } else {
        round_dp(sum / count as f64, 2)
    }
}
