//! Easiness and priority arithmetic. HARD grades count as the high score in the
//! easiness formula, and repetitions only ever go up.

use chrono::{DateTime, Duration, Utc};

use crate::constants::{
    INITIAL_EASINESS_FACTOR, MASTERED_REPETITION_THRESHOLD, MIN_EASINESS_FACTOR, PRIORITY_BASE,
    PRIORITY_REPETITION_CAP, REVIEW_GRACE_PERIOD_MINUTES,
};
use crate::review::types::{DifficultyGrade, ReviewStatus};

pub fn grade_value(grade: DifficultyGrade) -> f64 {
    match grade {
        DifficultyGrade::Easy => 1.0,
        DifficultyGrade::Medium => 3.0,
        DifficultyGrade::Hard => 5.0,
    }
}

/// EF' = EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02), floored at 1.3.
pub fn next_easiness(current: f64, grade: DifficultyGrade) -> f64 {
    let gap = 5.0 - grade_value(grade);
    let next = current + 0.1 - gap * (0.08 + gap * 0.02);
    next.max(MIN_EASINESS_FACTOR)
}

/// `jitter` is a uniform draw in [0, 1) used only to break ties.
pub fn initial_priority(jitter: f64) -> f64 {
    PRIORITY_BASE + jitter
}

pub fn review_priority(easiness: f64, repetition_count: u32, jitter: f64) -> f64 {
    let remaining = PRIORITY_REPETITION_CAP - repetition_count.min(PRIORITY_REPETITION_CAP);
    PRIORITY_BASE - easiness * 2.0 + remaining as f64 + jitter
}

pub fn initial_easiness() -> f64 {
    INITIAL_EASINESS_FACTOR
}

pub fn classify(repetition_count: u32) -> ReviewStatus {
    if repetition_count == 0 {
        ReviewStatus::NotStarted
    } else if repetition_count < MASTERED_REPETITION_THRESHOLD {
        ReviewStatus::Learning
    } else {
        ReviewStatus::Mastered
    }
}

pub fn grace_period() -> Duration {
    Duration::minutes(REVIEW_GRACE_PERIOD_MINUTES)
}

/// Never reviewed, or last reviewed strictly before `now - grace`.
pub fn is_ready_for_review(last_reviewed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_reviewed_at {
        None => true,
        Some(reviewed_at) => reviewed_at < now - grace_period(),
    }
}
