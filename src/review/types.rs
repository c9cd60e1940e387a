use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::operations::review_items::ReviewItem;
use crate::store::StoreError;

pub use crate::store::operations::review_items::DifficultyGrade;

/// The learner's currently active learning track, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTrack {
    pub learner_id: String,
    pub learner_track_id: String,
}

/// Classification of a review item by how often it has been reviewed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    NotStarted,
    Learning,
    Mastered,
}

/// Status filter accepted by the by-status listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Only(ReviewStatus),
    All,
}

impl StatusFilter {
    pub fn matches(self, status: ReviewStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ReviewError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mastered" => Ok(StatusFilter::Only(ReviewStatus::Mastered)),
            "learning" => Ok(StatusFilter::Only(ReviewStatus::Learning)),
            "not_started" => Ok(StatusFilter::Only(ReviewStatus::NotStarted)),
            "all" => Ok(StatusFilter::All),
            other => Err(ReviewError::InvalidInput(format!(
                "unknown status '{other}', expected mastered, learning, not_started or all"
            ))),
        }
    }
}

impl FromStr for DifficultyGrade {
    type Err = ReviewError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EASY" => Ok(DifficultyGrade::Easy),
            "MEDIUM" => Ok(DifficultyGrade::Medium),
            "HARD" => Ok(DifficultyGrade::Hard),
            other => Err(ReviewError::InvalidInput(format!(
                "unknown difficulty '{other}', expected EASY, MEDIUM or HARD"
            ))),
        }
    }
}

impl fmt::Display for DifficultyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DifficultyGrade::Easy => "EASY",
            DifficultyGrade::Medium => "MEDIUM",
            DifficultyGrade::Hard => "HARD",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_vocabs: u64,
    pub mastered: u64,
    pub learning: u64,
    pub not_started: u64,
    pub ready_to_review: u64,
}

/// Outcome of initializing a topic for a learner.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeOutcome {
    pub track_id: String,
    pub created: usize,
}

/// A review item together with its derived status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItemView {
    #[serde(flatten)]
    pub item: ReviewItem,
    pub status: ReviewStatus,
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("learner {learner_id} has no active learning track")]
    NoActiveTrack { learner_id: String },
    #[error("topic {topic_id} has not been started yet")]
    TopicNotStarted { topic_id: String },
    #[error("no review item for word {word_id} in topic {topic_id}")]
    ItemNotFound { topic_id: String, word_id: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parses_known_values() {
        assert_eq!(
            "mastered".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(ReviewStatus::Mastered)
        );
        assert_eq!(
            "NOT_STARTED".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(ReviewStatus::NotStarted)
        );
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert!(matches!(
            "done".parse::<StatusFilter>(),
            Err(ReviewError::InvalidInput(_))
        ));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<DifficultyGrade>().unwrap(), DifficultyGrade::Easy);
        assert_eq!(" Hard ".parse::<DifficultyGrade>().unwrap(), DifficultyGrade::Hard);
        assert!("impossible".parse::<DifficultyGrade>().is_err());
        assert_eq!(DifficultyGrade::Medium.to_string(), "MEDIUM");
    }

    #[test]
    fn filter_all_matches_every_status() {
        for status in [ReviewStatus::NotStarted, ReviewStatus::Learning, ReviewStatus::Mastered] {
            assert!(StatusFilter::All.matches(status));
        }
        assert!(!StatusFilter::Only(ReviewStatus::Mastered).matches(ReviewStatus::Learning));
    }
}
