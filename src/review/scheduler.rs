use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::review::algorithm;
use crate::review::clock::{Clock, SystemClock};
use crate::review::collaborators::{ContentCatalog, LearningTrackDirectory};
use crate::review::resolver::TopicTrackResolver;
use crate::review::types::{
    ActiveTrack, DifficultyGrade, InitializeOutcome, ReviewError, ReviewItemView, ReviewStats,
    ReviewStatus, StatusFilter,
};
use crate::store::operations::catalog::Word;
use crate::store::operations::review_items::ReviewItem;
use crate::store::Store;

/// Stateless over requests: every operation reads and writes through the store.
/// The only in-process state is the jitter RNG.
pub struct ReviewScheduler {
    store: Arc<Store>,
    resolver: TopicTrackResolver,
    catalog: Arc<dyn ContentCatalog>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl ReviewScheduler {
    /// Uses the store for every collaborator and the system clock.
    pub fn new(store: Arc<Store>, jitter_seed: Option<u64>) -> Self {
        let rng = match jitter_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_parts(store.clone(), store.clone(), store, Arc::new(SystemClock), rng)
    }

    pub fn with_parts(
        store: Arc<Store>,
        directory: Arc<dyn LearningTrackDirectory>,
        catalog: Arc<dyn ContentCatalog>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            resolver: TopicTrackResolver::new(store.clone(), directory),
            store,
            catalog,
            clock,
            rng: Mutex::new(rng),
        }
    }

    pub fn active_track(&self, learner_id: &str) -> Result<ActiveTrack, ReviewError> {
        self.resolver.active_track(learner_id)
    }

    fn jitter(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }

    /// Creates a review item for every topic word not yet tracked. Idempotent.
    pub fn initialize_topic(
        &self,
        active: &ActiveTrack,
        topic_id: &str,
    ) -> Result<InitializeOutcome, ReviewError> {
        let track = self.resolver.resolve(active, topic_id)?;
        let word_ids = self.catalog.list_words_for_topic(topic_id)?;
        let existing = self.store.list_review_word_ids(&track.id)?;

        let now = self.clock.now();
        let fresh: Vec<ReviewItem> = word_ids
            .into_iter()
            .filter(|word_id| !existing.contains(word_id))
            .map(|word_id| ReviewItem {
                track_id: track.id.clone(),
                word_id,
                easiness_factor: algorithm::initial_easiness(),
                repetition_count: 0,
                priority_score: algorithm::initial_priority(self.jitter()),
                last_reviewed_at: None,
                last_difficulty: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let created = self.store.insert_review_items_if_absent(&fresh)?;
        if created > 0 {
            tracing::info!(
                learner_id = %active.learner_id,
                topic_id,
                track_id = %track.id,
                created,
                "Review items initialized"
            );
        } else {
            tracing::debug!(topic_id, track_id = %track.id, "Topic already initialized");
        }

        Ok(InitializeOutcome {
            track_id: track.id,
            created,
        })
    }

    /// Up to `limit` items outside the grace window, highest priority first.
    pub fn select_due(
        &self,
        active: &ActiveTrack,
        topic_id: &str,
        limit: usize,
    ) -> Result<Vec<ReviewItem>, ReviewError> {
        let track = self.resolver.existing(active, topic_id)?;
        let now = self.clock.now();
        Ok(self.store.scan_review_items_by_priority(&track.id, limit, |item| {
            algorithm::is_ready_for_review(item.last_reviewed_at, now)
        })?)
    }

    pub fn select_due_words(
        &self,
        active: &ActiveTrack,
        topic_id: &str,
        limit: usize,
    ) -> Result<Vec<Word>, ReviewError> {
        let due = self.select_due(active, topic_id, limit)?;
        let ids: Vec<String> = due.into_iter().map(|item| item.word_id).collect();
        Ok(self.catalog.get_words_by_ids(&ids)?)
    }

    /// Applies one self-graded review. Repetitions always increase, whatever the grade.
    pub fn record_review(
        &self,
        active: &ActiveTrack,
        topic_id: &str,
        word_id: &str,
        grade: DifficultyGrade,
    ) -> Result<ReviewItem, ReviewError> {
        let track = self.resolver.existing(active, topic_id)?;
        let now = self.clock.now();
        let jitter = self.jitter();

        let updated = self
            .store
            .update_review_item(&track.id, word_id, |item| {
                item.easiness_factor = algorithm::next_easiness(item.easiness_factor, grade);
                item.repetition_count = item.repetition_count.saturating_add(1);
                item.last_reviewed_at = Some(now);
                item.last_difficulty = Some(grade);
                item.priority_score =
                    algorithm::review_priority(item.easiness_factor, item.repetition_count, jitter);
                item.updated_at = now;
            })?
            .ok_or_else(|| ReviewError::ItemNotFound {
                topic_id: topic_id.to_string(),
                word_id: word_id.to_string(),
            })?;

        tracing::info!(
            learner_id = %active.learner_id,
            topic_id,
            word_id,
            grade = %grade,
            easiness = updated.easiness_factor,
            repetitions = updated.repetition_count,
            priority = updated.priority_score,
            "Review recorded"
        );
        Ok(updated)
    }

    pub fn stats(&self, active: &ActiveTrack, topic_id: &str) -> Result<ReviewStats, ReviewError> {
        let track = self.resolver.existing(active, topic_id)?;
        let now = self.clock.now();

        let mut stats = ReviewStats::default();
        for item in self.store.list_review_items(&track.id)? {
            stats.total_vocabs += 1;
            match algorithm::classify(item.repetition_count) {
                ReviewStatus::NotStarted => stats.not_started += 1,
                ReviewStatus::Learning => stats.learning += 1,
                ReviewStatus::Mastered => stats.mastered += 1,
            }
            if algorithm::is_ready_for_review(item.last_reviewed_at, now) {
                stats.ready_to_review += 1;
            }
        }
        Ok(stats)
    }

    pub fn list_by_status(
        &self,
        active: &ActiveTrack,
        topic_id: &str,
        filter: StatusFilter,
    ) -> Result<Vec<Word>, ReviewError> {
        let track = self.resolver.existing(active, topic_id)?;
        let ids: Vec<String> = self
            .store
            .list_review_items(&track.id)?
            .into_iter()
            .filter(|item| filter.matches(algorithm::classify(item.repetition_count)))
            .map(|item| item.word_id)
            .collect();
        Ok(self.catalog.get_words_by_ids(&ids)?)
    }

    pub fn review_item(
        &self,
        active: &ActiveTrack,
        topic_id: &str,
        word_id: &str,
    ) -> Result<ReviewItemView, ReviewError> {
        let track = self.resolver.existing(active, topic_id)?;
        let item = self
            .store
            .get_review_item(&track.id, word_id)?
            .ok_or_else(|| ReviewError::ItemNotFound {
                topic_id: topic_id.to_string(),
                word_id: word_id.to_string(),
            })?;
        let status = algorithm::classify(item.repetition_count);
        Ok(ReviewItemView { item, status })
    }

    /// Number of topics started under the learner's active learning track.
    pub fn learned_topic_count(&self, active: &ActiveTrack) -> Result<u64, ReviewError> {
        self.resolver.count_for(active)
    }
}
