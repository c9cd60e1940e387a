//! Narrow views of the systems the scheduler depends on but does not own.

use crate::store::operations::catalog::Word;
use crate::store::{Store, StoreError};

/// Resolves which learning track a learner is currently studying.
pub trait LearningTrackDirectory: Send + Sync {
    fn resolve_active_track(&self, learner_id: &str) -> Result<Option<String>, StoreError>;
}

/// Read access to the vocabulary catalog.
pub trait ContentCatalog: Send + Sync {
    fn list_words_for_topic(&self, topic_id: &str) -> Result<Vec<String>, StoreError>;

    /// Hydrates ids into word records, keeping the given order and skipping unknown ids.
    fn get_words_by_ids(&self, word_ids: &[String]) -> Result<Vec<Word>, StoreError>;
}

impl LearningTrackDirectory for Store {
    fn resolve_active_track(&self, learner_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get_active_learning_track(learner_id)?.map(|track| track.id))
    }
}

impl ContentCatalog for Store {
    fn list_words_for_topic(&self, topic_id: &str) -> Result<Vec<String>, StoreError> {
        self.list_topic_word_ids(topic_id)
    }

    fn get_words_by_ids(&self, word_ids: &[String]) -> Result<Vec<Word>, StoreError> {
        Store::get_words_by_ids(self, word_ids)
    }
}
