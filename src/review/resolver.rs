use std::sync::Arc;

use crate::review::collaborators::LearningTrackDirectory;
use crate::review::types::{ActiveTrack, ReviewError};
use crate::store::operations::topic_tracks::TopicTrack;
use crate::store::Store;

/// Maps (learner, topic) onto the durable topic track record.
#[derive(Clone)]
pub struct TopicTrackResolver {
    store: Arc<Store>,
    directory: Arc<dyn LearningTrackDirectory>,
}

impl TopicTrackResolver {
    pub fn new(store: Arc<Store>, directory: Arc<dyn LearningTrackDirectory>) -> Self {
        Self { store, directory }
    }

    pub fn active_track(&self, learner_id: &str) -> Result<ActiveTrack, ReviewError> {
        let learner_track_id = self
            .directory
            .resolve_active_track(learner_id)?
            .ok_or_else(|| ReviewError::NoActiveTrack {
                learner_id: learner_id.to_string(),
            })?;

        Ok(ActiveTrack {
            learner_id: learner_id.to_string(),
            learner_track_id,
        })
    }

    /// Find-or-create. Safe to race: the store enforces one track per key.
    pub fn resolve(&self, active: &ActiveTrack, topic_id: &str) -> Result<TopicTrack, ReviewError> {
        let (track, _created) = self
            .store
            .get_or_create_topic_track(&active.learner_track_id, topic_id)?;
        Ok(track)
    }

    /// Lookup only; read paths never create tracks.
    pub fn existing(&self, active: &ActiveTrack, topic_id: &str) -> Result<TopicTrack, ReviewError> {
        self.store
            .get_topic_track(&active.learner_track_id, topic_id)?
            .ok_or_else(|| ReviewError::TopicNotStarted {
                topic_id: topic_id.to_string(),
            })
    }

    pub fn count_for(&self, active: &ActiveTrack) -> Result<u64, ReviewError> {
        Ok(self.store.count_topic_tracks(&active.learner_track_id)?)
    }
}
