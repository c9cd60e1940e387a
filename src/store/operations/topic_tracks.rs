use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// Durable link between a learner's active learning track and one topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicTrack {
    pub id: String,
    pub learner_track_id: String,
    pub topic_id: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn get_topic_track(
        &self,
        learner_track_id: &str,
        topic_id: &str,
    ) -> Result<Option<TopicTrack>, StoreError> {
        let key = keys::topic_track_key(learner_track_id, topic_id);
        match self.topic_tracks.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Insert-or-fetch on the (learner track, topic) key. The boolean is true when
    /// this call created the record; a lost race returns the winner's record.
    pub fn get_or_create_topic_track(
        &self,
        learner_track_id: &str,
        topic_id: &str,
    ) -> Result<(TopicTrack, bool), StoreError> {
        if let Some(existing) = self.get_topic_track(learner_track_id, topic_id)? {
            return Ok((existing, false));
        }

        let candidate = TopicTrack {
            id: uuid::Uuid::new_v4().to_string(),
            learner_track_id: learner_track_id.to_string(),
            topic_id: topic_id.to_string(),
            created_at: Utc::now(),
        };
        let key = keys::topic_track_key(learner_track_id, topic_id);

        let cas_result = self
            .topic_tracks
            .compare_and_swap(
                key.as_bytes(),
                None::<&[u8]>,
                Some(Self::serialize(&candidate)?),
            )
            .map_err(StoreError::Sled)?;

        match cas_result {
            Ok(()) => {
                tracing::info!(
                    learner_track_id,
                    topic_id,
                    track_id = %candidate.id,
                    "Topic track created"
                );
                Ok((candidate, true))
            }
            Err(conflict) => {
                let current = conflict.current.ok_or_else(|| StoreError::Conflict {
                    entity: "topic_track".to_string(),
                    key: key.clone(),
                })?;
                tracing::debug!(learner_track_id, topic_id, "Topic track created concurrently, re-read");
                Ok((Self::deserialize(&current)?, false))
            }
        }
    }

    pub fn list_topic_tracks(&self, learner_track_id: &str) -> Result<Vec<TopicTrack>, StoreError> {
        let prefix = keys::topic_track_prefix(learner_track_id);
        let mut tracks = Vec::new();
        for item in self.topic_tracks.scan_prefix(prefix.as_bytes()) {
            let (_, v) = item?;
            tracks.push(Self::deserialize::<TopicTrack>(&v)?);
        }
        Ok(tracks)
    }

    pub fn count_topic_tracks(&self, learner_track_id: &str) -> Result<u64, StoreError> {
        let prefix = keys::topic_track_prefix(learner_track_id);
        let mut count = 0u64;
        for item in self.topic_tracks.scan_prefix(prefix.as_bytes()) {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }
}
