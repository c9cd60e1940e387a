use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;

use crate::store::keys;
use crate::store::{flatten_tx_error, Store, StoreError};

/// A learner's learning context for one language. At most one is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningTrack {
    pub id: String,
    pub learner_id: String,
    pub language_code: String,
    pub is_current_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn abort(error: StoreError) -> ConflictableTransactionError<StoreError> {
    ConflictableTransactionError::Abort(error)
}

impl Store {
    /// Tracks are keyed by (learner, language), so a learner has at most one per language.
    pub fn get_learning_track(
        &self,
        learner_id: &str,
        language_code: &str,
    ) -> Result<Option<LearningTrack>, StoreError> {
        let key = keys::learning_track_key(learner_id, &language_code.to_ascii_lowercase());
        match self.learning_tracks.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_learning_tracks(&self, learner_id: &str) -> Result<Vec<LearningTrack>, StoreError> {
        let prefix = keys::learning_track_prefix(learner_id);
        let mut tracks = Vec::new();
        for item in self.learning_tracks.scan_prefix(prefix.as_bytes()) {
            let (_, v) = item?;
            let track = Self::deserialize::<LearningTrack>(&v)?;
            if track.learner_id == learner_id {
                tracks.push(track);
            }
        }
        tracks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tracks)
    }

    /// The pointer stores the active track's language code.
    pub fn get_active_learning_track(
        &self,
        learner_id: &str,
    ) -> Result<Option<LearningTrack>, StoreError> {
        let key = keys::active_learning_track_key(learner_id);
        let Some(raw_language) = self.active_learning_tracks.get(key.as_bytes())? else {
            return Ok(None);
        };
        let language_code = match String::from_utf8(raw_language.to_vec()) {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(error = %e, learner_id, "Invalid UTF-8 in active track pointer");
                return Ok(None);
            }
        };

        Ok(self
            .get_learning_track(learner_id, &language_code)?
            .filter(|track| track.learner_id == learner_id && track.is_current_active))
    }

    /// Reuses the learner's track for `language_code` (or creates one) and makes it
    /// the only active track. Reads and writes happen in one transaction, so
    /// concurrent activations never duplicate a language or leave two tracks active.
    pub fn activate_learning_track(
        &self,
        learner_id: &str,
        language_code: &str,
    ) -> Result<LearningTrack, StoreError> {
        let language_code = language_code.trim().to_ascii_lowercase();
        if language_code.is_empty() || language_code.contains(':') {
            return Err(StoreError::Validation(format!(
                "invalid language code '{language_code}'"
            )));
        }

        let now = Utc::now();
        let candidate_id = uuid::Uuid::new_v4().to_string();
        let target_key = keys::learning_track_key(learner_id, &language_code);
        let active_key = keys::active_learning_track_key(learner_id);

        let (target, created) = (&self.learning_tracks, &self.active_learning_tracks)
            .transaction(|(tx_tracks, tx_active)| {
                let (mut target, created) = match tx_tracks.get(target_key.as_bytes())? {
                    Some(raw) => (
                        serde_json::from_slice::<LearningTrack>(&raw)
                            .map_err(|e| abort(StoreError::Serialization(e)))?,
                        false,
                    ),
                    None => (
                        LearningTrack {
                            id: candidate_id.clone(),
                            learner_id: learner_id.to_string(),
                            language_code: language_code.clone(),
                            is_current_active: true,
                            created_at: now,
                            updated_at: now,
                        },
                        true,
                    ),
                };

                if let Some(previous) = tx_active.get(active_key.as_bytes())? {
                    let previous = String::from_utf8_lossy(&previous).into_owned();
                    if previous != language_code {
                        let previous_key = keys::learning_track_key(learner_id, &previous);
                        if let Some(raw) = tx_tracks.get(previous_key.as_bytes())? {
                            let mut deactivated: LearningTrack = serde_json::from_slice(&raw)
                                .map_err(|e| abort(StoreError::Serialization(e)))?;
                            deactivated.is_current_active = false;
                            deactivated.updated_at = now;
                            let value = serde_json::to_vec(&deactivated)
                                .map_err(|e| abort(StoreError::Serialization(e)))?;
                            tx_tracks.insert(previous_key.as_bytes(), value)?;
                        }
                    }
                }

                target.is_current_active = true;
                target.updated_at = now;
                let value =
                    serde_json::to_vec(&target).map_err(|e| abort(StoreError::Serialization(e)))?;
                tx_tracks.insert(target_key.as_bytes(), value)?;
                tx_active.insert(active_key.as_bytes(), language_code.as_bytes())?;

                Ok::<(LearningTrack, bool), ConflictableTransactionError<StoreError>>((
                    target, created,
                ))
            })
            .map_err(flatten_tx_error)?;

        tracing::info!(
            learner_id,
            track_id = %target.id,
            language_code = %target.language_code,
            created,
            "Learning track activated"
        );
        Ok(target)
    }
}
