use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use std::collections::HashSet;

use crate::store::keys;
use crate::store::{flatten_tx_error, Store, StoreError};

/// Per-word review state within one topic track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub track_id: String,
    pub word_id: String,
    pub easiness_factor: f64,
    pub repetition_count: u32,
    pub priority_score: f64,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub last_difficulty: Option<DifficultyGrade>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Learner's self-reported difficulty for a word.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyGrade {
    Easy,
    Medium,
    Hard,
}

impl ReviewItem {
    fn priority_index_key(&self) -> String {
        keys::review_priority_index_key(&self.track_id, self.priority_score, &self.word_id)
    }
}

fn abort(error: StoreError) -> ConflictableTransactionError<StoreError> {
    ConflictableTransactionError::Abort(error)
}

impl Store {
    pub fn get_review_item(
        &self,
        track_id: &str,
        word_id: &str,
    ) -> Result<Option<ReviewItem>, StoreError> {
        let key = keys::review_item_key(track_id, word_id);
        match self.review_items.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_review_items(&self, track_id: &str) -> Result<Vec<ReviewItem>, StoreError> {
        let prefix = keys::review_item_prefix(track_id);
        let mut items = Vec::new();
        for item in self.review_items.scan_prefix(prefix.as_bytes()) {
            let (_, v) = item?;
            items.push(Self::deserialize::<ReviewItem>(&v)?);
        }
        Ok(items)
    }

    pub fn list_review_word_ids(&self, track_id: &str) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .list_review_items(track_id)?
            .into_iter()
            .map(|item| item.word_id)
            .collect())
    }

    /// Inserts the items whose (track, word) key is still free, in one transaction.
    /// Returns how many were actually written; keys already present are left untouched.
    pub fn insert_review_items_if_absent(&self, items: &[ReviewItem]) -> Result<usize, StoreError> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut prepared = Vec::with_capacity(items.len());
        for item in items {
            prepared.push((
                keys::review_item_key(&item.track_id, &item.word_id),
                item.priority_index_key(),
                Self::serialize(item)?,
            ));
        }

        (&self.review_items, &self.review_priority_index)
            .transaction(|(tx_items, tx_index)| {
                let mut inserted = 0usize;
                for (item_key, index_key, value) in &prepared {
                    if tx_items.get(item_key.as_bytes())?.is_some() {
                        continue;
                    }
                    tx_items.insert(item_key.as_bytes(), value.as_slice())?;
                    tx_index.insert(index_key.as_bytes(), &[])?;
                    inserted += 1;
                }
                Ok::<usize, ConflictableTransactionError<StoreError>>(inserted)
            })
            .map_err(flatten_tx_error)
    }

    /// Applies `apply` to the stored item and persists it together with its moved
    /// priority index entry. Returns `None` when the item does not exist.
    pub fn update_review_item<F>(
        &self,
        track_id: &str,
        word_id: &str,
        apply: F,
    ) -> Result<Option<ReviewItem>, StoreError>
    where
        F: Fn(&mut ReviewItem),
    {
        let key = keys::review_item_key(track_id, word_id);

        (&self.review_items, &self.review_priority_index)
            .transaction(|(tx_items, tx_index)| {
                let Some(raw) = tx_items.get(key.as_bytes())? else {
                    return Ok(None);
                };
                let mut item: ReviewItem =
                    serde_json::from_slice(&raw).map_err(|e| abort(StoreError::Serialization(e)))?;

                tx_index.remove(item.priority_index_key().as_bytes())?;
                apply(&mut item);

                let value = serde_json::to_vec(&item).map_err(|e| abort(StoreError::Serialization(e)))?;
                tx_items.insert(key.as_bytes(), value)?;
                tx_index.insert(item.priority_index_key().as_bytes(), &[])?;

                Ok::<Option<ReviewItem>, ConflictableTransactionError<StoreError>>(Some(item))
            })
            .map_err(flatten_tx_error)
    }

    /// Walks a track's items from highest to lowest priority, keeping those accepted
    /// by `filter`, until `limit` items are collected.
    pub fn scan_review_items_by_priority<F>(
        &self,
        track_id: &str,
        limit: usize,
        filter: F,
    ) -> Result<Vec<ReviewItem>, StoreError>
    where
        F: Fn(&ReviewItem) -> bool,
    {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let prefix = keys::review_priority_index_prefix(track_id);
        let mut selected = Vec::with_capacity(limit);

        for entry in self.review_priority_index.scan_prefix(prefix.as_bytes()) {
            let (index_key, _) = entry?;
            let Some(word_id) = keys::parse_review_priority_index_word(&index_key) else {
                continue;
            };
            let Some(item) = self.get_review_item(track_id, &word_id)? else {
                continue;
            };
            // Skip index entries left behind by a concurrent priority change.
            if item.priority_index_key().as_bytes() != index_key.as_ref() {
                continue;
            }
            if filter(&item) {
                selected.push(item);
                if selected.len() >= limit {
                    break;
                }
            }
        }

        Ok(selected)
    }

    /// Drops and recreates every priority index entry from the stored items.
    pub fn rebuild_review_priority_index(&self) -> Result<usize, StoreError> {
        self.review_priority_index.clear()?;
        let mut count = 0usize;
        for entry in self.review_items.iter() {
            let (_, value) = entry?;
            let item: ReviewItem = Self::deserialize(&value)?;
            self.review_priority_index
                .insert(item.priority_index_key().as_bytes(), &[])?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::{DifficultyGrade, ReviewItem};
    use crate::store::Store;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn mock_review_item(track_id: &str, word_id: &str, priority: f64) -> ReviewItem {
        let now = Utc::now();
        ReviewItem {
            track_id: track_id.to_string(),
            word_id: word_id.to_string(),
            easiness_factor: 2.5,
            repetition_count: 0,
            priority_score: priority,
            last_reviewed_at: None,
            last_difficulty: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_if_absent_skips_existing_keys() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let first = vec![mock_review_item("t1", "w1", 10.2), mock_review_item("t1", "w2", 10.7)];
        assert_eq!(store.insert_review_items_if_absent(&first).unwrap(), 2);

        let mut again = vec![mock_review_item("t1", "w1", 10.9), mock_review_item("t1", "w3", 10.1)];
        again[0].repetition_count = 7;
        assert_eq!(store.insert_review_items_if_absent(&again).unwrap(), 1);

        let w1 = store.get_review_item("t1", "w1").unwrap().unwrap();
        assert_eq!(w1.repetition_count, 0);
        assert_eq!(w1.priority_score, 10.2);
        assert_eq!(store.list_review_items("t1").unwrap().len(), 3);
        assert_eq!(store.review_priority_index.len(), 3);
    }

    #[test]
    fn scan_returns_descending_priority_and_respects_limit() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-scan").to_str().unwrap()).unwrap();

        let items = vec![
            mock_review_item("t1", "low", 1.5),
            mock_review_item("t1", "high", 10.9),
            mock_review_item("t1", "negative", -3.0),
            mock_review_item("t1", "mid", 6.2),
            mock_review_item("t2", "other", 99.0),
        ];
        store.insert_review_items_if_absent(&items).unwrap();

        let top = store.scan_review_items_by_priority("t1", 3, |_| true).unwrap();
        let ids: Vec<&str> = top.iter().map(|i| i.word_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);

        let all = store.scan_review_items_by_priority("t1", 10, |_| true).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].word_id, "negative");
    }

    #[test]
    fn update_moves_priority_index_entry() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-update").to_str().unwrap()).unwrap();

        store
            .insert_review_items_if_absent(&[
                mock_review_item("t1", "w1", 10.5),
                mock_review_item("t1", "w2", 10.1),
            ])
            .unwrap();

        let reviewed_at = Utc::now() - Duration::minutes(1);
        let updated = store
            .update_review_item("t1", "w1", |item| {
                item.repetition_count += 1;
                item.priority_score = 2.0;
                item.last_reviewed_at = Some(reviewed_at);
                item.last_difficulty = Some(DifficultyGrade::Hard);
            })
            .unwrap()
            .unwrap();
        assert_eq!(updated.repetition_count, 1);

        assert_eq!(store.review_priority_index.len(), 2);
        let ordered = store.scan_review_items_by_priority("t1", 10, |_| true).unwrap();
        assert_eq!(ordered[0].word_id, "w2");
        assert_eq!(ordered[1].word_id, "w1");
        assert_eq!(ordered[1].last_difficulty, Some(DifficultyGrade::Hard));
    }

    #[test]
    fn update_of_missing_item_returns_none() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-missing").to_str().unwrap()).unwrap();

        let result = store
            .update_review_item("t1", "ghost", |item| item.repetition_count += 1)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn scan_filter_skips_rejected_items() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-filter").to_str().unwrap()).unwrap();

        let mut recent = mock_review_item("t1", "recent", 20.0);
        recent.last_reviewed_at = Some(Utc::now());
        store
            .insert_review_items_if_absent(&[recent, mock_review_item("t1", "fresh", 5.0)])
            .unwrap();

        let eligible = store
            .scan_review_items_by_priority("t1", 10, |item| item.last_reviewed_at.is_none())
            .unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].word_id, "fresh");
    }

    #[test]
    fn rebuild_restores_index() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db-rebuild").to_str().unwrap()).unwrap();

        store
            .insert_review_items_if_absent(&[
                mock_review_item("t1", "w1", 3.0),
                mock_review_item("t1", "w2", 4.0),
            ])
            .unwrap();
        store.review_priority_index.clear().unwrap();
        assert!(store.scan_review_items_by_priority("t1", 10, |_| true).unwrap().is_empty());

        assert_eq!(store.rebuild_review_priority_index().unwrap(), 2);
        let ordered = store.scan_review_items_by_priority("t1", 10, |_| true).unwrap();
        assert_eq!(ordered[0].word_id, "w2");
    }
}
