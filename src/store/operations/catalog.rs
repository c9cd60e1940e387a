use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use sled::transaction::ConflictableTransactionError;
use sled::Transactional;

use crate::store::keys;
use crate::store::{flatten_tx_error, Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub level: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub topic_id: String,
    pub word: String,
    pub definition: String,
    pub example: Option<String>,
    pub example_translation: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn upsert_topic(&self, topic: &Topic) -> Result<(), StoreError> {
        let key = keys::topic_key(&topic.id);
        self.topics.insert(key.as_bytes(), Self::serialize(topic)?)?;
        Ok(())
    }

    /// Stores the word and links it to its topic. A word moved to another topic
    /// loses its old link in the same transaction.
    pub fn upsert_word(&self, word: &Word) -> Result<(), StoreError> {
        if word.word.trim().is_empty() {
            return Err(StoreError::Validation("word text must not be empty".to_string()));
        }
        let key = keys::word_key(&word.id);
        let value = Self::serialize(word)?;
        let link = keys::topic_words_key(&word.topic_id, &word.id);

        (&self.words, &self.topic_words)
            .transaction(|(tx_words, tx_links)| {
                if let Some(raw) = tx_words.get(key.as_bytes())? {
                    let previous: Word = serde_json::from_slice(&raw).map_err(|e| {
                        ConflictableTransactionError::Abort(StoreError::Serialization(e))
                    })?;
                    if previous.topic_id != word.topic_id {
                        let stale = keys::topic_words_key(&previous.topic_id, &word.id);
                        tx_links.remove(stale.as_bytes())?;
                    }
                }
                tx_words.insert(key.as_bytes(), value.as_slice())?;
                tx_links.insert(link.as_bytes(), word.id.as_bytes())?;
                Ok::<(), ConflictableTransactionError<StoreError>>(())
            })
            .map_err(flatten_tx_error)
    }

    pub fn get_word(&self, word_id: &str) -> Result<Option<Word>, StoreError> {
        let key = keys::word_key(word_id);
        match self.words.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_topic_word_ids(&self, topic_id: &str) -> Result<Vec<String>, StoreError> {
        let prefix = keys::topic_words_prefix(topic_id);
        let mut word_ids = Vec::new();
        for item in self.topic_words.scan_prefix(prefix.as_bytes()) {
            let (_, v) = item?;
            match String::from_utf8(v.to_vec()) {
                Ok(id) => word_ids.push(id),
                Err(e) => tracing::warn!(error = %e, topic_id, "Invalid UTF-8 in topic word link"),
            }
        }
        Ok(word_ids)
    }

    /// Looks words up in the given order; unknown ids are skipped.
    pub fn get_words_by_ids(&self, word_ids: &[String]) -> Result<Vec<Word>, StoreError> {
        let mut cache: HashMap<&str, Option<Word>> = HashMap::with_capacity(word_ids.len());
        let mut words = Vec::with_capacity(word_ids.len());

        for word_id in word_ids {
            if !cache.contains_key(word_id.as_str()) {
                let word = self.get_word(word_id)?;
                cache.insert(word_id.as_str(), word);
            }
            if let Some(Some(word)) = cache.get(word_id.as_str()) {
                words.push(word.clone());
            }
        }

        Ok(words)
    }
}
