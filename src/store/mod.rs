pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub config_versions: sled::Tree,
    pub learning_tracks: sled::Tree,
    pub active_learning_tracks: sled::Tree,
    pub topics: sled::Tree,
    pub words: sled::Tree,
    pub topic_words: sled::Tree,
    pub topic_tracks: sled::Tree,
    pub review_items: sled::Tree,
    // Secondary index trees
    pub review_priority_index: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let learning_tracks = db.open_tree(trees::LEARNING_TRACKS)?;
        let active_learning_tracks = db.open_tree(trees::ACTIVE_LEARNING_TRACKS)?;
        let topics = db.open_tree(trees::TOPICS)?;
        let words = db.open_tree(trees::WORDS)?;
        let topic_words = db.open_tree(trees::TOPIC_WORDS)?;
        let topic_tracks = db.open_tree(trees::TOPIC_TRACKS)?;
        let review_items = db.open_tree(trees::REVIEW_ITEMS)?;
        let review_priority_index = db.open_tree(trees::REVIEW_PRIORITY_INDEX)?;

        Ok(Self {
            db,
            config_versions,
            learning_tracks,
            active_learning_tracks,
            topics,
            words,
            topic_words,
            topic_tracks,
            review_items,
            review_priority_index,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    /// Cheap read used by health checks; returns the applied schema version.
    pub fn schema_version(&self) -> Result<u32, StoreError> {
        migrate::get_current_version(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Folds a sled transaction error back into the store's error type.
pub(crate) fn flatten_tx_error(error: sled::transaction::TransactionError<StoreError>) -> StoreError {
    match error {
        sled::transaction::TransactionError::Abort(store_error) => store_error,
        sled::transaction::TransactionError::Storage(storage_error) => {
            StoreError::Sled(storage_error)
        }
    }
}
