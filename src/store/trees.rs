pub const CONFIG_VERSIONS: &str = "config_versions";

// Learner context (owned by the progress collaborator)
pub const LEARNING_TRACKS: &str = "learning_tracks";
pub const ACTIVE_LEARNING_TRACKS: &str = "active_learning_tracks";

// Content catalog
pub const TOPICS: &str = "topics";
pub const WORDS: &str = "words";
pub const TOPIC_WORDS: &str = "topic_words";

// Review scheduling
pub const TOPIC_TRACKS: &str = "topic_tracks";
pub const REVIEW_ITEMS: &str = "review_items";
pub const REVIEW_PRIORITY_INDEX: &str = "review_priority_index";
