// Learning track keys. Learner ids come from token subjects and may contain
// ':', so they are length-prefixed to keep one learner's prefix from matching
// another's keys.
fn learner_segment(learner_id: &str) -> String {
    format!("{}#{}", learner_id.len(), learner_id)
}

pub fn learning_track_key(learner_id: &str, language_code: &str) -> String {
    format!("{}:{}", learner_segment(learner_id), language_code)
}

pub fn learning_track_prefix(learner_id: &str) -> String {
    format!("{}:", learner_segment(learner_id))
}

pub fn active_learning_track_key(learner_id: &str) -> String {
    learner_segment(learner_id)
}

// Catalog keys
pub fn topic_key(topic_id: &str) -> String {
    topic_id.to_string()
}

pub fn word_key(word_id: &str) -> String {
    word_id.to_string()
}

pub fn topic_words_key(topic_id: &str, word_id: &str) -> String {
    format!("{}:{}", topic_id, word_id)
}

pub fn topic_words_prefix(topic_id: &str) -> String {
    format!("{}:", topic_id)
}

// Topic track keys
pub fn topic_track_key(learner_track_id: &str, topic_id: &str) -> String {
    format!("{}:{}", learner_track_id, topic_id)
}

pub fn topic_track_prefix(learner_track_id: &str) -> String {
    format!("{}:", learner_track_id)
}

// Review item keys
pub fn review_item_key(track_id: &str, word_id: &str) -> String {
    format!("{}:{}", track_id, word_id)
}

pub fn review_item_prefix(track_id: &str) -> String {
    format!("{}:", track_id)
}

/// Index key sorting a track's items by priority, highest first.
pub fn review_priority_index_key(track_id: &str, priority: f64, word_id: &str) -> String {
    format!(
        "{}:{:016x}:{}",
        track_id,
        descending_priority_bits(priority),
        word_id
    )
}

pub fn review_priority_index_prefix(track_id: &str) -> String {
    format!("{}:", track_id)
}

/// Maps an f64 onto a u64 whose ascending order is the float's descending order.
fn descending_priority_bits(priority: f64) -> u64 {
    let bits = priority.to_bits();
    let ascending = if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits | (1 << 63)
    };
    u64::MAX - ascending
}

/// Splits an index key back into its word id. Track ids never contain ':'.
pub fn parse_review_priority_index_word(key: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(key).ok()?;
    let mut parts = text.splitn(3, ':');
    let _track = parts.next()?;
    let bits = parts.next()?;
    if bits.len() != 16 || !bits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    parts.next().map(str::to_string)
}
