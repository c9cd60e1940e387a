/// Easiness factor of a freshly initialized word
pub const INITIAL_EASINESS_FACTOR: f64 = 2.5;

/// Floor for the easiness factor
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

/// Base priority for initialized and reviewed items
pub const PRIORITY_BASE: f64 = 10.0;

/// Repetitions beyond this no longer lower the priority
pub const PRIORITY_REPETITION_CAP: u32 = 5;

/// Repetitions at which a word counts as mastered
pub const MASTERED_REPETITION_THRESHOLD: u32 = 3;

/// Minutes after a review during which the item is not served again
pub const REVIEW_GRACE_PERIOD_MINUTES: i64 = 5;

/// Default size of a review batch
pub const DEFAULT_REVIEW_LIMIT: usize = 20;

/// Largest review batch a caller may request
pub const MAX_REVIEW_LIMIT: usize = 100;

/// Maximum length of topic and word ids
pub const MAX_ID_LENGTH: usize = 128;
