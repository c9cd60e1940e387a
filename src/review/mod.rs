//! Vocabulary review scheduling: serves due words by priority and updates easiness
//! and priority from the learner's self-graded difficulty.

pub mod algorithm;
pub mod clock;
pub mod collaborators;
pub mod resolver;
pub mod scheduler;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::ReviewScheduler;
pub use types::{ActiveTrack, ReviewError, ReviewStats, ReviewStatus};
