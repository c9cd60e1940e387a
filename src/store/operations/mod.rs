pub mod catalog;
pub mod learning_tracks;
pub mod review_items;
pub mod topic_tracks;
