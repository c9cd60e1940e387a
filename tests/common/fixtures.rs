use chrono::Utc;

use vocab_review_backend::review::ActiveTrack;
use vocab_review_backend::store::operations::catalog::{Topic, Word};
use vocab_review_backend::store::Store;

pub fn seed_topic(store: &Store, word_count: usize) -> (Topic, Vec<Word>) {
    let now = Utc::now();
    let topic = Topic {
        id: format!("topic-{}", uuid::Uuid::new_v4().simple()),
        name: "Kitchen".to_string(),
        image_url: None,
        level: 1,
        created_at: now,
    };
    store.upsert_topic(&topic).expect("seed topic");

    let words = (0..word_count)
        .map(|idx| seed_word(store, &topic.id, &format!("word-{idx}")))
        .collect();
    (topic, words)
}

pub fn seed_word(store: &Store, topic_id: &str, text: &str) -> Word {
    let word = Word {
        id: format!("w-{}", uuid::Uuid::new_v4().simple()),
        topic_id: topic_id.to_string(),
        word: text.to_string(),
        definition: format!("definition of {text}"),
        example: Some(format!("An example with {text}.")),
        example_translation: None,
        image_url: None,
        audio_url: None,
        created_at: Utc::now(),
    };
    store.upsert_word(&word).expect("seed word");
    word
}

pub fn activate(store: &Store, learner_id: &str, language_code: &str) -> ActiveTrack {
    let track = store
        .activate_learning_track(learner_id, language_code)
        .expect("activate track");
    ActiveTrack {
        learner_id: learner_id.to_string(),
        learner_track_id: track.id,
    }
}
