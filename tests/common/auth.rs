use vocab_review_backend::auth::sign_learner_token;

use super::app::TestApp;

pub fn token_for(app: &TestApp, learner_id: &str) -> String {
    sign_learner_token(learner_id, &app.config.jwt_secret, 1).expect("sign token")
}

/// A fresh learner id and a token for it.
pub fn new_learner(app: &TestApp) -> (String, String) {
    let learner_id = format!("learner-{}", uuid::Uuid::new_v4().simple());
    let token = token_for(app, &learner_id);
    (learner_id, token)
}
