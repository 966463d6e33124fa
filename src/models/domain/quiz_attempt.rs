use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    /// 1-based sequence number among the user's attempts
    pub attempt_number: u32,
    pub state: AttemptState,
    pub time_start: DateTime<Utc>,
    #[serde(default)]
    pub time_finish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    InProgress,
    Overdue,
    Finished,
    Abandoned,
}

impl QuizAttempt {
    pub fn start(
        user_id: &str,
        quiz_id: &str,
        attempt_number: u32,
        time_start: DateTime<Utc>,
        preview: bool,
    ) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            attempt_number,
            state: AttemptState::InProgress,
            time_start,
            time_finish: None,
            preview,
        }
    }

    /// In progress or overdue; either way the user can still come back to it.
    pub fn is_open(&self) -> bool {
        matches!(self.state, AttemptState::InProgress | AttemptState::Overdue)
    }

    pub fn finish(&mut self, at: DateTime<Utc>) {
        self.state = AttemptState::Finished;
        self.time_finish = Some(at);
    }

    pub fn abandon(&mut self, at: DateTime<Utc>) {
        self.state = AttemptState::Abandoned;
        self.time_finish = Some(at);
    }
}
