use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::access::PreflightData;
use crate::models::domain::{OverdueHandling, Quiz};

/// Ten years; longer durations are treated as input mistakes.
pub const MAX_DURATION_SECS: i64 = 315_360_000;

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_dates"))]
pub struct UpsertQuizRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    pub time_open: Option<DateTime<Utc>>,

    #[serde(default)]
    pub time_close: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(range(min = 0, max = MAX_DURATION_SECS))]
    pub time_limit_secs: i64,

    #[serde(default)]
    #[validate(range(min = 0, max = MAX_DURATION_SECS))]
    pub delay1_secs: i64,

    #[serde(default)]
    #[validate(range(min = 0, max = MAX_DURATION_SECS))]
    pub delay2_secs: i64,

    #[serde(default)]
    pub overdue_handling: OverdueHandling,

    #[serde(default)]
    #[validate(range(min = 0, max = MAX_DURATION_SECS))]
    pub grace_period_secs: i64,

    #[serde(default)]
    pub attempt_limit: u32,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub password: String,

    #[serde(default)]
    pub extra_passwords: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 1024))]
    pub subnet: String,
}

fn validate_dates(request: &UpsertQuizRequest) -> Result<(), ValidationError> {
    if let (Some(open), Some(close)) = (request.time_open, request.time_close) {
        if close < open {
            return Err(ValidationError::new("close_before_open")
                .with_message("time_close must not be before time_open".into()));
        }
    }
    Ok(())
}

impl UpsertQuizRequest {
    /// Applies the request on top of `existing`, or builds a new quiz.
    pub fn into_quiz(self, id: &str, existing: Option<Quiz>) -> Quiz {
        let mut quiz = existing.unwrap_or_else(|| Quiz::new(id, &self.name));
        quiz.name = self.name;
        quiz.time_open = self.time_open;
        quiz.time_close = self.time_close;
        quiz.time_limit_secs = self.time_limit_secs;
        quiz.delay1_secs = self.delay1_secs;
        quiz.delay2_secs = self.delay2_secs;
        quiz.overdue_handling = self.overdue_handling;
        quiz.grace_period_secs = self.grace_period_secs;
        quiz.attempt_limit = self.attempt_limit;
        quiz.password = self.password;
        quiz.extra_passwords = self
            .extra_passwords
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        quiz.subnet = self.subnet;
        quiz.modified_at = Some(Utc::now());
        quiz
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartAttemptRequest {
    /// Answers to the preflight form, when the client showed one.
    #[serde(default)]
    pub preflight: Option<PreflightData>,
}
