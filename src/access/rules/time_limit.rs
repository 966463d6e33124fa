use chrono::{DateTime, Duration, Utc};

use crate::access::{
    messages::AccessMessage,
    rule::{saturating_add, AccessRule},
    session::AccessSession,
};
use crate::models::domain::{Quiz, QuizAttempt};

/// Gives each attempt an end time `time_limit` after it started. Never blocks
/// access; the attempt controller applies overdue handling past the end time.
pub struct TimeLimitRule {
    time_limit: Duration,
}

impl TimeLimitRule {
    pub fn make(quiz: &Quiz, can_ignore_time_limits: bool) -> Option<Self> {
        if can_ignore_time_limits {
            return None;
        }
        let time_limit = quiz.time_limit()?;
        Some(Self { time_limit })
    }

    fn limit_secs(&self) -> i64 {
        self.time_limit.num_seconds()
    }
}

impl AccessRule for TimeLimitRule {
    fn name(&self) -> &'static str {
        "timelimit"
    }

    fn description(&self) -> Vec<AccessMessage> {
        vec![AccessMessage::TimeLimit {
            limit_secs: self.limit_secs(),
        }]
    }

    fn end_time(&self, attempt: &QuizAttempt) -> Option<DateTime<Utc>> {
        Some(saturating_add(attempt.time_start, self.time_limit))
    }

    fn time_left_display(&self, attempt: &QuizAttempt, now: DateTime<Utc>) -> Option<Duration> {
        let end_time = self.end_time(attempt)?;
        // A teacher preview past its limit gets no countdown.
        if attempt.preview && now > end_time {
            return None;
        }
        Some(end_time - now)
    }

    fn is_preflight_check_required(
        &self,
        _session: &AccessSession,
        attempt_in_progress: bool,
    ) -> bool {
        // Starting the clock needs confirming; resuming does not.
        !attempt_in_progress
    }

    fn preflight_message(&self) -> Option<AccessMessage> {
        Some(AccessMessage::ConfirmStartTimeLimit {
            limit_secs: self.limit_secs(),
        })
    }
}
