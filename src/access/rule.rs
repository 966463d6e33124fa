use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::access::{messages::AccessMessage, session::AccessSession};
use crate::models::domain::QuizAttempt;

/// How close to an end time the countdown starts being shown.
pub const SHOW_TIME_BEFORE_DEADLINE_SECS: i64 = 3600;

/// `time + delta`, clamped to the latest representable instant.
pub fn saturating_add(time: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    time.checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// True once `now` is inside the countdown window before `end_time`.
pub fn in_countdown_window(end_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    end_time
        .checked_sub_signed(Duration::seconds(SHOW_TIME_BEFORE_DEADLINE_SECS))
        .map_or(true, |window_start| now > window_start)
}

/// Data the user submits on the preflight form before starting an attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreflightData {
    #[serde(default)]
    pub password: Option<String>,
}

/// A preflight failure, attached to the form field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: AccessMessage,
}

/// One access policy bound to a quiz and an evaluation time.
///
/// Every method defaults to "no restriction", so a rule only overrides what it
/// actually restricts. `None` and `false` always mean "this rule has nothing
/// to say".
pub trait AccessRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> Vec<AccessMessage> {
        Vec::new()
    }

    /// Whether the user may access the quiz at all right now.
    fn prevent_access(&self) -> Option<AccessMessage> {
        None
    }

    /// Whether the user may start attempt number `prior_count + 1`.
    fn prevent_new_attempt(
        &self,
        _prior_count: u32,
        _last_attempt: Option<&QuizAttempt>,
    ) -> Option<AccessMessage> {
        None
    }

    /// True if this rule will never let the user start another attempt.
    fn is_finished(&self, _prior_count: u32, _last_attempt: Option<&QuizAttempt>) -> bool {
        false
    }

    fn end_time(&self, _attempt: &QuizAttempt) -> Option<DateTime<Utc>> {
        None
    }

    /// Time left before `end_time`, once inside the warning window.
    ///
    /// May be negative when the attempt is already overdue.
    fn time_left_display(&self, attempt: &QuizAttempt, now: DateTime<Utc>) -> Option<Duration> {
        let end_time = self.end_time(attempt)?;
        in_countdown_window(end_time, now).then(|| end_time - now)
    }

    fn is_preflight_check_required(
        &self,
        _session: &AccessSession,
        _attempt_in_progress: bool,
    ) -> bool {
        false
    }

    /// Message shown on the preflight form, if this rule contributes one.
    fn preflight_message(&self) -> Option<AccessMessage> {
        None
    }

    fn validate_preflight_check(&self, _data: &PreflightData) -> Option<FieldError> {
        None
    }

    fn notify_preflight_check_passed(&self, _session: &mut AccessSession) {}

    fn current_attempt_finished(&self, _session: &mut AccessSession) {}
}
