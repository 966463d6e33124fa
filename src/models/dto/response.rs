use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::access::OverdueOutcome;
use crate::models::domain::QuizAttempt;

/// Everything a client needs to render the quiz entry page.
#[derive(Debug, Clone, Serialize)]
pub struct AccessSummary {
    pub quiz_id: String,
    /// Human-readable restrictions, in rule order
    pub rules: Vec<String>,
    /// Why the quiz cannot be accessed at all; empty when it can
    pub prevent_access: Vec<String>,
    /// Why no new attempt can be started; empty when one can
    pub prevent_new_attempt: Vec<String>,
    pub is_finished: bool,
    pub attempts_used: u32,
    pub can_start_attempt: bool,
    pub preflight_required: bool,
    pub preflight_messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_attempt: Option<CurrentAttemptDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentAttemptDto {
    pub attempt: QuizAttempt,
    pub end_time: Option<DateTime<Utc>>,
    /// Negative when overdue
    pub time_left_secs: Option<i64>,
    pub overdue: OverdueOutcome,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}
