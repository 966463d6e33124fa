use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const DEFAULT_DATE_FORMAT: &str = "%A, %-d %B %Y, %-I:%M %p";

/// Every user-facing message an access rule can produce.
///
/// Rules only ever return these values; turning them into text is the job of a
/// [`MessageProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum AccessMessage {
    NotAvailableUntil { time_open: DateTime<Utc> },
    ClosesOn { time_close: DateTime<Utc> },
    ClosedOn { time_close: DateTime<Utc> },
    OpenedOn { time_open: DateTime<Utc> },
    NotAvailable,
    MustWait { next_start: DateTime<Utc> },
    CannotWait,
    TimeLimit { limit_secs: i64 },
    ConfirmStartTimeLimit { limit_secs: i64 },
    RequiresPassword,
    PasswordError,
    SubnetWrong,
    AttemptsAllowed { max: u32 },
    NoMoreAttempts,
}

impl AccessMessage {
    pub fn key(&self) -> &'static str {
        match self {
            AccessMessage::NotAvailableUntil { .. } => "not_available_until",
            AccessMessage::ClosesOn { .. } => "closes_on",
            AccessMessage::ClosedOn { .. } => "closed_on",
            AccessMessage::OpenedOn { .. } => "opened_on",
            AccessMessage::NotAvailable => "not_available",
            AccessMessage::MustWait { .. } => "must_wait",
            AccessMessage::CannotWait => "cannot_wait",
            AccessMessage::TimeLimit { .. } => "time_limit",
            AccessMessage::ConfirmStartTimeLimit { .. } => "confirm_start_time_limit",
            AccessMessage::RequiresPassword => "requires_password",
            AccessMessage::PasswordError => "password_error",
            AccessMessage::SubnetWrong => "subnet_wrong",
            AccessMessage::AttemptsAllowed { .. } => "attempts_allowed",
            AccessMessage::NoMoreAttempts => "no_more_attempts",
        }
    }
}

pub trait MessageProvider: Send + Sync {
    fn resolve(&self, message: &AccessMessage) -> String;

    fn resolve_all(&self, messages: &[AccessMessage]) -> Vec<String> {
        messages.iter().map(|m| self.resolve(m)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct EnglishMessages {
    date_format: String,
}

impl EnglishMessages {
    pub fn new(date_format: &str) -> Self {
        Self {
            date_format: date_format.to_string(),
        }
    }

    fn date(&self, time: &DateTime<Utc>) -> String {
        time.format(&self.date_format).to_string()
    }
}

impl Default for EnglishMessages {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl MessageProvider for EnglishMessages {
    fn resolve(&self, message: &AccessMessage) -> String {
        match message {
            AccessMessage::NotAvailableUntil { time_open } => {
                format!("The quiz will not be available until {}", self.date(time_open))
            }
            AccessMessage::ClosesOn { time_close } => {
                format!("This quiz will close on {}.", self.date(time_close))
            }
            AccessMessage::ClosedOn { time_close } => {
                format!("This quiz closed on {}", self.date(time_close))
            }
            AccessMessage::OpenedOn { time_open } => {
                format!("This quiz opened on {}", self.date(time_open))
            }
            AccessMessage::NotAvailable => "The quiz is not available".to_string(),
            AccessMessage::MustWait { next_start } => format!(
                "You must wait before you may re-attempt this quiz. You will be allowed to start another attempt after {}.",
                self.date(next_start)
            ),
            AccessMessage::CannotWait => {
                "You are not allowed to attempt this quiz again before it closes.".to_string()
            }
            AccessMessage::TimeLimit { limit_secs } => {
                format!("Time limit: {}", format_duration(Duration::seconds(*limit_secs)))
            }
            AccessMessage::ConfirmStartTimeLimit { limit_secs } => format!(
                "Your attempt will have a time limit of {}. When you start, the timer will begin to count down and cannot be paused.",
                format_duration(Duration::seconds(*limit_secs))
            ),
            AccessMessage::RequiresPassword => {
                "To attempt this quiz you need to know the quiz password".to_string()
            }
            AccessMessage::PasswordError => "The password entered was incorrect".to_string(),
            AccessMessage::SubnetWrong => {
                "This quiz is only accessible from certain locations, and this computer is not on the allowed list."
                    .to_string()
            }
            AccessMessage::AttemptsAllowed { max } => format!("Attempts allowed: {}", max),
            AccessMessage::NoMoreAttempts => "No more attempts are allowed".to_string(),
        }
    }
}

fn plural(value: i64, one: &str, many: &str) -> String {
    if value == 1 {
        format!("{} {}", value, one)
    } else {
        format!("{} {}", value, many)
    }
}

/// Renders a duration as e.g. "1 day 2 hours", "1 hour 30 mins", "45 secs".
///
/// At most the two largest non-zero units are shown. Negative durations are
/// rendered by magnitude.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().abs();
    if total == 0 {
        return "now".to_string();
    }

    let units = [
        (total / 86_400, "day", "days"),
        (total % 86_400 / 3_600, "hour", "hours"),
        (total % 3_600 / 60, "min", "mins"),
        (total % 60, "sec", "secs"),
    ];

    units
        .iter()
        .filter(|(value, _, _)| *value > 0)
        .take(2)
        .map(|(value, one, many)| plural(*value, one, many))
        .collect::<Vec<_>>()
        .join(" ")
}
