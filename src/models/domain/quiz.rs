use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access settings of one timed quiz, as stored by the quiz repository.
///
/// Durations are stored in whole seconds, where `0` means "not set". Use the
/// accessor methods to read them as `Option<Duration>`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub time_open: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_close: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_limit_secs: i64,
    /// Minimum gap after the first attempt
    #[serde(default)]
    pub delay1_secs: i64,
    /// Minimum gap after the second and later attempts
    #[serde(default)]
    pub delay2_secs: i64,
    #[serde(default)]
    pub overdue_handling: OverdueHandling,
    #[serde(default)]
    pub grace_period_secs: i64,
    /// 0 = unlimited
    #[serde(default)]
    pub attempt_limit: u32,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub extra_passwords: Vec<String>,
    #[serde(default)]
    pub subnet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// What happens to an attempt still open when its end time passes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OverdueHandling {
    #[default]
    AutoSubmit,
    GracePeriod,
    AutoAbandon,
}

/// Out-of-range values saturate instead of panicking.
fn positive_secs(secs: i64) -> Option<Duration> {
    (secs > 0).then(|| Duration::try_seconds(secs).unwrap_or(Duration::MAX))
}

impl Quiz {
    pub fn new(id: &str, name: &str) -> Self {
        Quiz {
            id: id.to_string(),
            name: name.to_string(),
            time_open: None,
            time_close: None,
            time_limit_secs: 0,
            delay1_secs: 0,
            delay2_secs: 0,
            overdue_handling: OverdueHandling::default(),
            grace_period_secs: 0,
            attempt_limit: 0,
            password: String::new(),
            extra_passwords: Vec::new(),
            subnet: String::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        positive_secs(self.time_limit_secs)
    }

    pub fn delay1(&self) -> Option<Duration> {
        positive_secs(self.delay1_secs)
    }

    pub fn delay2(&self) -> Option<Duration> {
        positive_secs(self.delay2_secs)
    }

    pub fn grace_period(&self) -> Duration {
        positive_secs(self.grace_period_secs).unwrap_or_else(Duration::zero)
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn has_subnet(&self) -> bool {
        !self.subnet.trim().is_empty()
    }

    /// True once `now` is past a configured close time.
    pub fn is_closed_at(&self, now: DateTime<Utc>) -> bool {
        self.time_close.is_some_and(|close| now > close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_quiz_has_no_restrictions() {
        let quiz = Quiz::new("quiz-1", "Week 1");

        assert!(quiz.time_open.is_none());
        assert!(quiz.time_close.is_none());
        assert!(quiz.time_limit().is_none());
        assert!(quiz.delay1().is_none());
        assert!(!quiz.has_password());
        assert!(!quiz.has_subnet());
        assert_eq!(quiz.overdue_handling, OverdueHandling::AutoSubmit);
    }

    #[test]
    fn zero_and_negative_durations_read_as_unset() {
        let mut quiz = Quiz::new("quiz-1", "Week 1");
        quiz.time_limit_secs = 0;
        quiz.delay1_secs = -5;
        quiz.delay2_secs = 60;

        assert!(quiz.time_limit().is_none());
        assert!(quiz.delay1().is_none());
        assert_eq!(quiz.delay2(), Some(Duration::seconds(60)));
    }

    #[test]
    fn out_of_range_durations_saturate() {
        let mut quiz = Quiz::new("quiz-1", "Week 1");
        quiz.time_limit_secs = i64::MAX;
        quiz.grace_period_secs = i64::MAX;

        assert_eq!(quiz.time_limit(), Some(Duration::MAX));
        assert_eq!(quiz.grace_period(), Duration::MAX);
    }

    #[test]
    fn overdue_handling_serializes_lowercase() {
        let json = serde_json::to_string(&OverdueHandling::GracePeriod).unwrap();
        assert_eq!(json, "\"graceperiod\"");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let quiz: Quiz = serde_json::from_str(r#"{"id":"q","name":"Quiz"}"#).unwrap();

        assert_eq!(quiz.attempt_limit, 0);
        assert!(quiz.extra_passwords.is_empty());
        assert_eq!(quiz.overdue_handling, OverdueHandling::AutoSubmit);
    }
}
