use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::access::{
    messages::AccessMessage,
    rule::{saturating_add, AccessRule, FieldError, PreflightData},
    rules::{
        DelayBetweenAttemptsRule, IpAddressRule, NumAttemptsRule, OpenCloseDateRule,
        PasswordRule, TimeLimitRule,
    },
    session::AccessSession,
};
use crate::models::domain::{OverdueHandling, Quiz, QuizAttempt};

/// What should happen to an open attempt at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OverdueOutcome {
    InProgress,
    /// Submit as if the user had finished at `at`.
    Submit { at: DateTime<Utc> },
    /// Past the end time, but may still be submitted until `submit_by`.
    Overdue { submit_by: DateTime<Utc> },
    Abandon,
}

/// The applicable access rules for one quiz at one moment.
pub struct AccessManager<'a> {
    quiz: &'a Quiz,
    rules: Vec<Box<dyn AccessRule + 'a>>,
}

impl<'a> AccessManager<'a> {
    /// Builds only the rules whose precondition holds for `quiz`.
    pub fn new(
        quiz: &'a Quiz,
        now: DateTime<Utc>,
        can_ignore_time_limits: bool,
        remote_addr: &'a str,
    ) -> Self {
        let mut rules: Vec<Box<dyn AccessRule + 'a>> = Vec::new();

        if let Some(rule) = DelayBetweenAttemptsRule::make(quiz, now) {
            rules.push(Box::new(rule));
        }
        if let Some(rule) = IpAddressRule::make(quiz, remote_addr) {
            rules.push(Box::new(rule));
        }
        if let Some(rule) = NumAttemptsRule::make(quiz) {
            rules.push(Box::new(rule));
        }
        if let Some(rule) = OpenCloseDateRule::make(quiz, now) {
            rules.push(Box::new(rule));
        }
        if let Some(rule) = PasswordRule::make(quiz) {
            rules.push(Box::new(rule));
        }
        if let Some(rule) = TimeLimitRule::make(quiz, can_ignore_time_limits) {
            rules.push(Box::new(rule));
        }

        Self { quiz, rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn describe_rules(&self) -> Vec<AccessMessage> {
        self.rules.iter().flat_map(|rule| rule.description()).collect()
    }

    /// Every reason the quiz cannot be accessed now, in rule order.
    pub fn prevent_access(&self) -> Vec<AccessMessage> {
        self.collect_blocks(|rule| rule.prevent_access())
    }

    /// Every reason a new attempt cannot be started now, in rule order.
    pub fn prevent_new_attempt(
        &self,
        prior_count: u32,
        last_attempt: Option<&QuizAttempt>,
    ) -> Vec<AccessMessage> {
        self.collect_blocks(|rule| rule.prevent_new_attempt(prior_count, last_attempt))
    }

    fn collect_blocks<F>(&self, check: F) -> Vec<AccessMessage>
    where
        F: Fn(&dyn AccessRule) -> Option<AccessMessage>,
    {
        self.rules
            .iter()
            .filter_map(|rule| {
                let message = check(rule.as_ref())?;
                log::debug!(
                    "quiz {}: rule {} blocks with {}",
                    self.quiz.id,
                    rule.name(),
                    message.key()
                );
                Some(message)
            })
            .collect()
    }

    pub fn is_finished(&self, prior_count: u32, last_attempt: Option<&QuizAttempt>) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.is_finished(prior_count, last_attempt))
    }

    /// The earliest end time any rule imposes on `attempt`.
    pub fn end_time(&self, attempt: &QuizAttempt) -> Option<DateTime<Utc>> {
        self.rules.iter().filter_map(|rule| rule.end_time(attempt)).min()
    }

    /// The shortest time left any rule wants displayed.
    pub fn time_left_display(&self, attempt: &QuizAttempt, now: DateTime<Utc>) -> Option<Duration> {
        self.rules
            .iter()
            .filter_map(|rule| rule.time_left_display(attempt, now))
            .min()
    }

    pub fn is_preflight_check_required(
        &self,
        session: &AccessSession,
        attempt_in_progress: bool,
    ) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.is_preflight_check_required(session, attempt_in_progress))
    }

    pub fn preflight_messages(
        &self,
        session: &AccessSession,
        attempt_in_progress: bool,
    ) -> Vec<AccessMessage> {
        self.rules
            .iter()
            .filter(|rule| rule.is_preflight_check_required(session, attempt_in_progress))
            .filter_map(|rule| rule.preflight_message())
            .collect()
    }

    /// Checks the form against the rules still asking for a preflight, so a
    /// check already passed this session is not re-validated.
    pub fn validate_preflight_check(
        &self,
        data: &PreflightData,
        session: &AccessSession,
        attempt_in_progress: bool,
    ) -> Vec<FieldError> {
        self.rules
            .iter()
            .filter(|rule| rule.is_preflight_check_required(session, attempt_in_progress))
            .filter_map(|rule| rule.validate_preflight_check(data))
            .collect()
    }

    pub fn notify_preflight_check_passed(&self, session: &mut AccessSession) {
        for rule in &self.rules {
            rule.notify_preflight_check_passed(session);
        }
    }

    pub fn current_attempt_finished(&self, session: &mut AccessSession) {
        for rule in &self.rules {
            rule.current_attempt_finished(session);
        }
    }

    /// Applies the quiz's overdue handling to an open attempt.
    pub fn overdue_outcome(&self, attempt: &QuizAttempt, now: DateTime<Utc>) -> OverdueOutcome {
        let Some(end_time) = self.end_time(attempt) else {
            return OverdueOutcome::InProgress;
        };
        if now <= end_time {
            return OverdueOutcome::InProgress;
        }

        match self.quiz.overdue_handling {
            OverdueHandling::AutoSubmit => OverdueOutcome::Submit { at: end_time },
            OverdueHandling::GracePeriod => {
                let submit_by = saturating_add(end_time, self.quiz.grace_period());
                if now <= submit_by {
                    OverdueOutcome::Overdue { submit_by }
                } else {
                    OverdueOutcome::Abandon
                }
            }
            OverdueHandling::AutoAbandon => OverdueOutcome::Abandon,
        }
    }
}
