use crate::access::{messages::AccessMessage, rule::AccessRule};
use crate::models::domain::{Quiz, QuizAttempt};

/// Caps the number of attempts. An attempt limit of 0 means unlimited.
pub struct NumAttemptsRule<'a> {
    quiz: &'a Quiz,
}

impl<'a> NumAttemptsRule<'a> {
    pub fn make(quiz: &'a Quiz) -> Option<Self> {
        Some(Self { quiz })
    }

    fn limit_reached(&self, prior_count: u32) -> bool {
        self.quiz.attempt_limit > 0 && prior_count >= self.quiz.attempt_limit
    }
}

impl AccessRule for NumAttemptsRule<'_> {
    fn name(&self) -> &'static str {
        "numattempts"
    }

    fn description(&self) -> Vec<AccessMessage> {
        if self.quiz.attempt_limit == 0 {
            return Vec::new();
        }
        vec![AccessMessage::AttemptsAllowed {
            max: self.quiz.attempt_limit,
        }]
    }

    fn prevent_new_attempt(
        &self,
        prior_count: u32,
        _last_attempt: Option<&QuizAttempt>,
    ) -> Option<AccessMessage> {
        self.limit_reached(prior_count)
            .then_some(AccessMessage::NoMoreAttempts)
    }

    fn is_finished(&self, prior_count: u32, _last_attempt: Option<&QuizAttempt>) -> bool {
        self.limit_reached(prior_count)
    }
}
