use chrono::{DateTime, Utc};

use crate::access::{
    messages::AccessMessage,
    rule::{saturating_add, AccessRule},
};
use crate::models::domain::{Quiz, QuizAttempt};

/// Enforces a minimum gap between the end of one attempt and the start of
/// the next: `delay1` after the first attempt, `delay2` after later ones.
pub struct DelayBetweenAttemptsRule<'a> {
    quiz: &'a Quiz,
    now: DateTime<Utc>,
}

impl<'a> DelayBetweenAttemptsRule<'a> {
    pub fn make(quiz: &'a Quiz, now: DateTime<Utc>) -> Option<Self> {
        if quiz.delay1().is_none() && quiz.delay2().is_none() {
            return None;
        }
        Some(Self { quiz, now })
    }

    /// Earliest time the next attempt may start, or `None` if there is no
    /// delay to wait out.
    ///
    /// The finish time of a timed attempt is capped at its time limit, so
    /// leaving an attempt open does not push the next start further out.
    pub fn compute_next_start_time(
        &self,
        prior_count: u32,
        last_attempt: Option<&QuizAttempt>,
    ) -> Option<DateTime<Utc>> {
        if prior_count == 0 {
            return None;
        }

        let last_attempt = last_attempt?;
        let mut last_finish = last_attempt.time_finish?;
        if let Some(limit) = self.quiz.time_limit() {
            last_finish = last_finish.min(saturating_add(last_attempt.time_start, limit));
        }

        match (prior_count, self.quiz.delay1(), self.quiz.delay2()) {
            (1, Some(delay1), _) => Some(saturating_add(last_finish, delay1)),
            (n, _, Some(delay2)) if n > 1 => Some(saturating_add(last_finish, delay2)),
            _ => None,
        }
    }
}

impl AccessRule for DelayBetweenAttemptsRule<'_> {
    fn name(&self) -> &'static str {
        "delaybetweenattempts"
    }

    fn prevent_new_attempt(
        &self,
        prior_count: u32,
        last_attempt: Option<&QuizAttempt>,
    ) -> Option<AccessMessage> {
        // Out of attempts or closed: other rules report that.
        if self.quiz.attempt_limit > 0 && prior_count >= self.quiz.attempt_limit {
            return None;
        }
        if self.quiz.is_closed_at(self.now) {
            return None;
        }

        let next_start = self.compute_next_start_time(prior_count, last_attempt)?;
        if self.now >= next_start {
            return None;
        }

        match self.quiz.time_close {
            Some(time_close) if next_start > time_close => Some(AccessMessage::CannotWait),
            _ => Some(AccessMessage::MustWait { next_start }),
        }
    }

    fn is_finished(&self, prior_count: u32, last_attempt: Option<&QuizAttempt>) -> bool {
        let Some(next_start) = self.compute_next_start_time(prior_count, last_attempt) else {
            return false;
        };
        self.now <= next_start
            && self
                .quiz
                .time_close
                .is_some_and(|time_close| next_start >= time_close)
    }
}
