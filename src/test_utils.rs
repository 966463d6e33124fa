#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::models::domain::{Quiz, QuizAttempt};

    /// Epoch seconds as a UTC timestamp
    pub fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("timestamp should be in range")
    }

    /// A quiz with every restriction switched off
    pub fn test_quiz() -> Quiz {
        Quiz::new("quiz-1", "Test quiz")
    }

    /// A non-preview attempt by `user-1`, finished if `finish` is given
    pub fn test_attempt(number: u32, start: i64, finish: Option<i64>) -> QuizAttempt {
        let mut attempt = QuizAttempt::start("user-1", "quiz-1", number, at(start), false);
        if let Some(finish) = finish {
            attempt.finish(at(finish));
        }
        attempt
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::AttemptState;

    #[test]
    fn test_fixtures_at() {
        assert_eq!(at(20000).timestamp(), 20000);
    }

    #[test]
    fn test_fixtures_test_quiz() {
        let quiz = test_quiz();
        assert_eq!(quiz.id, "quiz-1");
        assert_eq!(quiz.attempt_limit, 0);
    }

    #[test]
    fn test_fixtures_test_attempt() {
        let open = test_attempt(1, 100, None);
        assert_eq!(open.state, AttemptState::InProgress);

        let done = test_attempt(2, 100, Some(200));
        assert_eq!(done.state, AttemptState::Finished);
        assert_eq!(done.time_finish, Some(at(200)));
    }
}
