use chrono::{DateTime, Duration, Utc};

use crate::access::{
    messages::AccessMessage,
    rule::{in_countdown_window, saturating_add, AccessRule},
};
use crate::models::domain::{OverdueHandling, Quiz, QuizAttempt};

/// Enforces the quiz open and close dates. Always applies; without dates it
/// restricts nothing.
pub struct OpenCloseDateRule<'a> {
    quiz: &'a Quiz,
    now: DateTime<Utc>,
}

impl<'a> OpenCloseDateRule<'a> {
    pub fn make(quiz: &'a Quiz, now: DateTime<Utc>) -> Option<Self> {
        Some(Self { quiz, now })
    }

    fn is_before_open(&self) -> bool {
        self.quiz.time_open.is_some_and(|open| self.now < open)
    }
}

impl AccessRule for OpenCloseDateRule<'_> {
    fn name(&self) -> &'static str {
        "openclosedate"
    }

    fn description(&self) -> Vec<AccessMessage> {
        let mut result = Vec::new();

        if let Some(time_open) = self.quiz.time_open.filter(|_| self.is_before_open()) {
            result.push(AccessMessage::NotAvailableUntil { time_open });
            if let Some(time_close) = self.quiz.time_close {
                result.push(AccessMessage::ClosesOn { time_close });
            }
        } else if let Some(time_close) = self.quiz.time_close.filter(|_| self.quiz.is_closed_at(self.now)) {
            result.push(AccessMessage::ClosedOn { time_close });
        } else {
            if let Some(time_open) = self.quiz.time_open {
                result.push(AccessMessage::OpenedOn { time_open });
            }
            if let Some(time_close) = self.quiz.time_close {
                result.push(AccessMessage::ClosesOn { time_close });
            }
        }

        result
    }

    fn prevent_access(&self) -> Option<AccessMessage> {
        let blocked = Some(AccessMessage::NotAvailable);

        if self.is_before_open() {
            return blocked;
        }

        let time_close = self.quiz.time_close?;
        if self.now <= time_close {
            return None;
        }

        if self.quiz.overdue_handling != OverdueHandling::GracePeriod {
            return blocked;
        }

        if self.now <= saturating_add(time_close, self.quiz.grace_period()) {
            return None;
        }

        blocked
    }

    fn is_finished(&self, _prior_count: u32, _last_attempt: Option<&QuizAttempt>) -> bool {
        self.quiz.is_closed_at(self.now)
    }

    fn end_time(&self, _attempt: &QuizAttempt) -> Option<DateTime<Utc>> {
        self.quiz.time_close
    }

    fn time_left_display(&self, attempt: &QuizAttempt, now: DateTime<Utc>) -> Option<Duration> {
        // A teacher preview past the close date gets no countdown.
        if attempt.preview && self.quiz.time_close.is_some_and(|close| now > close) {
            return None;
        }

        let end_time = self.end_time(attempt)?;
        in_countdown_window(end_time, now).then(|| end_time - now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::rule::SHOW_TIME_BEFORE_DEADLINE_SECS;
    use crate::test_utils::fixtures::{at, test_attempt, test_quiz};

    #[test]
    fn no_dates_means_no_restriction() {
        let quiz = test_quiz();
        let attempt = test_attempt(1, 0, None);
        let rule = OpenCloseDateRule::make(&quiz, at(10000)).unwrap();

        assert!(rule.description().is_empty());
        assert_eq!(rule.prevent_access(), None);
        assert!(!rule.is_finished(0, None));
        assert_eq!(rule.end_time(&attempt), None);
        assert_eq!(rule.time_left_display(&attempt, at(0)), None);
    }

    #[test]
    fn open_date_only() {
        let mut quiz = test_quiz();
        quiz.time_open = Some(at(10000));
        let attempt = test_attempt(1, 0, None);

        let rule = OpenCloseDateRule::make(&quiz, at(9999)).unwrap();
        assert_eq!(
            rule.description(),
            vec![AccessMessage::NotAvailableUntil { time_open: at(10000) }]
        );
        assert_eq!(rule.prevent_access(), Some(AccessMessage::NotAvailable));
        assert!(!rule.is_finished(0, None));
        assert_eq!(rule.end_time(&attempt), None);

        let rule = OpenCloseDateRule::make(&quiz, at(10000)).unwrap();
        assert_eq!(
            rule.description(),
            vec![AccessMessage::OpenedOn { time_open: at(10000) }]
        );
        assert_eq!(rule.prevent_access(), None);
        assert!(!rule.is_finished(0, None));
    }

    #[test]
    fn close_date_only() {
        let mut quiz = test_quiz();
        quiz.time_close = Some(at(20000));
        let attempt = test_attempt(1, 0, None);

        let rule = OpenCloseDateRule::make(&quiz, at(20000)).unwrap();
        assert_eq!(
            rule.description(),
            vec![AccessMessage::ClosesOn { time_close: at(20000) }]
        );
        assert_eq!(rule.prevent_access(), None);
        assert!(!rule.is_finished(0, None));
        assert_eq!(rule.end_time(&attempt), Some(at(20000)));

        let rule = OpenCloseDateRule::make(&quiz, at(20001)).unwrap();
        assert_eq!(
            rule.description(),
            vec![AccessMessage::ClosedOn { time_close: at(20000) }]
        );
        assert_eq!(rule.prevent_access(), Some(AccessMessage::NotAvailable));
        assert!(rule.is_finished(0, None));
    }

    #[test]
    fn open_and_close_dates() {
        let mut quiz = test_quiz();
        quiz.time_open = Some(at(10000));
        quiz.time_close = Some(at(20000));

        let rule = OpenCloseDateRule::make(&quiz, at(9999)).unwrap();
        assert_eq!(
            rule.description(),
            vec![
                AccessMessage::NotAvailableUntil { time_open: at(10000) },
                AccessMessage::ClosesOn { time_close: at(20000) },
            ]
        );
        assert_eq!(rule.prevent_access(), Some(AccessMessage::NotAvailable));

        for now in [10000, 15000, 20000] {
            let rule = OpenCloseDateRule::make(&quiz, at(now)).unwrap();
            assert_eq!(
                rule.description(),
                vec![
                    AccessMessage::OpenedOn { time_open: at(10000) },
                    AccessMessage::ClosesOn { time_close: at(20000) },
                ]
            );
            assert_eq!(rule.prevent_access(), None);
            assert!(!rule.is_finished(0, None));
        }

        let rule = OpenCloseDateRule::make(&quiz, at(20001)).unwrap();
        assert_eq!(
            rule.description(),
            vec![AccessMessage::ClosedOn { time_close: at(20000) }]
        );
        assert_eq!(rule.prevent_access(), Some(AccessMessage::NotAvailable));
        assert!(rule.is_finished(0, None));
    }

    #[test]
    fn grace_period_keeps_access_open_after_close() {
        let mut quiz = test_quiz();
        quiz.time_close = Some(at(20000));
        quiz.overdue_handling = OverdueHandling::GracePeriod;
        quiz.grace_period_secs = 1000;

        for now in [20000, 20001, 21000] {
            let rule = OpenCloseDateRule::make(&quiz, at(now)).unwrap();
            assert_eq!(rule.prevent_access(), None, "blocked at {now}");
        }

        let rule = OpenCloseDateRule::make(&quiz, at(21001)).unwrap();
        assert_eq!(rule.prevent_access(), Some(AccessMessage::NotAvailable));
    }

    #[test]
    fn grace_period_ignored_for_other_overdue_handling() {
        let mut quiz = test_quiz();
        quiz.time_close = Some(at(20000));
        quiz.overdue_handling = OverdueHandling::AutoAbandon;
        quiz.grace_period_secs = 1000;

        let rule = OpenCloseDateRule::make(&quiz, at(20001)).unwrap();
        assert_eq!(rule.prevent_access(), Some(AccessMessage::NotAvailable));
    }

    #[test]
    fn time_left_display_around_close() {
        let mut quiz = test_quiz();
        quiz.time_close = Some(at(20000));
        let rule = OpenCloseDateRule::make(&quiz, at(0)).unwrap();
        let attempt = test_attempt(1, 0, None);

        assert_eq!(
            rule.time_left_display(&attempt, at(20000 - SHOW_TIME_BEFORE_DEADLINE_SECS)),
            None
        );
        assert_eq!(
            rule.time_left_display(&attempt, at(19900)),
            Some(Duration::seconds(100))
        );
        assert_eq!(
            rule.time_left_display(&attempt, at(20000)),
            Some(Duration::zero())
        );
        assert_eq!(
            rule.time_left_display(&attempt, at(20100)),
            Some(Duration::seconds(-100))
        );
    }

    #[test]
    fn time_left_display_hidden_for_preview_after_close() {
        let mut quiz = test_quiz();
        quiz.time_close = Some(at(20000));
        let rule = OpenCloseDateRule::make(&quiz, at(0)).unwrap();
        let mut preview = test_attempt(1, 0, None);
        preview.preview = true;

        assert_eq!(
            rule.time_left_display(&preview, at(19900)),
            Some(Duration::seconds(100))
        );
        assert_eq!(rule.time_left_display(&preview, at(20100)), None);
    }

    #[test]
    fn repeated_calls_give_identical_results() {
        let mut quiz = test_quiz();
        quiz.time_open = Some(at(10000));
        quiz.time_close = Some(at(20000));
        let rule = OpenCloseDateRule::make(&quiz, at(15000)).unwrap();

        assert_eq!(rule.description(), rule.description());
        assert_eq!(rule.prevent_access(), rule.prevent_access());
        assert_eq!(rule.is_finished(0, None), rule.is_finished(0, None));
    }
}
