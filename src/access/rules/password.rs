use crate::access::{
    messages::AccessMessage,
    rule::{AccessRule, FieldError, PreflightData},
    session::AccessSession,
};
use crate::models::domain::Quiz;

pub const PASSWORD_FIELD: &str = "password";

/// Requires the quiz password once per session before an attempt starts.
///
/// This is the only stateful rule: passing the check sets a flag in the
/// [`AccessSession`], and finishing an attempt clears it again.
pub struct PasswordRule<'a> {
    quiz: &'a Quiz,
}

impl<'a> PasswordRule<'a> {
    pub fn make(quiz: &'a Quiz) -> Option<Self> {
        quiz.has_password().then_some(Self { quiz })
    }

    fn accepts(&self, entered: &str) -> bool {
        std::iter::once(&self.quiz.password)
            .chain(self.quiz.extra_passwords.iter())
            .any(|password| password == entered)
    }
}

impl AccessRule for PasswordRule<'_> {
    fn name(&self) -> &'static str {
        "password"
    }

    fn description(&self) -> Vec<AccessMessage> {
        vec![AccessMessage::RequiresPassword]
    }

    fn is_preflight_check_required(
        &self,
        session: &AccessSession,
        _attempt_in_progress: bool,
    ) -> bool {
        !session.is_password_verified(&self.quiz.id)
    }

    fn preflight_message(&self) -> Option<AccessMessage> {
        Some(AccessMessage::RequiresPassword)
    }

    fn validate_preflight_check(&self, data: &PreflightData) -> Option<FieldError> {
        let entered = data.password.as_deref().unwrap_or_default();
        if self.accepts(entered) {
            return None;
        }
        Some(FieldError {
            field: PASSWORD_FIELD,
            message: AccessMessage::PasswordError,
        })
    }

    fn notify_preflight_check_passed(&self, session: &mut AccessSession) {
        session.mark_password_verified(&self.quiz.id);
    }

    fn current_attempt_finished(&self, session: &mut AccessSession) {
        session.clear_password_verified(&self.quiz.id);
    }
}
