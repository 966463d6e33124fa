use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    access::{AccessManager, AccessSession, MessageProvider, OverdueOutcome, PreflightData},
    auth::Requester,
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizAttempt},
        dto::response::{AccessSummary, CurrentAttemptDto},
    },
    repositories::{QuizAttemptRepository, QuizRepository, SessionRepository},
};

/// Decides whether a requester may enter, start or finish a quiz attempt.
pub struct AccessService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    sessions: Arc<dyn SessionRepository>,
    messages: Arc<dyn MessageProvider>,
}

/// A requester's attempt history at one quiz.
struct AttemptHistory {
    /// Closed attempts that count toward limits and delays, oldest first
    prior: Vec<QuizAttempt>,
    open: Option<QuizAttempt>,
}

impl AttemptHistory {
    fn prior_count(&self) -> u32 {
        self.prior.len() as u32
    }

    fn last(&self) -> Option<&QuizAttempt> {
        self.prior.last()
    }

    fn next_number(&self) -> u32 {
        self.prior.iter().chain(self.open.iter())
            .map(|attempt| attempt.attempt_number)
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl AccessService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        sessions: Arc<dyn SessionRepository>,
        messages: Arc<dyn MessageProvider>,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            sessions,
            messages,
        }
    }

    async fn load_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// Previews only count toward a previewer's own previews, and never
    /// toward a student's history.
    async fn load_history(&self, quiz_id: &str, requester: &Requester) -> AppResult<AttemptHistory> {
        let preview = requester.claims.is_preview_user();
        let mut attempts = self
            .attempts
            .find_by_user_and_quiz(requester.user_id(), quiz_id)
            .await?;
        attempts.retain(|attempt| attempt.preview == preview);
        attempts.sort_by_key(|attempt| attempt.attempt_number);

        let (open, prior): (Vec<_>, Vec<_>) =
            attempts.into_iter().partition(|attempt| attempt.is_open());

        Ok(AttemptHistory {
            prior,
            open: open.into_iter().last(),
        })
    }

    fn manager<'a>(
        quiz: &'a Quiz,
        requester: &'a Requester,
        now: DateTime<Utc>,
    ) -> AccessManager<'a> {
        AccessManager::new(
            quiz,
            now,
            requester.claims.can_ignore_time_limits(),
            &requester.remote_addr,
        )
    }

    pub async fn evaluate(
        &self,
        quiz_id: &str,
        requester: &Requester,
        now: DateTime<Utc>,
    ) -> AppResult<AccessSummary> {
        let quiz = self.load_quiz(quiz_id).await?;
        let history = self.load_history(quiz_id, requester).await?;
        let session = self.sessions.load(requester.session_id()).await?;
        let manager = Self::manager(&quiz, requester, now);

        let prevent_access = manager.prevent_access();
        let prevent_new_attempt = if history.open.is_some() {
            Vec::new()
        } else {
            manager.prevent_new_attempt(history.prior_count(), history.last())
        };
        let blocked = !prevent_access.is_empty() || !prevent_new_attempt.is_empty();
        let in_progress = history.open.is_some();

        let current_attempt = history.open.clone().map(|attempt| CurrentAttemptDto {
            end_time: manager.end_time(&attempt),
            time_left_secs: manager
                .time_left_display(&attempt, now)
                .map(|left| left.num_seconds()),
            overdue: manager.overdue_outcome(&attempt, now),
            attempt,
        });

        Ok(AccessSummary {
            quiz_id: quiz.id.clone(),
            rules: self.messages.resolve_all(&manager.describe_rules()),
            prevent_access: self.messages.resolve_all(&prevent_access),
            prevent_new_attempt: self.messages.resolve_all(&prevent_new_attempt),
            is_finished: manager.is_finished(history.prior_count(), history.last()),
            attempts_used: history.prior_count(),
            can_start_attempt: !in_progress && (!blocked || requester.claims.is_preview_user()),
            preflight_required: manager.is_preflight_check_required(&session, in_progress),
            preflight_messages: self
                .messages
                .resolve_all(&manager.preflight_messages(&session, in_progress)),
            current_attempt,
        })
    }

    /// Checks the preflight form and records success in the session.
    pub async fn submit_preflight(
        &self,
        quiz_id: &str,
        requester: &Requester,
        data: &PreflightData,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let quiz = self.load_quiz(quiz_id).await?;
        let history = self.load_history(quiz_id, requester).await?;
        let manager = Self::manager(&quiz, requester, now);
        let mut session = self.sessions.load(requester.session_id()).await?;

        self.check_preflight(&manager, &mut session, data, history.open.is_some())?;

        self.save_session(requester, session).await
    }

    async fn save_session(&self, requester: &Requester, session: AccessSession) -> AppResult<()> {
        self.sessions
            .save(requester.session_id(), session, requester.claims.expires_at())
            .await
    }

    /// Only rules still asking for a preflight check validate `data`.
    fn check_preflight(
        &self,
        manager: &AccessManager<'_>,
        session: &mut AccessSession,
        data: &PreflightData,
        attempt_in_progress: bool,
    ) -> AppResult<()> {
        let errors = manager.validate_preflight_check(data, session, attempt_in_progress);
        if !errors.is_empty() {
            let details = errors
                .iter()
                .map(|error| format!("{}: {}", error.field, self.messages.resolve(&error.message)))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::ValidationError(details));
        }

        manager.notify_preflight_check_passed(session);
        Ok(())
    }

    pub async fn start_attempt(
        &self,
        quiz_id: &str,
        requester: &Requester,
        preflight: Option<&PreflightData>,
        now: DateTime<Utc>,
    ) -> AppResult<QuizAttempt> {
        let quiz = self.load_quiz(quiz_id).await?;
        let history = self.load_history(quiz_id, requester).await?;
        let manager = Self::manager(&quiz, requester, now);

        if let Some(open) = &history.open {
            return Err(AppError::AlreadyExists(format!(
                "Attempt {} at quiz '{}' is still in progress",
                open.attempt_number, quiz_id
            )));
        }

        let mut reasons = manager.prevent_access();
        reasons.extend(manager.prevent_new_attempt(history.prior_count(), history.last()));
        if !reasons.is_empty() {
            if requester.claims.is_preview_user() {
                log::debug!(
                    "Preview of quiz {} by {} ignores {} restriction(s)",
                    quiz_id,
                    requester.user_id(),
                    reasons.len()
                );
            } else {
                return Err(AppError::AccessDenied(self.messages.resolve_all(&reasons)));
            }
        }

        let mut session = self.sessions.load(requester.session_id()).await?;
        if manager.is_preflight_check_required(&session, false) {
            let Some(data) = preflight else {
                return Err(AppError::PreflightRequired(quiz_id.to_string()));
            };
            self.check_preflight(&manager, &mut session, data, false)?;
            self.save_session(requester, session).await?;
        }

        let attempt = QuizAttempt::start(
            requester.user_id(),
            quiz_id,
            history.next_number(),
            now,
            requester.claims.is_preview_user(),
        );
        let attempt = self.attempts.create(attempt).await?;

        log::info!(
            "User {} started attempt {} at quiz {}",
            requester.user_id(),
            attempt.attempt_number,
            quiz_id
        );
        Ok(attempt)
    }

    pub async fn finish_attempt(
        &self,
        quiz_id: &str,
        attempt_id: &str,
        requester: &Requester,
        now: DateTime<Utc>,
    ) -> AppResult<QuizAttempt> {
        let quiz = self.load_quiz(quiz_id).await?;
        let mut attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .filter(|attempt| attempt.quiz_id == quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id)))?;

        crate::auth::require_attempt_owner(&requester.claims, &attempt)?;

        if !attempt.is_open() {
            return Err(AppError::ValidationError(format!(
                "Attempt '{}' is already closed",
                attempt_id
            )));
        }

        let manager = Self::manager(&quiz, requester, now);
        match manager.overdue_outcome(&attempt, now) {
            OverdueOutcome::InProgress | OverdueOutcome::Overdue { .. } => attempt.finish(now),
            OverdueOutcome::Submit { at } => attempt.finish(at),
            OverdueOutcome::Abandon => attempt.abandon(now),
        }
        let attempt = self.attempts.update(attempt).await?;

        let mut session = self.sessions.load(requester.session_id()).await?;
        manager.current_attempt_finished(&mut session);
        self.save_session(requester, session).await?;

        log::info!(
            "User {} closed attempt {} at quiz {} as {:?}",
            requester.user_id(),
            attempt.attempt_number,
            quiz_id,
            attempt.state
        );
        Ok(attempt)
    }
}
