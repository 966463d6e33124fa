use crate::{
    auth::{Claims, UserRole},
    errors::{AppError, AppResult},
    models::domain::QuizAttempt,
};

pub fn require_quiz_manager(claims: &Claims) -> AppResult<()> {
    if !matches!(claims.role, UserRole::Teacher | UserRole::Admin) {
        return Err(AppError::Forbidden(
            "Only teachers and admins can change quiz settings".to_string(),
        ));
    }
    Ok(())
}

pub fn require_attempt_owner(claims: &Claims, attempt: &QuizAttempt) -> AppResult<()> {
    if claims.role != UserRole::Admin && claims.sub != attempt.user_id {
        return Err(AppError::Forbidden(
            "You can only act on your own attempts".to_string(),
        ));
    }
    Ok(())
}
