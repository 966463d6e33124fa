use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{require_quiz_manager, Claims},
    errors::{AppError, AppResult},
    models::{domain::Quiz, dto::request::UpsertQuizRequest},
    repositories::QuizRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    /// Students see the settings without the quiz passwords.
    pub async fn get_quiz(&self, id: &str, claims: &Claims) -> AppResult<Quiz> {
        let mut quiz = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        if require_quiz_manager(claims).is_err() {
            quiz.password.clear();
            quiz.extra_passwords.clear();
        }

        Ok(quiz)
    }

    /// Creates the quiz or replaces its access settings.
    pub async fn upsert_quiz(
        &self,
        id: &str,
        request: UpsertQuizRequest,
        claims: &Claims,
    ) -> AppResult<Quiz> {
        require_quiz_manager(claims)?;
        request.validate()?;

        let existing = self.repository.find_by_id(id).await?;
        let created = existing.is_none();
        let quiz = self.repository.upsert(request.into_quiz(id, existing)).await?;

        log::info!(
            "{} {} quiz {}",
            claims.username,
            if created { "created" } else { "updated" },
            quiz.id
        );
        Ok(quiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::UserRole, repositories::quiz_repository::MockQuizRepository};

    fn request(json: &str) -> UpsertQuizRequest {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_get_quiz_not_found() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let service = QuizService::new(Arc::new(repo));

        let claims = Claims::new("t-1", "teacher", UserRole::Teacher, 1);
        let result = service.get_quiz("missing", &claims).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_quiz_hides_passwords_from_students() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut quiz = Quiz::new(id, "Secret");
            quiz.password = "frog".to_string();
            quiz.extra_passwords = vec!["toad".to_string()];
            Ok(Some(quiz))
        });
        let service = QuizService::new(Arc::new(repo));

        let student = Claims::new("s-1", "student", UserRole::Student, 1);
        let quiz = service.get_quiz("quiz-1", &student).await.unwrap();
        assert!(quiz.password.is_empty());
        assert!(quiz.extra_passwords.is_empty());

        let teacher = Claims::new("t-1", "teacher", UserRole::Teacher, 1);
        let quiz = service.get_quiz("quiz-1", &teacher).await.unwrap();
        assert_eq!(quiz.password, "frog");
    }

    #[tokio::test]
    async fn test_upsert_quiz_creates() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_upsert().times(1).returning(Ok);
        let service = QuizService::new(Arc::new(repo));

        let claims = Claims::new("t-1", "teacher", UserRole::Teacher, 1);
        let quiz = service
            .upsert_quiz("quiz-9", request(r#"{"name":"Week 9","attempt_limit":3}"#), &claims)
            .await
            .unwrap();

        assert_eq!(quiz.id, "quiz-9");
        assert_eq!(quiz.attempt_limit, 3);
    }

    #[tokio::test]
    async fn test_upsert_quiz_rejects_students() {
        let repo = MockQuizRepository::new();
        let service = QuizService::new(Arc::new(repo));

        let claims = Claims::new("s-1", "student", UserRole::Student, 1);
        let result = service
            .upsert_quiz("quiz-9", request(r#"{"name":"Week 9"}"#), &claims)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_upsert_quiz_validates() {
        let repo = MockQuizRepository::new();
        let service = QuizService::new(Arc::new(repo));

        let claims = Claims::new("a-1", "admin", UserRole::Admin, 1);
        let result = service
            .upsert_quiz("quiz-9", request(r#"{"name":""}"#), &claims)
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
