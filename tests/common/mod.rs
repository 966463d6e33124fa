#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quiz_access_server::{
    app_state::AppState,
    auth::{JwtService, UserRole},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizAttempt},
    repositories::{InMemorySessionRepository, QuizAttemptRepository, QuizRepository},
};

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }

    async fn upsert(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: Arc<RwLock<HashMap<String, QuizAttempt>>>,
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if attempts.contains_key(&attempt.id) {
            return Err(AppError::AlreadyExists(format!(
                "Attempt with id '{}' already exists",
                attempt.id
            )));
        }
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn update(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        match attempts.get_mut(&attempt.id) {
            Some(existing) => {
                *existing = attempt.clone();
                Ok(attempt)
            }
            None => Err(AppError::NotFound(format!(
                "Attempt with id '{}' not found",
                attempt.id
            ))),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(id).cloned())
    }

    async fn find_by_user_and_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        let mut matching: Vec<_> = attempts
            .values()
            .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id)
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.attempt_number);
        Ok(matching)
    }
}

pub fn test_state() -> AppState {
    AppState::from_parts(
        Arc::new(InMemoryQuizRepository::default()),
        Arc::new(InMemoryQuizAttemptRepository::default()),
        Arc::new(InMemorySessionRepository::new()),
        Config::test_config(),
    )
}

pub fn test_jwt_service() -> JwtService {
    let config = Config::test_config();
    JwtService::new(&config.jwt_secret, config.jwt_expiration_hours)
}

pub fn bearer(user_id: &str, role: UserRole) -> (String, String) {
    let token = test_jwt_service()
        .create_token(user_id, user_id, role)
        .expect("token should be created");
    ("Authorization".to_string(), format!("Bearer {}", token))
}
