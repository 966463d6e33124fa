use std::sync::Arc;

use crate::{
    access::EnglishMessages,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        InMemorySessionRepository, MongoQuizAttemptRepository, MongoQuizRepository,
        QuizAttemptRepository, QuizRepository, SessionRepository,
    },
    services::{access_service::AccessService, quiz_service::QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub access_service: Arc<AccessService>,
    pub quiz_service: Arc<QuizService>,
    pub config: Arc<Config>,
    /// Absent when the state is assembled from non-Mongo repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let mut state = Self::from_parts(
            quiz_repository,
            attempt_repository,
            Arc::new(InMemorySessionRepository::new()),
            config,
        );
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_parts(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        sessions: Arc<dyn SessionRepository>,
        config: Config,
    ) -> Self {
        let messages = Arc::new(EnglishMessages::new(&config.date_format));
        let access_service = Arc::new(AccessService::new(
            quizzes.clone(),
            attempts,
            sessions,
            messages,
        ));
        let quiz_service = Arc::new(QuizService::new(quizzes));

        Self {
            access_service,
            quiz_service,
            config: Arc::new(config),
            db: None,
        }
    }
}
