use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::{Quiz, QuizAttempt},
};

/// Handle on the MongoDB database holding quiz settings and attempt history.
#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
    quizzes_collection: String,
    attempts_collection: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = Self {
            client,
            db_name: config.mongo_db_name.clone(),
            quizzes_collection: config.quizzes_collection.clone(),
            attempts_collection: config.attempts_collection.clone(),
        };

        db.health_check().await?;
        log::info!("Connected to MongoDB database {}", db.db_name);

        Ok(db)
    }

    pub fn quizzes(&self) -> Collection<Quiz> {
        self.collection(&self.quizzes_collection)
    }

    pub fn attempts(&self) -> Collection<QuizAttempt> {
        self.collection(&self.attempts_collection)
    }

    fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client.database(&self.db_name).collection(name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database>();
    }
}
