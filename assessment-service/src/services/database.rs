//! MongoDB-backed prompt corpus and session storage.

use crate::models::{
    Prompt, ResponseItem, SrtSituation, TemplateVersion, TestSession, TestType, WatWord,
};
use crate::services::repository::{PromptRepository, SessionRepository};
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for assessment-service");

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created_idx".to_string())
                    .build(),
            )
            .build();

        self.sessions()
            .create_index(user_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user_created index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    // Collection accessors

    pub fn wat_words(&self) -> Collection<WatWord> {
        self.db.collection("wat_words")
    }

    pub fn srt_situations(&self) -> Collection<SrtSituation> {
        self.db.collection("srt_situations")
    }

    pub fn sessions(&self) -> Collection<TestSession> {
        self.db.collection("test_sessions")
    }
}

#[async_trait]
impl PromptRepository for MongoDb {
    async fn list_prompts(&self, test_type: TestType) -> Result<Vec<Prompt>, AppError> {
        let prompts: Vec<Prompt> = match test_type {
            TestType::Wat => {
                let cursor = self.wat_words().find(None, None).await?;
                let words: Vec<WatWord> = cursor.try_collect().await?;
                words.into_iter().map(Prompt::from).collect()
            }
            TestType::Srt => {
                let cursor = self.srt_situations().find(None, None).await?;
                let situations: Vec<SrtSituation> = cursor.try_collect().await?;
                situations.into_iter().map(Prompt::from).collect()
            }
        };

        tracing::debug!(test_type = %test_type, count = prompts.len(), "Loaded prompts");
        Ok(prompts)
    }
}

#[async_trait]
impl SessionRepository for MongoDb {
    async fn insert_session(&self, session: &TestSession) -> Result<(), AppError> {
        self.sessions()
            .insert_one(session, None)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session.id, "Failed to insert session: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn find_owned_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<TestSession>, AppError> {
        self.sessions()
            .find_one(doc! { "_id": session_id, "user_id": user_id }, None)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session_id, "Failed to find session: {}", e);
                AppError::from(e)
            })
    }

    async fn attach_analysis(
        &self,
        session_id: &str,
        user_id: &str,
        analysis: &serde_json::Value,
        responses: &[ResponseItem],
        version: TemplateVersion,
    ) -> Result<Option<TestSession>, AppError> {
        let analysis = to_bson(analysis).map_err(|e| {
            tracing::error!("Failed to serialize analysis: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let responses = to_bson(responses).map_err(|e| {
            tracing::error!("Failed to serialize responses: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.sessions()
            .find_one_and_update(
                doc! { "_id": session_id, "user_id": user_id },
                doc! {
                    "$set": {
                        "analysis": analysis,
                        "responses": responses,
                        "analysis_version": version.as_str(),
                        "updated_at": Utc::now().timestamp_millis()
                    }
                },
                options,
            )
            .await
            .map_err(|e| {
                tracing::error!(session_id = %session_id, "Failed to store analysis: {}", e);
                AppError::from(e)
            })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }
}
