use crate::models::Post;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

/// Process-wide handle to the MongoDB deployment.
///
/// Cloning is cheap; the driver client pools connections internally and is
/// shared by every request.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for post-service");

        let posts = self.posts();

        let author_index = IndexModel::builder()
            .keys(doc! { "author": 1 })
            .options(
                IndexOptions::builder()
                    .name("author_lookup".to_string())
                    .build(),
            )
            .build();

        posts.create_index(author_index, None).await.map_err(|e| {
            tracing::error!("Failed to create author index on posts collection: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created index on posts.author");

        let date_index = IndexModel::builder()
            .keys(doc! { "date": -1 })
            .options(
                IndexOptions::builder()
                    .name("date_desc".to_string())
                    .build(),
            )
            .build();

        posts.create_index(date_index, None).await.map_err(|e| {
            tracing::error!("Failed to create date index on posts collection: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created index on posts.date");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn posts(&self) -> Collection<Post> {
        self.db.collection("posts")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}
