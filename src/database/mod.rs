use async_trait::async_trait;
use mongodb::{bson::doc, Client, Collection, Database};
use std::error::Error;

use crate::models::UserDocument;

const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .unwrap_or("notifications");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        Ok(Self { db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// Read side of the user records collection.
///
/// An empty collection is Ok with an empty vector; only transport/auth
/// failures are Err.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<UserDocument>, String>;
}

pub struct MongoUserStore {
    db: MongoDB,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn fetch_all(&self) -> Result<Vec<UserDocument>, String> {
        let collection = self.db.collection::<UserDocument>(USERS_COLLECTION);

        let mut cursor = collection
            .find(doc! {})
            .await
            .map_err(|e| format!("Database error: {}", e))?;

        let mut documents = Vec::new();
        use futures::stream::StreamExt;

        while let Some(result) = cursor.next().await {
            match result {
                Ok(document) => documents.push(document),
                Err(e) => log::error!("Error reading user document: {}", e),
            }
        }

        Ok(documents)
    }
}
