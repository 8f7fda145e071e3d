//! MongoDB client and collection wrapper

use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::{options::IndexOptions, Client, Collection, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::types::HubError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the connection with a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, HubError> {
        info!("Connecting to MongoDB at {}", uri);

        // Fail fast instead of hanging when the server is unreachable
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri).await.map_err(|e| {
            HubError::StoreUnavailable(format!("Failed to connect to MongoDB: {}", e))
        })?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| HubError::StoreUnavailable(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection, applying its schema indexes
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, HubError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Open the collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, HubError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    async fn apply_indexes(&self) -> Result<(), HubError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| HubError::StoreUnavailable(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Find every document matching the filter.
    ///
    /// A cursor error fails the whole call; partial results are never returned.
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>, HubError> {
        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| HubError::StoreUnavailable(format!("Find failed: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| HubError::StoreUnavailable(format!("Reading documents failed: {}", e)))
    }

    /// Distinct string values of a field
    pub async fn distinct_strings(&self, field: &str) -> Result<Vec<String>, HubError> {
        let values = self
            .inner
            .distinct(field, doc! {})
            .await
            .map_err(|e| HubError::StoreUnavailable(format!("Distinct failed: {}", e)))?;

        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) => Some(s),
                other => {
                    debug!(field = field, value = ?other, "Skipping non-string distinct value");
                    None
                }
            })
            .collect())
    }

    /// Insert documents, returning how many were written
    pub async fn insert_many(&self, items: Vec<T>) -> Result<usize, HubError> {
        if items.is_empty() {
            return Ok(0);
        }

        let result = self
            .inner
            .insert_many(items)
            .await
            .map_err(|e| HubError::StoreUnavailable(format!("Insert failed: {}", e)))?;

        Ok(result.inserted_ids.len())
    }

    /// Remove every document in the collection
    pub async fn delete_all(&self) -> Result<u64, HubError> {
        let result = self
            .inner
            .delete_many(doc! {})
            .await
            .map_err(|e| HubError::StoreUnavailable(format!("Delete failed: {}", e)))?;

        Ok(result.deleted_count)
    }
}
