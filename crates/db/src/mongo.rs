use std::sync::Arc;

use async_trait::async_trait;
use libris_kernel::settings::StoreSettings;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::collection::DocumentCollection;
use crate::error::StoreResult;

const APP_NAME: &str = "libris";

/// Connection to the document store, opened once per process.
pub struct DocumentStore {
    client: Client,
    database: Database,
}

impl DocumentStore {
    /// Connect to the configured server and verify it answers a ping.
    pub async fn connect(settings: &StoreSettings) -> StoreResult<Self> {
        let uri = settings.uri();
        let mut options = ClientOptions::parse(&uri).await?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&settings.database);
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(
            target: "libris-db",
            uri = %uri,
            database = %settings.database,
            "document store connected"
        );

        Ok(Self { client, database })
    }

    /// Handle to a collection of raw documents.
    pub fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection::new(self.database.collection(name)))
    }

    /// Drop the whole database. Meant for scratch databases.
    pub async fn drop_database(&self) -> StoreResult<()> {
        self.database.drop().await?;
        tracing::info!(target: "libris-db", database = %self.database.name(), "database dropped");
        Ok(())
    }

    /// Release the driver's pooled connections.
    pub async fn close(self) {
        let database = self.database.name().to_string();
        self.client.shutdown().await;
        tracing::info!(target: "libris-db", %database, "document store closed");
    }
}

/// [`DocumentCollection`] backed by a MongoDB collection.
pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    pub fn new(inner: Collection<Document>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.inner.find_one(filter).await?)
    }

    async fn find_all(&self) -> StoreResult<Vec<Document>> {
        let mut cursor = self.inner.find(doc! {}).await?;
        let mut documents = Vec::new();
        while cursor.advance().await? {
            documents.push(cursor.deserialize_current()?);
        }
        Ok(documents)
    }

    async fn insert_one(&self, document: Document) -> StoreResult<()> {
        self.inner.insert_one(document).await?;
        Ok(())
    }

    async fn replace_one(&self, filter: Document, document: Document) -> StoreResult<bool> {
        let result = self.inner.replace_one(filter, document).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let result = self.inner.delete_one(filter).await?;
        Ok(result.deleted_count)
    }
}
