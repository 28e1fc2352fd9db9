//! MongoDB adapter for the document repository.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use tracing::debug;

use crate::error::AppError;
use crate::repos::documents::{
    bson_to_json, document_to_json, json_to_document, DeleteOutcome, Document, DocumentRepo,
    InsertOutcome, UpdateOutcome,
};
use crate::resources::Resource;

/// Repository backed by a shared `mongodb::Client`.
///
/// The client pools connections internally; clones share that pool.
#[derive(Debug, Clone)]
pub struct DocumentRepoMongo {
    client: Client,
}

impl DocumentRepoMongo {
    /// Build a client pinned to the stable server API (v1, strict).
    ///
    /// No I/O happens here; the first operation (or [`DocumentRepo::ping`])
    /// opens connections.
    pub async fn connect(uri: &str) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        options.app_name = Some("movieshub".to_string());

        let client = Client::with_options(options)?;
        Ok(Self { client })
    }

    fn collection(&self, resource: Resource) -> Collection<bson::Document> {
        let binding = resource.binding();
        self.client
            .database(binding.database)
            .collection(binding.collection)
    }
}

#[async_trait]
impl DocumentRepo for DocumentRepoMongo {
    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn find_all(&self, resource: Resource) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection(resource).find(doc! {}).await?;
        let docs: Vec<bson::Document> = cursor.try_collect().await?;

        debug!(resource = %resource, count = docs.len(), "listed documents");
        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn find_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
    ) -> Result<Option<Document>, AppError> {
        let found = self
            .collection(resource)
            .find_one(doc! { "_id": id })
            .await?;
        Ok(found.map(document_to_json))
    }

    async fn insert_one(
        &self,
        resource: Resource,
        document: Document,
    ) -> Result<InsertOutcome, AppError> {
        let stored = json_to_document(&document)?;
        let result = self.collection(resource).insert_one(stored).await?;

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        })
    }

    async fn upsert_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let set = json_to_document(&fields)?;
        let result = self
            .collection(resource)
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .upsert(true)
            .await?;

        let upserted_id = result.upserted_id.map(bson_to_json);
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        })
    }

    async fn delete_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
    ) -> Result<DeleteOutcome, AppError> {
        let result = self
            .collection(resource)
            .delete_one(doc! { "_id": id })
            .await?;

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}
