//! In-process adapter for the document repository.
//!
//! Documents are held as BSON, so `_id` keeps its type the way the MongoDB
//! adapter stores it: a generated or path id is an `ObjectId`, a client-sent
//! string stays a string and is not found by an ObjectId lookup. Upserts apply
//! `$set` semantics, including dotted paths into embedded documents.
//!
//! Not mirrored: dotted paths through arrays (`"cast.0"`) are refused with a
//! store error instead of addressing array elements.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson};
use parking_lot::RwLock;

use crate::error::AppError;
use crate::repos::documents::{
    bson_to_json, document_to_json, json_to_document, DeleteOutcome, Document, DocumentRepo,
    InsertOutcome, UpdateOutcome,
};
use crate::resources::Resource;

const ID_FIELD: &str = "_id";

#[derive(Debug, Default)]
pub struct DocumentRepoMemory {
    collections: RwLock<HashMap<Resource, Vec<bson::Document>>>,
}

impl DocumentRepoMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection, assigning ObjectIds to documents that lack an `_id`.
    pub fn with_documents(
        self,
        resource: Resource,
        documents: Vec<Document>,
    ) -> Result<Self, AppError> {
        {
            let mut collections = self.collections.write();
            let entries = collections.entry(resource).or_default();
            for document in documents {
                let mut stored = json_to_document(&document)?;
                if !stored.contains_key(ID_FIELD) {
                    stored.insert(ID_FIELD, ObjectId::new());
                }
                entries.push(stored);
            }
        }
        Ok(self)
    }

    pub fn len(&self, resource: Resource) -> usize {
        self.collections.read().get(&resource).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, resource: Resource) -> bool {
        self.len(resource) == 0
    }
}

fn has_id(document: &bson::Document, id: &Bson) -> bool {
    document.get(ID_FIELD) == Some(id)
}

/// Apply one `$set` entry. Returns whether the document changed.
fn set_path(document: &mut bson::Document, path: &str, value: Bson) -> Result<bool, AppError> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    let Some(rest) = rest else {
        if document.get(head) == Some(&value) {
            return Ok(false);
        }
        document.insert(head, value);
        return Ok(true);
    };

    match document
        .entry(head.to_string())
        .or_insert_with(|| Bson::Document(bson::Document::new()))
    {
        Bson::Document(inner) => set_path(inner, rest, value),
        other => Err(AppError::store(format!(
            "Cannot create field '{rest}' in element {{{head}: {other}}}"
        ))),
    }
}

#[async_trait]
impl DocumentRepo for DocumentRepoMemory {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_all(&self, resource: Resource) -> Result<Vec<Document>, AppError> {
        let docs = self
            .collections
            .read()
            .get(&resource)
            .cloned()
            .unwrap_or_default();
        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn find_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
    ) -> Result<Option<Document>, AppError> {
        let id = Bson::ObjectId(id);
        let found = self
            .collections
            .read()
            .get(&resource)
            .and_then(|docs| docs.iter().find(|d| has_id(d, &id)).cloned());
        Ok(found.map(document_to_json))
    }

    async fn insert_one(
        &self,
        resource: Resource,
        document: Document,
    ) -> Result<InsertOutcome, AppError> {
        let mut stored = json_to_document(&document)?;
        let inserted_id = stored
            .entry(ID_FIELD.to_string())
            .or_insert_with(|| Bson::ObjectId(ObjectId::new()))
            .clone();

        let mut collections = self.collections.write();
        let docs = collections.entry(resource).or_default();
        if docs.iter().any(|d| has_id(d, &inserted_id)) {
            return Err(AppError::conflict(
                "DUPLICATE_ID",
                "A document with this _id already exists",
            ));
        }
        docs.push(stored);

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: bson_to_json(inserted_id),
        })
    }

    async fn upsert_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError> {
        let set = json_to_document(&fields)?;

        let id = Bson::ObjectId(id);
        let mut collections = self.collections.write();
        let docs = collections.entry(resource).or_default();

        if let Some(existing) = docs.iter_mut().find(|d| has_id(d, &id)) {
            // Applied to a copy so a failing path leaves the stored document as it was.
            let mut updated = existing.clone();
            let mut modified = false;
            for (path, value) in set {
                modified |= set_path(&mut updated, &path, value)?;
            }
            *existing = updated;

            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        let mut created = bson::Document::new();
        created.insert(ID_FIELD, id.clone());
        for (path, value) in set {
            set_path(&mut created, &path, value)?;
        }
        docs.push(created);

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(bson_to_json(id)),
        })
    }

    async fn delete_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
    ) -> Result<DeleteOutcome, AppError> {
        let id = Bson::ObjectId(id);
        let mut collections = self.collections.write();
        let deleted_count = match collections.get_mut(&resource) {
            Some(docs) => match docs.iter().position(|d| has_id(d, &id)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count,
        })
    }
}
