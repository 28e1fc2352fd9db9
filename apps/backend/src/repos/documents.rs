//! Document repository: the one seam between route handlers and the store.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::resources::Resource;

/// A schemaless document as seen by clients.
pub type Document = Map<String, Value>;

/// Result of inserting one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

/// Result of an upsert by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Value>,
}

/// Result of a delete by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Single-operation access to the collection behind each [`Resource`].
///
/// Not-found is never an error: `find_by_id` yields `None` and
/// `delete_by_id` reports `deleted_count == 0`.
#[async_trait]
pub trait DocumentRepo: Send + Sync + std::fmt::Debug {
    /// Round-trip to the store.
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_all(&self, resource: Resource) -> Result<Vec<Document>, AppError>;

    async fn find_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
    ) -> Result<Option<Document>, AppError>;

    /// Persist `document` verbatim, assigning an `_id` if it has none.
    async fn insert_one(
        &self,
        resource: Resource,
        document: Document,
    ) -> Result<InsertOutcome, AppError>;

    /// Set each top-level field of `fields` on the document `id`, creating it
    /// when absent. Fields not named in `fields` are left untouched.
    async fn upsert_by_id(
        &self,
        resource: Resource,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, AppError>;

    async fn delete_by_id(&self, resource: Resource, id: ObjectId)
        -> Result<DeleteOutcome, AppError>;
}

/// Render a stored value the way clients expect it: object ids as hex
/// strings, dates as RFC 3339, everything else as relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Document(doc) => Value::Object(document_to_json(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: bson::Document) -> Document {
    doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect()
}

pub fn json_to_document(doc: &Document) -> Result<bson::Document, AppError> {
    Ok(bson::to_document(doc)?)
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, DateTime};
    use serde_json::json;

    use super::*;

    #[test]
    fn object_ids_render_as_hex() {
        let oid = ObjectId::parse_str("65f1c0ffee00000000000001").unwrap();
        let rendered = document_to_json(doc! {
            "_id": oid,
            "tags": [oid],
            "nested": { "ref": oid },
        });

        assert_eq!(
            Value::Object(rendered),
            json!({
                "_id": "65f1c0ffee00000000000001",
                "tags": ["65f1c0ffee00000000000001"],
                "nested": { "ref": "65f1c0ffee00000000000001" },
            })
        );
    }

    #[test]
    fn dates_render_as_rfc3339() {
        let rendered = bson_to_json(Bson::DateTime(DateTime::from_millis(0)));
        assert_eq!(rendered, json!("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn json_bodies_convert_to_documents() {
        let body = json!({"title": "Heat", "year": 1995, "rating": 8.3, "cast": ["Pacino"]});
        let Value::Object(map) = body else {
            unreachable!()
        };

        let stored = json_to_document(&map).unwrap();
        assert_eq!(stored.get_str("title").unwrap(), "Heat");
        assert_eq!(stored.get_i64("year").unwrap(), 1995);
        assert_eq!(Value::Object(document_to_json(stored)), Value::Object(map));
    }

    #[test]
    fn outcomes_serialize_like_driver_results() {
        let update = UpdateOutcome {
            acknowledged: true,
            matched_count: 1,
            modified_count: 1,
            upserted_count: 0,
            upserted_id: None,
        };
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 1,
                "upsertedCount": 0,
                "upsertedId": null,
            })
        );
    }
}
