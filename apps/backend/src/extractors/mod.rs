pub mod document_id;
pub mod json_object;
pub mod token_payload;

pub use document_id::DocumentId;
pub use json_object::JsonObject;
