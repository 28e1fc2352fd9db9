//! Adapters for external dependencies.

pub mod documents_memory;
pub mod documents_mongo;
