//! Repository traits for the document store.

pub mod documents;
