//! Process configuration, read once from the environment at startup.

pub mod access;
pub mod app;
pub mod store;

pub use access::AccessPolicy;
pub use app::AppConfig;
pub use store::{StoreBackend, StoreSettings};
