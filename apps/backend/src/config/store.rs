use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::AppError;

/// Atlas cluster the service was deployed against.
pub const DEFAULT_CLUSTER_HOST: &str = "cluster0.qa4f7ko.mongodb.net";

/// RFC 3986 unreserved characters stay as-is in the userinfo part.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Which document store implementation backs the routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// MongoDB (Atlas or self-hosted)
    Mongo,
    /// Process-local store, contents lost on exit
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(AppError::config(format!(
                "STORE_BACKEND must be 'mongo' or 'memory', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Mongo => f.write_str("mongo"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Connection string; `None` for the memory backend
    pub uri: Option<String>,
}

// The URI embeds credentials.
impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("backend", &self.backend)
            .field("uri", &self.uri.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl StoreSettings {
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            uri: None,
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORE_BACKEND") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => StoreBackend::Mongo,
        };

        match backend {
            StoreBackend::Memory => Ok(Self::memory()),
            StoreBackend::Mongo => Ok(Self {
                backend,
                uri: Some(mongo_uri(lookup)?),
            }),
        }
    }
}

/// `MONGODB_URI` when set, otherwise an Atlas SRV URI built from
/// `DB_USER`, `DB_PASS` and `DB_CLUSTER_HOST`.
pub fn mongo_uri<F>(lookup: &F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup("MONGODB_URI").filter(|u| !u.trim().is_empty()) {
        return Ok(uri);
    }

    let user = must_var(lookup, "DB_USER")?;
    let password = must_var(lookup, "DB_PASS")?;
    let host = lookup("DB_CLUSTER_HOST")
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CLUSTER_HOST.to_string());

    Ok(format!(
        "mongodb+srv://{}:{}@{host}/?retryWrites=true&w=majority",
        utf8_percent_encode(&user, USERINFO),
        utf8_percent_encode(&password, USERINFO),
    ))
}

/// Get required variable or return a configuration error
pub(crate) fn must_var<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}
