//! The document-backed resources exposed over HTTP.
//!
//! Each resource is bound to one collection and to the set of operations its
//! routes expose. The router walks [`Resource::ALL`] instead of repeating a
//! route block per collection.

use std::fmt;
use std::str::FromStr;

/// Where a resource's documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionBinding {
    pub database: &'static str,
    pub collection: &'static str,
}

/// Operations a resource may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Fetch,
    Insert,
    Upsert,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Products,
    Brands,
    Cart,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Products, Resource::Brands, Resource::Cart];

    /// Stable name used in configuration and logs.
    pub fn name(self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Brands => "brands",
            Resource::Cart => "cart",
        }
    }

    pub fn binding(self) -> CollectionBinding {
        match self {
            Resource::Products => CollectionBinding {
                database: "moviesDB",
                collection: "movies",
            },
            Resource::Brands => CollectionBinding {
                database: "brands",
                collection: "allBrands",
            },
            Resource::Cart => CollectionBinding {
                database: "myCartDB",
                collection: "userCart",
            },
        }
    }

    /// Mount point of the list/fetch/insert/upsert routes.
    pub fn base_path(self) -> &'static str {
        match self {
            Resource::Products => "/products",
            Resource::Brands => "/brands",
            Resource::Cart => "/myCart",
        }
    }

    /// Mount point of the delete route. Published clients delete cart items
    /// through `/my_cart/{id}`, so that path is kept.
    pub fn delete_path(self) -> &'static str {
        match self {
            Resource::Cart => "/my_cart",
            other => other.base_path(),
        }
    }

    pub fn operations(self) -> &'static [Operation] {
        match self {
            Resource::Products => &[
                Operation::List,
                Operation::Fetch,
                Operation::Insert,
                Operation::Upsert,
                Operation::Delete,
            ],
            Resource::Brands => &[Operation::List],
            Resource::Cart => &[
                Operation::List,
                Operation::Fetch,
                Operation::Insert,
                Operation::Delete,
            ],
        }
    }

    pub fn supports(self, op: Operation) -> bool {
        self.operations().contains(&op)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResource(pub String);

impl fmt::Display for UnknownResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown resource '{}'", self.0)
    }
}

impl std::error::Error for UnknownResource {}

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "products" | "movies" => Ok(Resource::Products),
            "brands" => Ok(Resource::Brands),
            "cart" | "mycart" | "my_cart" => Ok(Resource::Cart),
            other => Err(UnknownResource(other.to_string())),
        }
    }
}
