use std::collections::BTreeSet;

use crate::error::AppError;
use crate::resources::Resource;

/// Which resources sit behind the token guard.
///
/// Parsed from `GUARDED_RESOURCES`: a comma-separated list of resource names,
/// or `none` to leave every resource public. Unset means cart only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    guarded: BTreeSet<Resource>,
}

impl AccessPolicy {
    pub fn public() -> Self {
        Self {
            guarded: BTreeSet::new(),
        }
    }

    pub fn guard_all() -> Self {
        Self {
            guarded: Resource::ALL.into_iter().collect(),
        }
    }

    pub fn guarding(resources: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            guarded: resources.into_iter().collect(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("none") {
            return Ok(Self::public());
        }
        if raw.eq_ignore_ascii_case("all") {
            return Ok(Self::guard_all());
        }

        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Resource>()
                    .map_err(|e| AppError::config(format!("GUARDED_RESOURCES: {e}")))
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|guarded| Self { guarded })
    }

    pub fn is_guarded(&self, resource: Resource) -> bool {
        self.guarded.contains(&resource)
    }

    pub fn guarded(&self) -> impl Iterator<Item = Resource> + '_ {
        self.guarded.iter().copied()
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::guarding([Resource::Cart])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_guards_cart_only() {
        let policy = AccessPolicy::default();
        assert!(policy.is_guarded(Resource::Cart));
        assert!(!policy.is_guarded(Resource::Products));
        assert!(!policy.is_guarded(Resource::Brands));
    }

    #[test]
    fn parses_lists_and_keywords() {
        assert_eq!(
            AccessPolicy::parse("products, myCart").unwrap(),
            AccessPolicy::guarding([Resource::Products, Resource::Cart])
        );
        assert_eq!(AccessPolicy::parse("none").unwrap(), AccessPolicy::public());
        assert_eq!(AccessPolicy::parse("ALL").unwrap(), AccessPolicy::guard_all());
        assert_eq!(AccessPolicy::parse("").unwrap(), AccessPolicy::public());
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let err = AccessPolicy::parse("products,orders").unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.to_string().contains("orders"));
    }
}
