//! Request construction: parameter filtering and path templating.
//!
//! Every operation serializes its typed options into a [`Params`] bag, which
//! is then validated (required fields) and sifted (allow-list) before a
//! [`RequestSpec`] is produced. Validation happens here, before any network
//! I/O takes place.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Body/query parameters for a single request. Insertion order is irrelevant.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Create an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Serialize typed operation options into a parameter bag.
    ///
    /// Fields skipped during serialization (unset optionals) are simply
    /// absent from the bag.
    ///
    /// # Errors
    /// Returns error if the options fail to serialize.
    pub fn from_options<T: Serialize>(options: &T) -> Result<Self> {
        match serde_json::to_value(options)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Ok(Self::new()),
        }
    }

    /// Insert a single parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Whether the bag holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a parameter with this key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keep only parameters whose keys appear in `allowed`, silently
    /// dropping the rest.
    pub fn sift(&mut self, allowed: &[&str]) {
        self.0.retain(|key, _| allowed.contains(&key.as_str()));
    }

    /// Check that every field in `required` is present and non-null.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] naming the first missing field.
    pub fn require(&self, required: &[&str]) -> Result<()> {
        for field in required {
            if !matches!(self.0.get(*field), Some(value) if !value.is_null()) {
                return Err(Error::Validation {
                    field: (*field).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Remove and return the named parameter, falling back to a bare
    /// positional value when the key is absent. The named key takes
    /// precedence.
    pub fn take_or(&mut self, key: &str, positional: Option<&str>) -> Option<String> {
        match self.0.remove(key) {
            Some(Value::String(named)) => Some(named),
            Some(Value::Null) | None => positional.map(ToOwned::to_owned),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// A structured request: verb, interpolated path, and parameters.
///
/// Created per call and discarded after dispatch.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,

    /// Path relative to the API base URL, with path parameters filled in.
    pub path: String,

    /// Body (non-GET) or query (GET) parameters.
    pub params: Params,
}

impl RequestSpec {
    /// Build a request from a `{name}`-style path template.
    ///
    /// Interpolates `path_params` into `template`, checks `required` fields
    /// against `params`, and sifts `params` down to `allowed` keys (an empty
    /// allow-list keeps the bag as-is).
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a path parameter is absent or blank,
    /// or if a required field is missing - before any network I/O.
    pub fn build(
        method: Method,
        template: &str,
        path_params: &[(&str, &str)],
        required: &[&str],
        allowed: &[&str],
        mut params: Params,
    ) -> Result<Self> {
        let mut path = template.to_string();
        for (name, value) in path_params {
            if value.trim().is_empty() {
                return Err(Error::Validation {
                    field: (*name).to_string(),
                });
            }
            path = path.replace(&format!("{{{name}}}"), value);
        }

        // Any placeholder left over names a path parameter the caller
        // never supplied.
        if let Some((_, rest)) = path.split_once('{') {
            let field = rest.split_once('}').map_or(rest, |(name, _)| name);
            return Err(Error::Validation {
                field: field.to_string(),
            });
        }

        params.require(required)?;
        if !allowed.is_empty() {
            params.sift(allowed);
        }

        Ok(Self {
            method,
            path,
            params,
        })
    }
}
