// Form payloads and the transport seam.
//
// `FieldPayload` is one web-form submission. `FormTransport` is the
// page-addressed submit operation the core drives; `HttpClient` is the
// production implementation and tests substitute a fake AP.

use std::fmt;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Error;

/// An ordered `name -> value` mapping sent as one form submission.
///
/// Insertion order is kept for readable logs and request bodies.
/// Equality ignores order: two payloads are equal when they carry the
/// same fields with the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldPayload(IndexMap<String, String>);

impl FieldPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, overwriting any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remove a field, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    /// Merge `other` into `self`; `other` wins on name collisions.
    pub fn merge(&mut self, other: &FieldPayload) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Non-mutating [`merge`](Self::merge).
    pub fn merged(&self, other: &FieldPayload) -> FieldPayload {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Drop every field whose name appears in `other`.
    pub fn remove_keys_of(&mut self, other: &FieldPayload) {
        for name in other.0.keys() {
            self.0.shift_remove(name);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for FieldPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

/// A client able to address one AP web page at a time and submit forms to it.
///
/// The current page is transport state: callers set it, then submit.
/// `apcommand-core` serializes access so the path cannot change between
/// those two calls.
#[async_trait]
pub trait FormTransport: Send + Sync {
    /// Point subsequent submissions at `path` (e.g. `radio.asp`).
    fn set_path(&self, path: &str);

    /// The page subsequent submissions go to.
    fn path(&self) -> String;

    /// Submit to the current page and return the response body.
    ///
    /// `None` fetches the page (GET). `Some` posts the fields as a
    /// url-encoded form.
    async fn submit(&self, data: Option<&FieldPayload>) -> Result<String, Error>;
}
