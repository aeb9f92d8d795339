use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::Resource;

/// Collection is the response envelope shared by every listing and write.
///
/// On the wire it is an object keyed by the resource's plural name, with an
/// optional `meta` sibling:
///
/// ```json
/// {"posts": [{"id": "1"}], "meta": {"pagination": {"page": 1, "next": null}}}
/// ```
///
/// A missing or `null` plural key decodes as an empty collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    /// Records in server order
    pub items: Vec<T>,
    /// Pagination metadata, when the endpoint pages
    pub meta: Option<Meta>,
}

impl<T> Collection<T> {
    /// Create a collection without metadata
    pub fn new(items: Vec<T>) -> Self {
        Collection { items, meta: None }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// First record, if any
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Take the first record, dropping the rest
    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.meta.as_ref().and_then(|m| m.pagination.as_ref())
    }

    /// Page number to request next, if the server reported one
    pub fn next_page(&self) -> Option<u32> {
        self.pagination().and_then(|p| p.next)
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page().is_some()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Resource> Serialize for Collection<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.meta.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(T::PLURAL, &self.items)?;
        if let Some(ref meta) = self.meta {
            map.serialize_entry("meta", meta)?;
        }
        map.end()
    }
}

impl<'de, T: Resource> Deserialize<'de> for Collection<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;

        let items = match map.remove(T::PLURAL) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(de::Error::custom)?,
        };
        let meta = match map.remove("meta") {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value).map_err(de::Error::custom)?),
        };

        Ok(Collection { items, meta })
    }
}

/// Borrowed single-record request body: `{"<plural>": [record]}`
pub(crate) struct Singleton<'a, T>(pub &'a T);

impl<T: Resource> Serialize for Singleton<'_, T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(T::PLURAL, std::slice::from_ref(self.0))?;
        map.end()
    }
}

/// Meta accompanies list responses.
///
/// Only `pagination` is read; other members such as `filters` are ignored,
/// and endpoints that do not page leave it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Pagination state for a list response.
///
/// `next` and `prev` are always written, as `null` when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    #[serde(default)]
    pub page: u32,
    /// Number of items per page
    #[serde(default)]
    pub limit: u32,
    #[serde(rename = "pages", default)]
    pub total_pages: u32,
    #[serde(rename = "total", default)]
    pub total_items: u64,
    #[serde(default)]
    pub next: Option<u32>,
    #[serde(default)]
    pub prev: Option<u32>,
}

/// A single entry of an error envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ErrorDetail {
    /// Message with the context appended after `": "` when present
    pub fn describe(&self) -> String {
        match self.context.as_deref() {
            Some(context) if !context.is_empty() => format!("{}: {}", self.message, context),
            _ => self.message.clone(),
        }
    }
}

/// Error envelope returned with every status >= 400
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

impl ErrorResponse {
    /// Derive the error message for a failed response body.
    ///
    /// Uses the first structured error when the body is an error envelope
    /// with at least one entry, otherwise the raw body text.
    pub fn message_from_body(body: &[u8]) -> String {
        match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(envelope) if !envelope.errors.is_empty() => envelope.errors[0].describe(),
            _ => String::from_utf8_lossy(body).to_string(),
        }
    }
}
