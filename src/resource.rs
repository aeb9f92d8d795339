//! Typed operations over Admin API resources.
//!
//! Every resource follows the same wire contract: collections keyed by the
//! plural name, single records wrapped in a one-element collection on write,
//! and lookups addressed either by id or under `slug/`. [`Resources`] encodes
//! that contract once; the [`Resource`] impls below only supply names and
//! query clauses.

use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GhostError, Result};
use crate::response::{Collection, Singleton};
use crate::rest::{AdminClient, NO_BODY};
use crate::types::{Author, Image, Newsletter, Page, Post, Setting, Tag, Webhook};

/// Status filter value that disables filtering
pub const STATUS_ALL: &str = "all";

/// Resource describes how a record type is addressed on the Admin API
pub trait Resource: Serialize + DeserializeOwned {
    /// Singular name used in error messages, e.g. "post"
    const KIND: &'static str;
    /// Collection key and path segment, e.g. "posts"
    const PLURAL: &'static str;
    /// Query clauses for listings
    const LIST_QUERY: &'static str = "";
    /// Query clauses for single-record reads
    const READ_QUERY: &'static str = "";
    /// Query clauses for creates and updates
    const WRITE_QUERY: &'static str = "";
}

/// Records with a draft/published/scheduled lifecycle
pub trait Publishable: Resource + Default {
    fn id(&self) -> Option<&str>;
    fn updated_at(&self) -> Option<&str>;

    /// Build the minimal patch for a status change
    fn status_patch(updated_at: Option<String>, status: &str, published_at: Option<String>)
        -> Self;
}

impl Resource for Post {
    const KIND: &'static str = "post";
    const PLURAL: &'static str = "posts";
    const LIST_QUERY: &'static str = "formats=html";
    const READ_QUERY: &'static str = "formats=html";
    const WRITE_QUERY: &'static str = "source=html&formats=html";
}

impl Resource for Page {
    const KIND: &'static str = "page";
    const PLURAL: &'static str = "pages";
    const LIST_QUERY: &'static str = "formats=html";
    const READ_QUERY: &'static str = "formats=html";
    const WRITE_QUERY: &'static str = "source=html&formats=html";
}

impl Resource for Tag {
    const KIND: &'static str = "tag";
    const PLURAL: &'static str = "tags";
    const LIST_QUERY: &'static str = "include=count.posts";
}

impl Resource for Author {
    const KIND: &'static str = "user";
    const PLURAL: &'static str = "users";
}

impl Resource for Newsletter {
    const KIND: &'static str = "newsletter";
    const PLURAL: &'static str = "newsletters";
}

impl Resource for Webhook {
    const KIND: &'static str = "webhook";
    const PLURAL: &'static str = "webhooks";
}

impl Resource for Setting {
    const KIND: &'static str = "setting";
    const PLURAL: &'static str = "settings";
}

impl Resource for Image {
    const KIND: &'static str = "image";
    const PLURAL: &'static str = "images";
}

impl Publishable for Post {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn status_patch(updated_at: Option<String>, status: &str, published_at: Option<String>) -> Self {
        Post {
            updated_at,
            status: Some(status.to_string()),
            published_at,
            ..Default::default()
        }
    }
}

impl Publishable for Page {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn status_patch(updated_at: Option<String>, status: &str, published_at: Option<String>) -> Self {
        Page {
            updated_at,
            status: Some(status.to_string()),
            published_at,
            ..Default::default()
        }
    }
}

/// Join a path and query clauses, skipping empty clauses
fn with_query(path: String, clauses: &[&str]) -> String {
    let query: Vec<&str> = clauses.iter().copied().filter(|c| !c.is_empty()).collect();
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

/// Handle for the operations on one resource type
pub struct Resources<'a, T> {
    client: &'a AdminClient,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: Resource> Resources<'a, T> {
    pub(crate) fn new(client: &'a AdminClient) -> Self {
        Resources {
            client,
            _record: PhantomData,
        }
    }

    pub(crate) fn list_path(status: &str, limit: u32) -> String {
        let status = if status.is_empty() || status == STATUS_ALL {
            String::new()
        } else {
            format!("filter=status:{}", status)
        };
        let limit = if limit > 0 {
            format!("limit={}", limit)
        } else {
            String::new()
        };
        with_query(
            format!("/{}/", T::PLURAL),
            &[T::LIST_QUERY, status.as_str(), limit.as_str()],
        )
    }

    pub(crate) fn id_path(id: &str, query: &str) -> String {
        with_query(format!("/{}/{}/", T::PLURAL, id), &[query])
    }

    pub(crate) fn slug_path(slug: &str) -> String {
        with_query(format!("/{}/slug/{}/", T::PLURAL, slug), &[T::READ_QUERY])
    }

    /// List one page of records.
    ///
    /// `status` filters by status unless it is empty or `"all"`; `limit` of 0
    /// leaves the page size to the server.
    pub fn list(&self, status: &str, limit: u32) -> Result<Collection<T>> {
        self.client
            .execute(Method::GET, &Self::list_path(status, limit), NO_BODY)
    }

    /// Get a single record by id, falling back to a lookup by slug.
    ///
    /// Any failure of the id lookup triggers the slug lookup, including
    /// network errors; only the second error is reported. An empty collection
    /// from either lookup is [`GhostError::NotFound`].
    pub fn get(&self, id_or_slug: &str) -> Result<T> {
        let by_id: Result<Collection<T>> = self.client.execute(
            Method::GET,
            &Self::id_path(id_or_slug, T::READ_QUERY),
            NO_BODY,
        );

        let found = match by_id {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(kind = T::KIND, key = id_or_slug, error = %e, "lookup by id failed, trying slug");
                self.client
                    .execute(Method::GET, &Self::slug_path(id_or_slug), NO_BODY)?
            }
        };

        found.into_first().ok_or_else(|| GhostError::NotFound {
            kind: T::KIND,
            key: id_or_slug.to_string(),
        })
    }

    /// Create a record and return it as stored by the server
    pub fn create(&self, record: &T) -> Result<T> {
        let path = with_query(format!("/{}/", T::PLURAL), &[T::WRITE_QUERY]);
        self.write(Method::POST, &path, record)
    }

    /// Update the record `id` with the fields set in `record`.
    ///
    /// Posts and pages must carry the current `updated_at`; the server rejects
    /// stale writes with a 409.
    pub fn update(&self, id: &str, record: &T) -> Result<T> {
        self.write(Method::PUT, &Self::id_path(id, T::WRITE_QUERY), record)
    }

    /// Permanently delete the record `id`
    pub fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute_raw(Method::DELETE, &Self::id_path(id, ""), NO_BODY)?;
        Ok(())
    }

    fn write(&self, method: Method, path: &str, record: &T) -> Result<T> {
        let written: Collection<T> = self.client.execute(method, path, Some(&Singleton(record)))?;
        written
            .into_first()
            .ok_or(GhostError::NoneReturned { kind: T::KIND })
    }
}

impl<T: Publishable> Resources<'_, T> {
    /// Set the status to "published"
    pub fn publish(&self, id_or_slug: &str) -> Result<T> {
        self.transition(id_or_slug, "published", None)
    }

    /// Set the status back to "draft"
    pub fn unpublish(&self, id_or_slug: &str) -> Result<T> {
        self.transition(id_or_slug, "draft", None)
    }

    /// Schedule publication at `publish_at` (ISO 8601, e.g. "2025-01-15T12:00:00Z")
    pub fn schedule(&self, id_or_slug: &str, publish_at: &str) -> Result<T> {
        self.transition(id_or_slug, "scheduled", Some(publish_at.to_string()))
    }

    /// Fetch the record for its current `updated_at`, then send a status patch
    fn transition(&self, id_or_slug: &str, status: &str, published_at: Option<String>) -> Result<T> {
        let existing = self.get(id_or_slug)?;
        let id = existing.id().ok_or(GhostError::MissingField {
            kind: T::KIND,
            field: "id",
        })?;

        let patch = T::status_patch(
            existing.updated_at().map(str::to_string),
            status,
            published_at,
        );
        self.update(id, &patch)
    }
}
