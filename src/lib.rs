//! # ghost-admin - Ghost Admin API client for Rust
//!
//! A blocking client for the Ghost Admin API: posts, pages, tags, users,
//! newsletters, webhooks, site information, settings and image upload.
//!
//! ## Features
//!
//! - Short-lived HS256 admin tokens, minted fresh for every request
//! - One generic accessor per resource with list/get/create/update/delete
//! - Lookup by id with automatic fallback to lookup by slug
//! - Publish, unpublish and schedule for posts and pages
//! - Structured errors carrying the server's status and message
//!
//! ## Basic Usage
//!
//! ```no_run
//! use ghost_admin::{AdminClient, Post};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AdminClient::new(
//!         "https://example.ghost.io",
//!         "6489f5e3c3b1a2001c8e4d7f:0a1b2c3d4e5f60718293a4b5c6d7e8f9",
//!     )?;
//!
//!     // One page of drafts, ten at a time
//!     let drafts = client.posts().list("draft", 10)?;
//!     for post in &drafts {
//!         println!("{:?}", post.title);
//!     }
//!
//!     let created = client.posts().create(&Post {
//!         title: Some("Hello".to_string()),
//!         html: Some("<p>Hello, world!</p>".to_string()),
//!         ..Default::default()
//!     })?;
//!
//!     client.posts().schedule("hello", "2025-02-01T12:00:00Z")?;
//!     # let _ = created;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use ghost_admin::{AdminClient, Config};
//! use std::time::Duration;
//!
//! let config = Config::new("https://example.ghost.io", "id:0a1b2c")
//!     .with_timeout(Duration::from_secs(30));
//! let client = AdminClient::from_config(config)?;
//! # Ok::<(), ghost_admin::GhostError>(())
//! ```

pub mod apikey;
pub mod client;
pub mod error;
pub mod resource;
pub mod response;
pub mod rest;
pub mod token;
pub mod types;
pub mod upload;

// Re-export main types for convenience
pub use apikey::ApiKey;
pub use client::Config;
pub use error::{CredentialError, GhostError, Result};
pub use resource::{Publishable, Resource, Resources, STATUS_ALL};
pub use response::{Collection, ErrorDetail, ErrorResponse, Meta, Pagination};
pub use rest::AdminClient;
pub use types::{
    Author, Image, Newsletter, Page, Post, Setting, SettingValue, Site, Tag, TagCount, Webhook,
};

// Re-export the HTTP method type used by the raw request methods
pub use reqwest::Method;
