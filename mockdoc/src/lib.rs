//! Main mockdoc crate: an in-memory stand-in for a document database client.
//!
//! This crate is the primary entry point for users of mockdoc. It re-exports the core
//! types, the in-memory collection backend, and provides [`ResourceStore`], the typed
//! façade that domain code talks to.
//!
//! # Features
//!
//! - **Driver-shaped API** - `find`, `find_one`, `insert_one`, `update_one`, `delete_one`
//! - **Query by shape** - Equality on a subset of fields, first match in storage order wins
//! - **Auto-increment identity** - `max(ids) + 1`, or `1` for an empty collection
//! - **Result envelopes** - `{ok, n}` acknowledgements with inserted/modified/deleted counts
//!
//! # Quick Start
//!
//! ```ignore
//! use mockdoc::{prelude::*, memory::InMemoryCollection};
//! use serde::{Serialize, Deserialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Book {
//!     pub id: i64,
//!     pub title: String,
//!     pub author: String,
//! }
//!
//! impl Resource for Book {
//!     fn id(&self) -> i64 { self.id }
//!     fn collection_name() -> &'static str { "books" }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create a store over an empty in-memory collection
//!     let books = ResourceStore::<Book, InMemoryCollection>::in_memory(vec![]).await.unwrap();
//!
//!     // Insert a book; the store assigns the identity
//!     let inserted = books
//!         .insert_one(&json!({ "title": "The Two Towers", "author": "J.R.R. Tolkien" }))
//!         .await
//!         .unwrap();
//!     assert_eq!(inserted.inserted_id, 1);
//!
//!     // Update it by identity
//!     let updated = books.update_one(1, &json!({ "title": "The Return of the King" })).await.unwrap();
//!     assert_eq!(updated.modified_count, 1);
//!
//!     // Absence is a value, not an error
//!     assert!(books.find_one(2).await.unwrap().is_none());
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory collection for development and testing

pub mod prelude;
pub mod resource;

pub use mockdoc_core::{backend, document, error, query, result};
pub use resource::ResourceStore;

// Re-export BSON types for convenience
pub use bson;

/// In-memory collection implementations.
pub mod memory {
    pub use mockdoc_memory::{InMemoryCollection, InMemoryCollectionBuilder};
}
