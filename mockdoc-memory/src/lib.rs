//! In-memory collection backend for mockdoc.
//!
//! This crate provides [`InMemoryCollection`], a thread-safe implementation of the
//! `CollectionBackend` trait that keeps an ordered list of BSON documents in memory.
//! It stands in for a real document-store collection in development and tests.
//!
//! # Features
//!
//! - **Query by shape** - A document matches when every query field is equal
//! - **Auto-increment identity** - Missing ids become `max(ids) + 1`, or `1` when empty
//! - **Driver-shaped envelopes** - Writes report `{ok, n}` plus inserted/modified/deleted counts
//! - **Atomic calls** - One async read-write lock guards every operation
//!
//! # Quick Start
//!
//! ```ignore
//! use mockdoc::{prelude::*, memory::InMemoryCollection};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let books = InMemoryCollection::builder().name("books").build().await?;
//!
//!     let inserted = books.insert_one(doc! { "title": "X", "author": "Y" }).await?;
//!     assert_eq!(inserted.inserted_id, 1);
//!
//!     let deleted = books.delete_one(&Query::by_id(1)).await?;
//!     assert_eq!(deleted.deleted_count, 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockdoc_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryCollection, InMemoryCollectionBuilder};
