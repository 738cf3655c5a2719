//! Core types of mockdoc, an in-memory stand-in for a JSON document database client.
//!
//! This crate defines the contract shared by every collection implementation:
//!
//! - **Documents** ([`document`]) - Identity helpers and the [`Resource`](document::Resource) trait for typed access
//! - **Queries and patches** ([`query`]) - Equality-by-shape selection and shallow updates
//! - **Result envelopes** ([`result`]) - Driver-shaped `{ok, n}` acknowledgements and counts
//! - **Collection backends** ([`backend`]) - The async `find`/`find_one`/`insert_one`/`update_one`/`delete_one` contract
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use mockdoc::{backend::CollectionBackend, query::Query};
//! use bson::doc;
//!
//! let inserted = collection.insert_one(doc! { "title": "X", "author": "Y" }).await?;
//! assert_eq!(inserted.inserted_count, 1);
//!
//! let found = collection.find_one(&Query::by_id(inserted.inserted_id)).await?;
//! assert_eq!(found, Some(inserted.inserted_document));
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockdoc_core;

pub mod backend;
pub mod document;
pub mod error;
pub mod query;
pub mod result;
