//! Collection backend abstraction.
//!
//! [`CollectionBackend`] is the contract of a document-store driver's collection object,
//! reduced to the five calls the API needs. Code written against it does not know
//! whether it talks to the in-memory mock or a real driver. Backends are constructed
//! through a [`CollectionBackendBuilder`].
//!
//! # Examples
//!
//! ```ignore
//! use mockdoc::backend::CollectionBackend;
//! use mockdoc::query::{Query, Patch};
//! use bson::doc;
//!
//! let inserted = backend.insert_one(doc! { "title": "X", "author": "Y" }).await?;
//! let found = backend.find_one(&Query::by_id(inserted.inserted_id)).await?;
//! let updated = backend.update_one(&Query::by_id(inserted.inserted_id), &Patch::new().set("title", "Z")).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document;
use std::{fmt::Debug, sync::Arc};

use crate::{
    error::DocumentStoreResult,
    query::{Patch, Query},
    result::{DeleteResult, InsertOneResult, UpdateResult},
};

/// Abstract interface of a single document collection.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Each call is a single critical section: no
/// other call can observe a partially applied write.
///
/// # Error Handling
///
/// A query that matches nothing is not an error. Reads report it as `None`, writes as a
/// zero count in their envelope. Errors are reserved for malformed input and backend
/// failures.
#[async_trait]
pub trait CollectionBackend: Send + Sync + Debug {
    /// Returns the name of this collection.
    fn name(&self) -> &str;

    /// Returns every stored document in storage order.
    async fn find(&self) -> DocumentStoreResult<Vec<Document>>;

    /// Returns the first document (in storage order) matching `query`, if any.
    async fn find_one(&self, query: &Query) -> DocumentStoreResult<Option<Document>>;

    /// Appends `document`, assigning `max(ids) + 1` (or `1`) when it has no `id`.
    ///
    /// # Errors
    ///
    /// Fails without storing anything when the `id` is not an integer or already exists.
    async fn insert_one(&self, document: Document) -> DocumentStoreResult<InsertOneResult>;

    /// Shallow-merges `patch` into the first document matching `query`.
    async fn update_one(&self, query: &Query, patch: &Patch) -> DocumentStoreResult<UpdateResult>;

    /// Removes the first document matching `query`, keeping the order of the rest.
    async fn delete_one(&self, query: &Query) -> DocumentStoreResult<DeleteResult>;

    /// Returns the number of stored documents.
    async fn count(&self) -> DocumentStoreResult<usize> {
        Ok(self.find().await?.len())
    }
}

#[async_trait]
impl<B> CollectionBackend for &B
where
    B: CollectionBackend + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn find(&self) -> DocumentStoreResult<Vec<Document>> {
        (**self).find().await
    }

    async fn find_one(&self, query: &Query) -> DocumentStoreResult<Option<Document>> {
        (**self).find_one(query).await
    }

    async fn insert_one(&self, document: Document) -> DocumentStoreResult<InsertOneResult> {
        (**self).insert_one(document).await
    }

    async fn update_one(&self, query: &Query, patch: &Patch) -> DocumentStoreResult<UpdateResult> {
        (**self).update_one(query, patch).await
    }

    async fn delete_one(&self, query: &Query) -> DocumentStoreResult<DeleteResult> {
        (**self).delete_one(query).await
    }

    async fn count(&self) -> DocumentStoreResult<usize> {
        (**self).count().await
    }
}

#[async_trait]
impl<B> CollectionBackend for Arc<B>
where
    B: CollectionBackend + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn find(&self) -> DocumentStoreResult<Vec<Document>> {
        (**self).find().await
    }

    async fn find_one(&self, query: &Query) -> DocumentStoreResult<Option<Document>> {
        (**self).find_one(query).await
    }

    async fn insert_one(&self, document: Document) -> DocumentStoreResult<InsertOneResult> {
        (**self).insert_one(document).await
    }

    async fn update_one(&self, query: &Query, patch: &Patch) -> DocumentStoreResult<UpdateResult> {
        (**self).update_one(query, patch).await
    }

    async fn delete_one(&self, query: &Query) -> DocumentStoreResult<DeleteResult> {
        (**self).delete_one(query).await
    }

    async fn count(&self) -> DocumentStoreResult<usize> {
        (**self).count().await
    }
}

/// Factory for collection backends.
#[async_trait]
pub trait CollectionBackendBuilder: Send {
    type Backend: CollectionBackend;

    /// Builds the backend, applying any seed data.
    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
