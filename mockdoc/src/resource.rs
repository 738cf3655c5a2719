//! Typed resource stores.
//!
//! A [`ResourceStore`] binds one collection backend to a [`Resource`] type. It exposes the
//! driver-shaped operations by identity, converts stored documents to the resource type,
//! and owns the identity policy for new resources.
//!
//! # Example
//!
//! ```ignore
//! use mockdoc::{prelude::*, memory::InMemoryCollection};
//! use serde_json::json;
//!
//! let books = ResourceStore::<Book, InMemoryCollection>::in_memory(seed_books()).await?;
//!
//! let inserted = books.insert_one(&json!({ "title": "X", "author": "Y" })).await?;
//! let found = books.find_one(inserted.inserted_id).await?;
//! let deleted = books.delete_one(inserted.inserted_id).await?;
//! assert_eq!(deleted.deleted_count, 1);
//! ```

use bson::Document;
use serde::Serialize;
use std::{fmt, marker::PhantomData};
use tracing::debug;

use mockdoc_core::{
    backend::{CollectionBackend, CollectionBackendBuilder},
    document::{ID_FIELD, Resource, ResourceExt, document_id, next_id, to_document},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Patch, Query},
    result::{DeleteResult, InsertOneResult, UpdateResult},
};
use mockdoc_memory::InMemoryCollection;

/// A typed façade over one collection backend.
///
/// Not-found is never an error: lookups return `None` and writes report zero counts.
/// Errors only come from (de)serialization and the backend itself.
///
/// # Type Parameters
///
/// * `R` - The resource type stored in the collection
/// * `B` - The collection backend
pub struct ResourceStore<R: Resource, B: CollectionBackend> {
    backend: B,
    _marker: PhantomData<R>,
}

impl<R: Resource, B: CollectionBackend> ResourceStore<R, B> {
    /// Wraps an existing backend without seeding it.
    pub fn new(backend: B) -> Self {
        Self { backend, _marker: PhantomData }
    }

    /// Wraps `backend` and inserts `seed` into it in order.
    ///
    /// # Errors
    ///
    /// Fails if a seed resource cannot be serialized or its id is already taken.
    pub async fn seeded(backend: B, seed: impl IntoIterator<Item = R>) -> DocumentStoreResult<Self> {
        for resource in seed {
            backend.insert_one(resource.to_document()?).await?;
        }

        Ok(Self::new(backend))
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns every resource in storage order.
    pub async fn find(&self) -> DocumentStoreResult<Vec<R>> {
        self.backend
            .find()
            .await?
            .into_iter()
            .map(R::from_document)
            .collect()
    }

    /// Returns the resource with the given identity, if any.
    pub async fn find_one(&self, id: i64) -> DocumentStoreResult<Option<R>> {
        self.find_one_where(&Query::by_id(id)).await
    }

    /// Returns the first resource matching an arbitrary query, if any.
    pub async fn find_one_where(&self, query: &Query) -> DocumentStoreResult<Option<R>> {
        self.backend
            .find_one(query)
            .await?
            .map(R::from_document)
            .transpose()
    }

    /// Inserts a new resource built from a partial document.
    ///
    /// When the partial document carries no `id`, the next identity is computed here as
    /// `max(existing ids) + 1` (or `1`) before the insert is delegated to the backend. A
    /// caller-supplied `id` is kept as is. The finished document must deserialize into `R`
    /// before anything is stored.
    ///
    /// # Errors
    ///
    /// Fails if `partial` is not map-shaped, if the finished document does not fit `R`, or
    /// if the backend rejects the insert. Nothing is stored in any of these cases.
    pub async fn insert_one<P>(&self, partial: &P) -> DocumentStoreResult<InsertOneResult<R>>
    where
        P: Serialize + ?Sized,
    {
        let document = to_document(partial)?;

        let id = match document_id(&document)? {
            Some(id) => id,
            None => next_id(&self.backend.find().await?)?,
        };
        let document = with_id_first(id, document);
        ensure_fits::<R>(&document)?;

        let inserted = self.backend.insert_one(document).await?;
        debug!(collection = R::collection_name(), id = inserted.inserted_id, "resource inserted");

        inserted.try_map(R::from_document)
    }

    /// Shallow-merges `patch` into the resource with the given identity.
    ///
    /// The patch's `id`, if any, is ignored. The merged result must still deserialize into
    /// `R`, otherwise the patch is rejected and the stored resource is left untouched.
    pub async fn update_one<P>(&self, id: i64, patch: &P) -> DocumentStoreResult<UpdateResult>
    where
        P: Serialize + ?Sized,
    {
        let patch = Patch::from(to_document(patch)?);
        let query = Query::by_id(id);

        let Some(mut merged) = self.backend.find_one(&query).await? else {
            return Ok(UpdateResult::unmatched());
        };
        patch.apply_to(&mut merged);
        ensure_fits::<R>(&merged)?;

        let updated = self.backend.update_one(&query, &patch).await?;
        debug!(collection = R::collection_name(), id, modified = updated.modified_count, "resource update");

        Ok(updated)
    }

    /// Removes the resource with the given identity.
    pub async fn delete_one(&self, id: i64) -> DocumentStoreResult<DeleteResult> {
        let deleted = self.backend.delete_one(&Query::by_id(id)).await?;
        debug!(collection = R::collection_name(), id, deleted = deleted.deleted_count, "resource delete");

        Ok(deleted)
    }

    /// Returns the number of stored resources.
    pub async fn count(&self) -> DocumentStoreResult<usize> {
        self.backend.count().await
    }
}

impl<R: Resource> ResourceStore<R, InMemoryCollection> {
    /// Builds an in-memory collection named after `R` and seeds it.
    ///
    /// # Errors
    ///
    /// Fails if a seed resource cannot be serialized or two seed resources share an id.
    pub async fn in_memory(seed: impl IntoIterator<Item = R>) -> DocumentStoreResult<Self> {
        let documents = seed
            .into_iter()
            .map(|resource| resource.to_document())
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        let backend = InMemoryCollection::builder()
            .name(R::collection_name())
            .seed(documents)
            .build()
            .await?;

        Ok(Self::new(backend))
    }
}

/// Rejects documents that would not read back as `R`.
fn ensure_fits<R: Resource>(document: &Document) -> DocumentStoreResult<()> {
    R::from_document(document.clone())
        .map(drop)
        .map_err(|err| DocumentStoreError::InvalidDocument(format!("not a valid `{}` resource: {err}", R::collection_name())))
}

fn with_id_first(id: i64, document: Document) -> Document {
    let mut ordered = Document::new();
    ordered.insert(ID_FIELD, id);

    for (field, value) in document {
        if field != ID_FIELD {
            ordered.insert(field, value);
        }
    }

    ordered
}

impl<R: Resource, B: CollectionBackend + Clone> Clone for ResourceStore<R, B> {
    fn clone(&self) -> Self {
        Self::new(self.backend.clone())
    }
}

impl<R: Resource, B: CollectionBackend> fmt::Debug for ResourceStore<R, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStore")
            .field("resource", &R::collection_name())
            .field("backend", &self.backend)
            .finish()
    }
}
