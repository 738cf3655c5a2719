//! In-memory collection implementation.
//!
//! Documents live in an ordered `Vec` behind a single async read-write lock. Every write
//! holds the write guard for its whole find-then-mutate sequence, so each call is one
//! critical section.

use std::sync::Arc;
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Document;
use tracing::{debug, trace};

use mockdoc_core::{
    backend::{CollectionBackend, CollectionBackendBuilder},
    document::{ID_FIELD, document_id, next_id},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Patch, Query},
    result::{DeleteResult, InsertOneResult, UpdateResult},
};

use crate::evaluator::DocumentEvaluator;

/// Thread-safe in-memory collection of BSON documents.
///
/// `InMemoryCollection` implements [`CollectionBackend`] with the semantics of a
/// document-store driver's collection: equality-by-shape queries where the first match
/// in storage order wins, auto-increment integer identities, and driver-shaped result
/// envelopes.
///
/// # Thread Safety
///
/// The collection is cloneable and uses an `Arc`-wrapped internal state. Multiple clones
/// of the same instance share the same documents.
///
/// # Ownership
///
/// Stored documents are never handed out by reference: reads return clones and writes
/// take ownership of their input, so callers cannot mutate storage behind its back.
///
/// # Example
///
/// ```ignore
/// use mockdoc_memory::InMemoryCollection;
/// use mockdoc::{backend::CollectionBackend, query::Query};
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let books = InMemoryCollection::builder()
///         .name("books")
///         .seed(vec![doc! { "id": 1, "title": "The Two Towers" }])
///         .build()
///         .await?;
///
///     let inserted = books.insert_one(doc! { "title": "X" }).await?;
///     assert_eq!(inserted.inserted_id, 2);
///
///     let found = books.find_one(&Query::by_id(2)).await?;
///     assert!(found.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryCollection {
    name: String,
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryCollection {
    /// Creates a new empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a builder for a collection with a name and seed documents.
    pub fn builder() -> InMemoryCollectionBuilder {
        InMemoryCollectionBuilder::default()
    }
}

/// Appends `document` to `documents` under the identity rules, returning the assigned id
/// and the stored copy.
///
/// The stored document always carries its `id` first, normalized to an `Int64`.
fn insert_into(documents: &mut Vec<Document>, document: Document, collection: &str) -> DocumentStoreResult<(i64, Document)> {
    let id = match document_id(&document)? {
        Some(id) => id,
        None => next_id(documents.iter())?,
    };

    let taken = documents
        .iter()
        .any(|doc| matches!(document_id(doc), Ok(Some(existing)) if existing == id));

    if taken {
        return Err(DocumentStoreError::DocumentAlreadyExists(id, collection.to_string()));
    }

    let mut stored = Document::new();
    stored.insert(ID_FIELD, id);

    for (field, value) in document {
        if field != ID_FIELD {
            stored.insert(field, value);
        }
    }

    documents.push(stored.clone());

    Ok((id, stored))
}

#[async_trait]
impl CollectionBackend for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self) -> DocumentStoreResult<Vec<Document>> {
        let documents = self.documents.read().await;
        trace!(collection = %self.name, count = documents.len(), "find");

        Ok(documents.to_vec())
    }

    async fn find_one(&self, query: &Query) -> DocumentStoreResult<Option<Document>> {
        let documents = self.documents.read().await;
        let found = DocumentEvaluator::position(documents.iter(), query)
            .map(|index| documents[index].clone());

        trace!(collection = %self.name, ?query, found = found.is_some(), "find_one");

        Ok(found)
    }

    async fn insert_one(&self, document: Document) -> DocumentStoreResult<InsertOneResult> {
        let mut documents = self.documents.write().await;
        let (id, stored) = insert_into(&mut documents, document, &self.name)?;
        debug!(collection = %self.name, id, "inserted document");

        Ok(InsertOneResult::new(id, stored))
    }

    async fn update_one(&self, query: &Query, patch: &Patch) -> DocumentStoreResult<UpdateResult> {
        let mut documents = self.documents.write().await;

        let Some(index) = DocumentEvaluator::position(documents.iter(), query) else {
            debug!(collection = %self.name, ?query, "update matched no document");
            return Ok(UpdateResult::unmatched());
        };

        patch.apply_to(&mut documents[index]);
        debug!(collection = %self.name, ?query, "updated document");

        Ok(UpdateResult::modified())
    }

    async fn delete_one(&self, query: &Query) -> DocumentStoreResult<DeleteResult> {
        let mut documents = self.documents.write().await;

        let Some(index) = DocumentEvaluator::position(documents.iter(), query) else {
            debug!(collection = %self.name, ?query, "delete matched no document");
            return Ok(DeleteResult::unmatched());
        };

        documents.remove(index);
        debug!(collection = %self.name, ?query, remaining = documents.len(), "deleted document");

        Ok(DeleteResult::deleted())
    }

    async fn count(&self) -> DocumentStoreResult<usize> {
        Ok(self.documents.read().await.len())
    }
}

/// Builder for constructing [`InMemoryCollection`] instances.
///
/// Seed documents go through the same identity rules as [`insert_one`](CollectionBackend::insert_one):
/// missing ids are assigned in order and duplicate ids fail the build.
///
/// # Example
///
/// ```ignore
/// use mockdoc_memory::InMemoryCollection;
/// use mockdoc::backend::CollectionBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let users = InMemoryCollection::builder().name("users").build().await.unwrap();
/// }
/// ```
#[derive(Default, Debug)]
pub struct InMemoryCollectionBuilder {
    name: String,
    seed: Vec<Document>,
}

impl InMemoryCollectionBuilder {
    /// Sets the collection name used in logs and errors.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends documents to store when the collection is built.
    pub fn seed(mut self, documents: impl IntoIterator<Item = Document>) -> Self {
        self.seed.extend(documents);
        self
    }
}

#[async_trait]
impl CollectionBackendBuilder for InMemoryCollectionBuilder {
    type Backend = InMemoryCollection;

    /// Builds the collection and stores the seed documents in order.
    ///
    /// # Errors
    ///
    /// Fails if a seed document has a non-integer or duplicate `id`.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut documents = Vec::with_capacity(self.seed.len());

        for document in self.seed {
            insert_into(&mut documents, document, &self.name)?;
        }

        debug!(collection = %self.name, count = documents.len(), "seeded collection");

        Ok(InMemoryCollection {
            name: self.name,
            documents: Arc::new(RwLock::new(documents)),
        })
    }
}
