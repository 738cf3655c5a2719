//! Core traits and helpers for document representation and identity.
//!
//! Stored documents are plain [`bson::Document`] maps with an open field set. The only
//! field the store interprets is [`ID_FIELD`], an integer identity assigned on insert.
//! Domain types opt into typed access by implementing [`Resource`].

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the identity field carried by every stored document.
pub const ID_FIELD: &str = "id";

/// Core trait for domain types stored in a collection.
///
/// A resource is any serde type with an integer identity. Unknown fields survive a
/// round trip only if the type keeps them itself (e.g. with `#[serde(flatten)]`).
///
/// # Example
///
/// ```ignore
/// use mockdoc::document::Resource;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Book {
///     pub id: i64,
///     pub title: String,
/// }
///
/// impl Resource for Book {
///     fn id(&self) -> i64 {
///         self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "books"
///     }
/// }
/// ```
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Returns this resource's identity.
    fn id(&self) -> i64;

    /// Returns the name of the collection this resource lives in.
    fn collection_name() -> &'static str;
}

/// Extension trait providing conversions between resources and stored documents.
///
/// Automatically implemented for every [`Resource`].
pub trait ResourceExt: Resource {
    /// Converts this resource to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value is not a map.
    fn to_document(&self) -> DocumentStoreResult<Document>;

    /// Creates a resource from a stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    fn from_document(document: Document) -> DocumentStoreResult<Self>;

    /// Converts this resource to a JSON value.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a resource from a JSON value.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<R: Resource> ResourceExt for R {
    fn to_document(&self) -> DocumentStoreResult<Document> {
        to_document(self)
    }

    fn from_document(document: Document) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(document))?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}

/// Serializes any map-shaped value into a BSON document.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidDocument`] if the value does not serialize to a map.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> DocumentStoreResult<Document> {
    match serialize_to_bson(value)? {
        Bson::Document(document) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a map-shaped value, got {:?}",
            other.element_type()
        ))),
    }
}

/// Reads the identity of a document.
///
/// Returns `Ok(None)` when the document has no `id` field. Integral doubles are accepted
/// since JSON callers cannot distinguish them from integers.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidDocument`] when `id` is present but is not an integer.
pub fn document_id(document: &Document) -> DocumentStoreResult<Option<i64>> {
    match document.get(ID_FIELD) {
        None => Ok(None),
        Some(value) => id_from_bson(value)
            .map(Some)
            .ok_or_else(|| DocumentStoreError::InvalidDocument(format!("`{ID_FIELD}` must be an integer, got {value}"))),
    }
}

/// Computes the next identity for a set of documents: `max(ids) + 1`, or `1` when there
/// are none. Documents without a readable integer `id` are skipped.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidDocument`] when the largest id is `i64::MAX`.
pub fn next_id<'a>(documents: impl IntoIterator<Item = &'a Document>) -> DocumentStoreResult<i64> {
    let max = documents
        .into_iter()
        .filter_map(|doc| doc.get(ID_FIELD).and_then(id_from_bson))
        .max();

    match max {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| DocumentStoreError::InvalidDocument(format!("no identity left after `{ID_FIELD}` {max}"))),
    }
}

fn id_from_bson(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 => Some(*v as i64),
        _ => None,
    }
}
