//! Query-by-shape selection and shallow update patches.
//!
//! A [`Query`] is a partial document: a stored document matches when every field of the
//! query is present in it with an equal value. A [`Patch`] is a partial document whose
//! fields overwrite the selected document's fields.
//!
//! # Query Building
//!
//! ```ignore
//! use mockdoc::query::Query;
//!
//! let by_id = Query::by_id(3);
//! let by_author = Query::builder()
//!     .eq("author", "J.R.R. Tolkien")
//!     .eq("title", "The Two Towers")
//!     .build();
//! ```

use bson::{Bson, Document};

use crate::{document::ID_FIELD, error::DocumentStoreError};

/// An equality filter over a subset of document fields.
///
/// The empty query matches every document; callers that want a single specific document
/// should always include the identity field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    shape: Document,
}

impl Query {
    /// Creates an empty query, which matches every document.
    pub fn new() -> Self {
        Query { shape: Document::new() }
    }

    /// Creates a query selecting the document with the given identity.
    pub fn by_id(id: i64) -> Self {
        Query::builder().eq(ID_FIELD, id).build()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Returns `true` if this query has no fields and therefore matches everything.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Iterates over the `(field, expected value)` pairs of this query.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Bson)> {
        self.shape.iter()
    }

    /// Returns the query as the partial document it was built from.
    pub fn as_document(&self) -> &Document {
        &self.shape
    }
}

impl From<Document> for Query {
    fn from(shape: Document) -> Self {
        Query { shape }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Requires `field` to equal `value`. A repeated field replaces the earlier value.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.query.shape.insert(field.into(), value.into());
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// A shallow update applied to the first document matching a query.
///
/// Fields in the patch overwrite the document's fields, fields absent from the patch are
/// kept. The identity field is immutable and is skipped even if the patch carries it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: Document,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Patch { fields: Document::new() }
    }

    /// Sets `field` to `value` in this patch.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns `true` if the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merges this patch into `target`, leaving `id` untouched.
    pub fn apply_to(&self, target: &mut Document) {
        for (field, value) in self.fields.iter() {
            if field == ID_FIELD {
                continue;
            }

            target.insert(field.clone(), value.clone());
        }
    }
}

impl From<Document> for Patch {
    fn from(fields: Document) -> Self {
        Patch { fields }
    }
}

/// Walks the fields of a [`Query`] against some target.
///
/// Backends implement [`visit_field`](QueryVisitor::visit_field) to decide a single
/// equality; the default [`visit_query`](QueryVisitor::visit_query) requires every field
/// to hold and stops at the first one that does not.
pub trait QueryVisitor {
    type Error: Into<DocumentStoreError>;

    fn visit_field(&mut self, field: &str, expected: &Bson) -> Result<bool, Self::Error>;

    fn visit_query(&mut self, query: &Query) -> Result<bool, Self::Error> {
        for (field, expected) in query.fields() {
            if !self.visit_field(field, expected)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
