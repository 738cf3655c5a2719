//! Convenient re-exports of commonly used types from mockdoc.
//!
//! ```ignore
//! use mockdoc::prelude::*;
//! ```

pub use mockdoc_core::{
    backend::{CollectionBackend, CollectionBackendBuilder},
    document::{Resource, ResourceExt, ID_FIELD},
    query::{Query, QueryBuilder, Patch, QueryVisitor},
    result::{Acknowledgement, InsertOneResult, UpdateResult, DeleteResult},
    error::{DocumentStoreError, DocumentStoreResult},
};

pub use crate::resource::ResourceStore;
