//! Driver-shaped result envelopes returned by write operations.
//!
//! Every envelope carries an [`Acknowledgement`] (the `{ok, n}` block a document-store
//! driver reports) plus the operation-specific counts. Envelopes serialize in camelCase
//! so they read the same as the driver's own responses:
//!
//! ```text
//! {"result":{"ok":1,"n":1},"insertedId":6,"insertedCount":1,"insertedDocument":{...}}
//! {"result":{"ok":1,"n":0},"matchedCount":0,"modifiedCount":0}
//! {"result":{"ok":1,"n":1},"deletedCount":1}
//! ```

use bson::Document;
use serde::{Deserialize, Serialize};

/// The `{ok, n}` acknowledgement block: `ok` is `1` for an acknowledged write and `n` is
/// the number of documents the write touched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgement {
    pub ok: i32,
    pub n: u64,
}

impl Acknowledgement {
    /// An acknowledged write that touched `n` documents.
    pub fn acknowledged(n: u64) -> Self {
        Self { ok: 1, n }
    }
}

/// Outcome of an insert. Always carries the stored document after identity assignment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult<D = Document> {
    pub result: Acknowledgement,
    pub inserted_id: i64,
    pub inserted_count: u64,
    pub inserted_document: D,
}

impl<D> InsertOneResult<D> {
    pub fn new(inserted_id: i64, inserted_document: D) -> Self {
        Self {
            result: Acknowledgement::acknowledged(1),
            inserted_id,
            inserted_count: 1,
            inserted_document,
        }
    }

    /// Converts the carried document, keeping the counts.
    pub fn try_map<T, E>(self, f: impl FnOnce(D) -> Result<T, E>) -> Result<InsertOneResult<T>, E> {
        Ok(InsertOneResult {
            result: self.result,
            inserted_id: self.inserted_id,
            inserted_count: self.inserted_count,
            inserted_document: f(self.inserted_document)?,
        })
    }
}

/// Outcome of an update: both counts are `1` when a document matched, `0` otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub result: Acknowledgement,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn modified() -> Self {
        Self { result: Acknowledgement::acknowledged(1), matched_count: 1, modified_count: 1 }
    }

    pub fn unmatched() -> Self {
        Self { result: Acknowledgement::acknowledged(0), matched_count: 0, modified_count: 0 }
    }
}

/// Outcome of a delete: `deleted_count` is `1` when a document was removed, `0` otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub result: Acknowledgement,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn deleted() -> Self {
        Self { result: Acknowledgement::acknowledged(1), deleted_count: 1 }
    }

    pub fn unmatched() -> Self {
        Self { result: Acknowledgement::acknowledged(0), deleted_count: 0 }
    }
}
