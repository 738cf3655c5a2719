//! Query evaluation for in-memory document matching.
//!
//! A document matches a query when every query field is present in the document and
//! compares equal. Integers compare exactly whatever their BSON width, so a query built
//! from an `i32` finds a document stored with an `i64`. A double equals an integer only
//! when it is integral and converts to that exact value.

use std::convert::Infallible;
use bson::{Bson, Document};

use mockdoc_core::query::{Query, QueryVisitor};

/// Borrowed view of a BSON value used for equality checks.
///
/// Kinds with no useful equality here (binary, regex, ...) are `Opaque` and never match.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Comparable<'a> {
    Int(i64),
    Double(f64),
    Value(&'a Bson),
    Opaque,
}

impl<'a> Comparable<'a> {
    pub fn of(bson: &'a Bson) -> Self {
        match bson {
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::Null
            | Bson::Boolean(_)
            | Bson::String(_)
            | Bson::DateTime(_)
            | Bson::Array(_)
            | Bson::Document(_) => Comparable::Value(bson),
            _ => Comparable::Opaque,
        }
    }
}

/// Exact integer value of `double`, if it has one.
fn integral(double: f64) -> Option<i64> {
    // i64::MIN is exactly representable; i64::MAX rounds up to 2^63, which is out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    (double.is_finite() && double.fract() == 0.0 && (-LIMIT..LIMIT).contains(&double))
        .then_some(double as i64)
}

fn arrays_equal(left: &[Bson], right: &[Bson]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| Comparable::of(l) == Comparable::of(r))
}

fn documents_equal(left: &Document, right: &Document) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, l)| right.get(key).is_some_and(|r| Comparable::of(l) == Comparable::of(r)))
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b,
            (Comparable::Int(i), Comparable::Double(d)) | (Comparable::Double(d), Comparable::Int(i)) => {
                integral(d) == Some(i)
            }
            (Comparable::Value(a), Comparable::Value(b)) => match (a, b) {
                (Bson::Array(a), Bson::Array(b)) => arrays_equal(a, b),
                (Bson::Document(a), Bson::Document(b)) => documents_equal(a, b),
                _ => a == b,
            },
            _ => false,
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn matches(document: &'a Document, query: &Query) -> bool {
        match DocumentEvaluator::new(document).visit_query(query) {
            Ok(matched) => matched,
            Err(never) => match never {},
        }
    }

    /// Position of the first document in `documents` matching `query`.
    pub fn position<'d>(documents: impl IntoIterator<Item = &'d Document>, query: &Query) -> Option<usize> {
        documents
            .into_iter()
            .position(|doc| DocumentEvaluator::matches(doc, query))
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Error = Infallible;

    fn visit_field(&mut self, field: &str, expected: &Bson) -> Result<bool, Self::Error> {
        Ok(match self.document.get(field) {
            Some(value) => Comparable::of(value) == Comparable::of(expected),
            None => false,
        })
    }
}
