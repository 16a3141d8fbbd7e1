//! Document store abstraction.
//!
//! The repository layer talks to a managed document database through the
//! [`DocumentStore`] trait: collections of schema-less documents, queryable
//! by equality/range predicates and orderable by field values. A single query
//! cannot express OR across different fields, and a compound ordering may
//! require a server-side composite index; its absence is surfaced as a
//! distinct, actionable error.

pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryStore;

/// A schema-less document body. The document id is the store key and is never
/// part of the body.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Pseudo-field that orders a query by document id.
pub const DOC_ID_FIELD: &str = "__name__";

/// Store-assigned document identifier, stable for the document's lifetime.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Comparison operator for a query predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldOp::Eq => "==",
            FieldOp::Ne => "!=",
            FieldOp::Lt => "<",
            FieldOp::Le => "<=",
            FieldOp::Gt => ">",
            FieldOp::Ge => ">=",
        };
        write!(f, "{s}")
    }
}

/// A single field filter. Predicates on a field a document lacks never match:
/// an absent field is not the same as an empty one.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub field: String,
    pub op: FieldOp,
    pub value: serde_json::Value,
}

impl Predicate {
    pub fn new(field: impl Into<String>, op: FieldOp, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, FieldOp::Eq, value)
    }
}

/// Sort direction for an ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// One ordering clause. Documents lacking the ordered field are excluded from
/// the result set, matching managed-store behavior.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document '{1}' not found in '{0}'")]
    NotFound(String, String),

    #[error("composite index required for '{collection}': {message}")]
    IndexRequired { collection: String, message: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Contract the repository layer consumes from the managed document database.
///
/// All operations are asynchronous, non-blocking network calls that may
/// suspend for unbounded latency and fail independently. Once issued, an
/// operation either completes or fails; there is no cancellation propagation.
pub trait DocumentStore: Send + Sync {
    /// Persist a new document under a store-generated id.
    fn insert(
        &self,
        collection: &str,
        document: Document,
    ) -> impl std::future::Future<Output = StoreResult<DocId>> + Send;

    /// Create or replace the document at a caller-chosen id.
    fn upsert(
        &self,
        collection: &str,
        id: &DocId,
        document: Document,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Fetch a document by id.
    fn get(
        &self,
        collection: &str,
        id: &DocId,
    ) -> impl std::future::Future<Output = StoreResult<Document>> + Send;

    /// Merge `partial` into an existing document. Fails with `NotFound` when
    /// the id does not resolve.
    fn update(
        &self,
        collection: &str,
        id: &DocId,
        partial: Document,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Remove a document. Deleting an absent id is not an error.
    fn delete(
        &self,
        collection: &str,
        id: &DocId,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Run a filtered, ordered query. All predicates must hold (AND); OR
    /// across fields cannot be expressed in one query and must be composed by
    /// the caller as separate queries.
    fn query(
        &self,
        collection: &str,
        predicates: &[Predicate],
        order_by: &[OrderBy],
    ) -> impl std::future::Future<Output = StoreResult<Vec<(DocId, Document)>>> + Send;
}
