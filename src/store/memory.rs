//! In-memory `DocumentStore` backend.
//!
//! Collections live in `DashMap` structures, allowing lock-free concurrent
//! reads and fine-grained locking for writes. Clones share the same
//! underlying state, so one store can back several repositories.
//!
//! The backend reproduces two behaviors of managed document databases that
//! the repository layer depends on:
//!
//! - a predicate never matches a document lacking the field, and a document
//!   lacking an ordered field is excluded from the result set;
//! - in strict mode, a query combining a predicate with an ordering on a
//!   different field requires a composite index registered up front, and its
//!   absence fails with [`StoreError::IndexRequired`].

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use rand::Rng;
use serde_json::Value;

use super::{
    DOC_ID_FIELD, DocId, Document, DocumentStore, Direction, FieldOp, OrderBy, Predicate,
    StoreError, StoreResult,
};

/// Generate a store id: 20 random hex characters.
fn generate_doc_id() -> String {
    let mut buf = [0u8; 10];
    rand::rng().fill(&mut buf[..]);
    buf.iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Default)]
struct Inner {
    collections: DashMap<String, DashMap<String, Document>>,
    indexes: RwLock<HashSet<(String, Vec<String>)>>,
    strict: bool,
}

/// DashMap-backed document store. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// A store that serves every query without index provisioning.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects compound queries until a matching composite index
    /// is registered with [`MemoryStore::register_index`], for parity with
    /// managed backends.
    pub fn strict() -> Self {
        Self {
            inner: Arc::new(Inner {
                strict: true,
                ..Default::default()
            }),
        }
    }

    /// Provision a composite index over `fields`, in query declaration order
    /// (predicate fields first, then ordering fields).
    pub fn register_index(&self, collection: &str, fields: &[&str]) {
        self.inner.indexes.write().insert((
            collection.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        ));
    }

    fn collection(&self, name: &str) -> dashmap::mapref::one::Ref<'_, String, DashMap<String, Document>> {
        self.inner
            .collections
            .entry(name.to_string())
            .or_default()
            .downgrade()
    }

    /// The composite index a query needs, or `None` when single-field rules
    /// suffice (no predicates, or every ordered field is also filtered).
    fn required_index(predicates: &[Predicate], order_by: &[OrderBy]) -> Option<Vec<String>> {
        let order_fields: Vec<&str> = order_by
            .iter()
            .map(|o| o.field.as_str())
            .filter(|f| *f != DOC_ID_FIELD)
            .collect();
        if predicates.is_empty() || order_fields.is_empty() {
            return None;
        }
        if order_fields
            .iter()
            .all(|f| predicates.iter().any(|p| p.field == *f))
        {
            return None;
        }
        let mut fields: Vec<String> = predicates.iter().map(|p| p.field.clone()).collect();
        for f in order_fields {
            if !fields.iter().any(|existing| existing == f) {
                fields.push(f.to_string());
            }
        }
        Some(fields)
    }

    fn check_indexes(
        &self,
        collection: &str,
        predicates: &[Predicate],
        order_by: &[OrderBy],
    ) -> StoreResult<()> {
        if !self.inner.strict {
            return Ok(());
        }
        let Some(fields) = Self::required_index(predicates, order_by) else {
            return Ok(());
        };
        let key = (collection.to_string(), fields.clone());
        if self.inner.indexes.read().contains(&key) {
            return Ok(());
        }
        Err(StoreError::IndexRequired {
            collection: collection.to_string(),
            message: format!(
                "this query requires a composite index on ({}); register it with MemoryStore::register_index",
                fields.join(", ")
            ),
        })
    }
}

/// Order two JSON scalars of the same type. Mismatched or non-scalar types
/// are not comparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn matches_predicate(doc: &Document, predicate: &Predicate) -> bool {
    // Absent field: no predicate matches, by contract.
    let Some(value) = doc.get(&predicate.field) else {
        return false;
    };
    match predicate.op {
        FieldOp::Eq => value == &predicate.value,
        FieldOp::Ne => value != &predicate.value,
        op => {
            let Some(ord) = compare_values(value, &predicate.value) else {
                return false;
            };
            match op {
                FieldOp::Lt => ord == Ordering::Less,
                FieldOp::Le => ord != Ordering::Greater,
                FieldOp::Gt => ord == Ordering::Greater,
                FieldOp::Ge => ord != Ordering::Less,
                FieldOp::Eq | FieldOp::Ne => unreachable!(),
            }
        }
    }
}

fn compare_results(
    (id_a, doc_a): &(DocId, Document),
    (id_b, doc_b): &(DocId, Document),
    order_by: &[OrderBy],
) -> Ordering {
    for clause in order_by {
        let ord = if clause.field == DOC_ID_FIELD {
            id_a.cmp(id_b)
        } else {
            match (doc_a.get(&clause.field), doc_b.get(&clause.field)) {
                (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        };
        let ord = match clause.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    // Stable fallback so repeated queries return identical orderings.
    id_a.cmp(id_b)
}

impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocId> {
        let docs = self.collection(collection);
        loop {
            let id = generate_doc_id();
            if !docs.contains_key(&id) {
                docs.insert(id.clone(), document);
                return Ok(DocId::new(id));
            }
        }
    }

    async fn upsert(&self, collection: &str, id: &DocId, document: Document) -> StoreResult<()> {
        self.collection(collection)
            .insert(id.as_str().to_string(), document);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &DocId) -> StoreResult<Document> {
        self.collection(collection)
            .get(id.as_str())
            .map(|doc| doc.value().clone())
            .ok_or_else(|| StoreError::NotFound(collection.to_string(), id.to_string()))
    }

    async fn update(&self, collection: &str, id: &DocId, partial: Document) -> StoreResult<()> {
        let docs = self.collection(collection);
        let Some(mut doc) = docs.get_mut(id.as_str()) else {
            return Err(StoreError::NotFound(collection.to_string(), id.to_string()));
        };
        for (key, value) in partial {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocId) -> StoreResult<()> {
        self.collection(collection).remove(id.as_str());
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        predicates: &[Predicate],
        order_by: &[OrderBy],
    ) -> StoreResult<Vec<(DocId, Document)>> {
        self.check_indexes(collection, predicates, order_by)?;

        let docs = self.collection(collection);
        let mut results: Vec<(DocId, Document)> = docs
            .iter()
            .filter(|entry| {
                predicates
                    .iter()
                    .all(|p| matches_predicate(entry.value(), p))
            })
            .filter(|entry| {
                // Documents lacking an ordered field fall out of the results.
                order_by
                    .iter()
                    .filter(|o| o.field != DOC_ID_FIELD)
                    .all(|o| entry.value().contains_key(&o.field))
            })
            .map(|entry| (DocId::new(entry.key().clone()), entry.value().clone()))
            .collect();

        results.sort_by(|a, b| compare_results(a, b, order_by));
        Ok(results)
    }
}
