//! Entity repositories.
//!
//! One repository per entity kind (chat template, email template, case
//! resolution, case reply), each implementing the same shape of contract:
//! create-for-owner, list-visible-to-viewer, update-if-owner,
//! delete-if-owner. The ownership and visibility rules live in this module's
//! shared helpers so the per-kind repositories stay thin.
//!
//! The store cannot express "owned by me OR public" in one query, so
//! [`list_visible`] fans out two queries, runs them concurrently, merges the
//! result sets, deduplicates by id, and re-sorts centrally.

pub mod bootstrap;
pub mod chat;
pub mod email;
pub mod reply;
pub mod resolution;

use std::collections::HashSet;

use jiff::Timestamp;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, TemplateError};
use crate::store::{
    DOC_ID_FIELD, DocId, Document, DocumentStore, OrderBy, Predicate, StoreError,
};
use crate::types::Viewer;

pub use chat::{ChatTemplate, ChatTemplatePatch, ChatTemplateRepository, NewChatTemplate};
pub use email::{
    EmailTemplate, EmailTemplatePatch, EmailTemplateRepository, NewEmailTemplate, TextAlign,
};
pub use reply::{CaseReply, CaseReplyPatch, CaseReplyRepository, NewCaseReply};
pub use resolution::{
    CaseResolution, CaseResolutionPatch, CaseResolutionRepository, NewCaseResolution,
    ResolutionStep,
};

/// Wire name of the owning user's id.
pub const FIELD_OWNER: &str = "userId";
/// Wire name of the visibility flag.
pub const FIELD_PRIVATE: &str = "isPrivate";
pub const FIELD_CREATED: &str = "createdAt";
pub const FIELD_UPDATED: &str = "updatedAt";

/// Reserved id and `type` marker of collection-existence sentinels. These
/// documents never surface through the repository interface.
pub const PLACEHOLDER_ID: &str = "placeholder";
const FIELD_TYPE: &str = "type";

/// A stored entity: one chat template, email template, case resolution, or
/// case reply.
///
/// The trait abstracts the per-kind documents enough for the shared CRUD and
/// visibility helpers to operate generically. Serialized bodies never carry
/// the id; it is the store key and is injected after load.
pub trait Entity: Serialize + DeserializeOwned + Send {
    /// Human-readable kind, used in error context ("chat template").
    const KIND: &'static str;
    /// Store collection holding this kind.
    const COLLECTION: &'static str;

    fn id(&self) -> &DocId;
    fn set_id(&mut self, id: DocId);
    fn owner_id(&self) -> &str;
    fn is_private(&self) -> bool;
    fn created_at(&self) -> Timestamp;

    /// Pre-parse hook for legacy document shapes (renamed flags and the
    /// like). The default is a no-op.
    fn normalize_document(_doc: &mut Document) {}
}

pub(crate) fn epoch() -> Timestamp {
    Timestamp::UNIX_EPOCH
}

/// Reject unauthenticated calls up front; every repository operation
/// requires an explicit viewer.
pub(crate) fn require_viewer<'v>(
    viewer: Option<&'v Viewer>,
    operation: &'static str,
) -> Result<&'v Viewer> {
    viewer.ok_or(TemplateError::Unauthenticated(operation))
}

pub(crate) fn is_placeholder(id: &DocId, doc: &Document) -> bool {
    id.as_str() == PLACEHOLDER_ID
        || doc.get(FIELD_TYPE).and_then(Value::as_str) == Some(PLACEHOLDER_ID)
}

/// Drop duplicate tags, first occurrence wins.
pub(crate) fn dedupe_tags(tags: &mut Vec<String>) {
    let mut seen = HashSet::new();
    tags.retain(|tag| seen.insert(tag.clone()));
}

fn parse_entity<E: Entity>(id: DocId, mut doc: Document) -> serde_json::Result<E> {
    E::normalize_document(&mut doc);
    let mut entity: E = serde_json::from_value(Value::Object(doc))?;
    entity.set_id(id);
    Ok(entity)
}

fn entity_document<E: Entity>(entity: &E) -> Result<Document> {
    match serde_json::to_value(entity)? {
        Value::Object(doc) => Ok(doc),
        other => Err(TemplateError::InvalidInput(format!(
            "{} serialized to non-object value: {other}",
            E::KIND
        ))),
    }
}

fn patch_document(patch: &impl Serialize) -> Result<Document> {
    match serde_json::to_value(patch)? {
        Value::Object(doc) => Ok(doc),
        other => Err(TemplateError::InvalidInput(format!(
            "partial payload serialized to non-object value: {other}"
        ))),
    }
}

pub(crate) fn timestamp_value(ts: Timestamp) -> Result<Value> {
    Ok(serde_json::to_value(ts)?)
}

/// Server-assigned fields are never accepted from a partial payload, even
/// when present: the identity and creation time of an entity are immutable.
pub(crate) fn strip_server_fields(partial: &mut Document) {
    partial.remove("id");
    partial.remove(FIELD_OWNER);
    partial.remove(FIELD_CREATED);
}

/// Persist a freshly-built entity and return it with its generated id.
pub(crate) async fn create_entity<E, S>(store: &S, mut entity: E) -> Result<E>
where
    E: Entity,
    S: DocumentStore,
{
    let doc = entity_document(&entity)?;
    let id = store
        .insert(E::COLLECTION, doc)
        .await
        .map_err(|e| TemplateError::from_write("create", E::KIND, e))?;
    entity.set_id(id);
    tracing::debug!("created {} '{}'", E::KIND, entity.id());
    Ok(entity)
}

/// Load an entity and verify the viewer owns it. Every mutating operation
/// goes through this check.
pub(crate) async fn load_owned<E, S>(store: &S, viewer: &Viewer, id: &DocId) -> Result<E>
where
    E: Entity,
    S: DocumentStore,
{
    let doc = store.get(E::COLLECTION, id).await.map_err(|e| match e {
        StoreError::NotFound(..) => TemplateError::NotFound(E::KIND, id.to_string()),
        other => TemplateError::from_read("load", other),
    })?;
    if is_placeholder(id, &doc) {
        return Err(TemplateError::NotFound(E::KIND, id.to_string()));
    }
    let entity: E = parse_entity(id.clone(), doc)?;
    if entity.owner_id() != viewer.id {
        return Err(TemplateError::PermissionDenied(E::KIND, id.to_string()));
    }
    Ok(entity)
}

/// Fetch one entity for display: the owner always sees it, anyone else only
/// when it is public.
pub(crate) async fn get_visible<E, S>(
    store: &S,
    viewer: Option<&Viewer>,
    id: &DocId,
) -> Result<E>
where
    E: Entity,
    S: DocumentStore,
{
    let viewer = require_viewer(viewer, "read")?;
    let doc = store.get(E::COLLECTION, id).await.map_err(|e| match e {
        StoreError::NotFound(..) => TemplateError::NotFound(E::KIND, id.to_string()),
        other => TemplateError::from_read("read", other),
    })?;
    if is_placeholder(id, &doc) {
        return Err(TemplateError::NotFound(E::KIND, id.to_string()));
    }
    let entity: E = parse_entity(id.clone(), doc)?;
    if entity.owner_id() != viewer.id && entity.is_private() {
        return Err(TemplateError::PermissionDenied(E::KIND, id.to_string()));
    }
    Ok(entity)
}

/// Merge a partial payload into an owned entity, refreshing `updatedAt`.
pub(crate) async fn update_entity<E, S>(
    store: &S,
    viewer: Option<&Viewer>,
    id: &DocId,
    mut partial: Document,
) -> Result<()>
where
    E: Entity,
    S: DocumentStore,
{
    let viewer = require_viewer(viewer, "update")?;
    let _owned: E = load_owned(store, viewer, id).await?;

    strip_server_fields(&mut partial);
    partial.insert(FIELD_UPDATED.to_string(), timestamp_value(Timestamp::now())?);
    store
        .update(E::COLLECTION, id, partial)
        .await
        .map_err(|e| TemplateError::from_write("update", E::KIND, e))?;
    tracing::debug!("updated {} '{id}'", E::KIND);
    Ok(())
}

/// Delete an owned entity. Deletion is immediate and unrecoverable; there is
/// no soft-delete or tombstone.
pub(crate) async fn delete_entity<E, S>(store: &S, viewer: Option<&Viewer>, id: &DocId) -> Result<()>
where
    E: Entity,
    S: DocumentStore,
{
    let viewer = require_viewer(viewer, "delete")?;
    let _owned: E = load_owned(store, viewer, id).await?;

    store
        .delete(E::COLLECTION, id)
        .await
        .map_err(|e| TemplateError::from_write("delete", E::KIND, e))?;
    tracing::debug!("deleted {} '{id}'", E::KIND);
    Ok(())
}

/// List every entity the viewer may see: all of their own plus everyone
/// else's public ones, newest-created first.
///
/// The two branches are issued concurrently so the call's latency is bounded
/// by the slower query rather than their sum.
pub(crate) async fn list_visible<E, S>(store: &S, viewer: Option<&Viewer>) -> Result<Vec<E>>
where
    E: Entity,
    S: DocumentStore,
{
    let viewer = require_viewer(viewer, "list")?;
    let order = [OrderBy::desc(FIELD_CREATED), OrderBy::desc(DOC_ID_FIELD)];
    let owned_by_viewer = [Predicate::eq(FIELD_OWNER, viewer.id.as_str())];
    let public = [Predicate::eq(FIELD_PRIVATE, false)];

    let owned_query = store.query(E::COLLECTION, &owned_by_viewer, &order);
    let public_query = store.query(E::COLLECTION, &public, &order);
    let (owned, public) = tokio::try_join!(owned_query, public_query)
        .map_err(|e| TemplateError::from_read("list", e))?;

    // Owner branch first so an entity matching both branches keeps its
    // owner-branch copy.
    let mut entities = collect_entities::<E, _>(owned.into_iter().chain(public));
    // Central re-sort: newest first, ties broken by id descending so repeated
    // calls return identical orderings.
    entities.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(a.id()))
    });
    Ok(entities)
}

/// Turn raw query results into entities: placeholder sentinels are dropped,
/// duplicate ids keep their first occurrence, and documents that fail to
/// deserialize are skipped with a warning rather than failing the listing.
pub(crate) fn collect_entities<E, I>(docs: I) -> Vec<E>
where
    E: Entity,
    I: Iterator<Item = (DocId, Document)>,
{
    let mut seen: HashSet<DocId> = HashSet::new();
    let mut entities = Vec::new();
    for (id, doc) in docs {
        if is_placeholder(&id, &doc) {
            continue;
        }
        if !seen.insert(id.clone()) {
            continue;
        }
        match parse_entity::<E>(id.clone(), doc) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                tracing::warn!("skipping malformed {} document '{id}': {e}", E::KIND);
            }
        }
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dedupe_tags_keeps_first_occurrence() {
        let mut tags = vec![
            "pixel".to_string(),
            "whatsapp".to_string(),
            "pixel".to_string(),
        ];
        dedupe_tags(&mut tags);
        assert_eq!(tags, vec!["pixel".to_string(), "whatsapp".to_string()]);
    }

    #[test]
    fn test_strip_server_fields() {
        let mut partial: Document = [
            ("id".to_string(), json!("x")),
            (FIELD_OWNER.to_string(), json!("u-1")),
            (FIELD_CREATED.to_string(), json!("2024-01-01T00:00:00Z")),
            ("name".to_string(), json!("kept")),
        ]
        .into_iter()
        .collect();
        strip_server_fields(&mut partial);
        assert_eq!(partial.len(), 1);
        assert!(partial.contains_key("name"));
    }

    #[test]
    fn test_is_placeholder_by_id_and_by_type() {
        let empty = Document::new();
        assert!(is_placeholder(&DocId::new(PLACEHOLDER_ID), &empty));

        let marked: Document = [(FIELD_TYPE.to_string(), json!("placeholder"))]
            .into_iter()
            .collect();
        assert!(is_placeholder(&DocId::new("abc"), &marked));
        assert!(!is_placeholder(&DocId::new("abc"), &empty));
    }

    #[test]
    fn test_require_viewer() {
        let viewer = Viewer::new("u-1");
        assert!(require_viewer(Some(&viewer), "list").is_ok());
        assert!(matches!(
            require_viewer(None, "list"),
            Err(TemplateError::Unauthenticated("list"))
        ));
    }
}
