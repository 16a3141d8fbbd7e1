//! Replies threaded under a case resolution.
//!
//! Replies carry no visibility flag of their own; they follow the parent
//! resolution, which the caller already holds when it lists them. Listing is
//! scoped by resolution and ordered oldest-first (conversation order).

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplateError};
use crate::store::{DOC_ID_FIELD, DocId, DocumentStore, OrderBy, Predicate};
use crate::types::Viewer;

use super::{
    Entity, FIELD_CREATED, collect_entities, create_entity, delete_entity, epoch, patch_document,
    require_viewer, update_entity,
};

pub const CASE_REPLIES_COLLECTION: &str = "caseReplies";

/// Wire name of the parent resolution's id.
const FIELD_RESOLUTION: &str = "resolutionId";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReply {
    #[serde(skip)]
    pub id: DocId,
    #[serde(rename = "userId", default)]
    pub owner_id: String,
    #[serde(default)]
    pub resolution_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "epoch")]
    pub created_at: Timestamp,
    #[serde(default = "epoch")]
    pub updated_at: Timestamp,
}

impl Entity for CaseReply {
    const KIND: &'static str = "case reply";
    const COLLECTION: &'static str = CASE_REPLIES_COLLECTION;

    fn id(&self) -> &DocId {
        &self.id
    }
    fn set_id(&mut self, id: DocId) {
        self.id = id;
    }
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
    fn is_private(&self) -> bool {
        false
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCaseReply {
    pub resolution_id: String,
    pub content: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReplyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct CaseReplyRepository<S> {
    store: S,
}

impl<S: DocumentStore> CaseReplyRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, viewer: Option<&Viewer>, draft: NewCaseReply) -> Result<CaseReply> {
        let viewer = require_viewer(viewer, "create a reply")?;
        let now = Timestamp::now();

        let reply = CaseReply {
            id: DocId::default(),
            owner_id: viewer.id.clone(),
            resolution_id: draft.resolution_id,
            content: draft.content,
            images: draft.images,
            created_at: now,
            updated_at: now,
        };
        create_entity(&self.store, reply).await
    }

    /// All replies under one resolution, oldest first.
    pub async fn list(
        &self,
        viewer: Option<&Viewer>,
        resolution_id: &str,
    ) -> Result<Vec<CaseReply>> {
        require_viewer(viewer, "list replies")?;
        let docs = self
            .store
            .query(
                CASE_REPLIES_COLLECTION,
                &[Predicate::eq(FIELD_RESOLUTION, resolution_id)],
                &[OrderBy::asc(FIELD_CREATED), OrderBy::asc(DOC_ID_FIELD)],
            )
            .await
            .map_err(|e| TemplateError::from_read("list replies", e))?;

        let mut replies = collect_entities::<CaseReply, _>(docs.into_iter());
        replies.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(replies)
    }

    pub async fn update(
        &self,
        viewer: Option<&Viewer>,
        id: &DocId,
        patch: CaseReplyPatch,
    ) -> Result<()> {
        let partial = patch_document(&patch)?;
        update_entity::<CaseReply, _>(&self.store, viewer, id, partial).await
    }

    pub async fn delete(&self, viewer: Option<&Viewer>, id: &DocId) -> Result<()> {
        delete_entity::<CaseReply, _>(&self.store, viewer, id).await
    }
}
