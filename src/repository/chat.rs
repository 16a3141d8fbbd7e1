//! Chat reply templates.
//!
//! Short gendered message variants with `{name}` placeholder tokens, filled
//! in at copy time by [`crate::templating::substitute`].

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{DocId, DocumentStore};
use crate::types::{Language, Viewer};

use super::{
    Entity, create_entity, dedupe_tags, delete_entity, epoch, get_visible, list_visible,
    patch_document, require_viewer, update_entity,
};

pub const CHAT_TEMPLATES_COLLECTION: &str = "chatTemplates";

fn default_private() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTemplate {
    #[serde(skip)]
    pub id: DocId,
    #[serde(rename = "userId", default)]
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content_male: String,
    #[serde(default)]
    pub content_female: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_private")]
    pub is_private: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "epoch")]
    pub created_at: Timestamp,
    #[serde(default = "epoch")]
    pub updated_at: Timestamp,
}

impl Entity for ChatTemplate {
    const KIND: &'static str = "chat template";
    const COLLECTION: &'static str = CHAT_TEMPLATES_COLLECTION;

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
        self.is_private
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Creation payload: the template fields minus everything server-assigned.
#[derive(Debug, Clone, Default)]
pub struct NewChatTemplate {
    pub name: String,
    pub content_male: String,
    pub content_female: String,
    pub tags: Vec<String>,
    pub language: Language,
    /// `None` applies the kind default: chat templates are private unless
    /// shared explicitly.
    pub is_private: Option<bool>,
}

/// Partial update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTemplatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_male: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_female: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

#[derive(Debug, Clone)]
pub struct ChatTemplateRepository<S> {
    store: S,
}

impl<S: DocumentStore> ChatTemplateRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        viewer: Option<&Viewer>,
        draft: NewChatTemplate,
    ) -> Result<ChatTemplate> {
        let viewer = require_viewer(viewer, "create a chat template")?;
        let now = Timestamp::now();
        let mut tags = draft.tags;
        dedupe_tags(&mut tags);

        let template = ChatTemplate {
            id: DocId::default(),
            owner_id: viewer.id.clone(),
            name: draft.name,
            content_male: draft.content_male,
            content_female: draft.content_female,
            tags,
            is_private: draft.is_private.unwrap_or(true),
            language: draft.language,
            created_at: now,
            updated_at: now,
        };
        create_entity(&self.store, template).await
    }

    pub async fn list(&self, viewer: Option<&Viewer>) -> Result<Vec<ChatTemplate>> {
        list_visible(&self.store, viewer).await
    }

    pub async fn get(&self, viewer: Option<&Viewer>, id: &DocId) -> Result<ChatTemplate> {
        get_visible(&self.store, viewer, id).await
    }

    pub async fn update(
        &self,
        viewer: Option<&Viewer>,
        id: &DocId,
        mut patch: ChatTemplatePatch,
    ) -> Result<()> {
        if let Some(tags) = patch.tags.as_mut() {
            dedupe_tags(tags);
        }
        let partial = patch_document(&patch)?;
        update_entity::<ChatTemplate, _>(&self.store, viewer, id, partial).await
    }

    pub async fn delete(&self, viewer: Option<&Viewer>, id: &DocId) -> Result<()> {
        delete_entity::<ChatTemplate, _>(&self.store, viewer, id).await
    }
}
