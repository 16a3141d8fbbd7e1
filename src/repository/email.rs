//! Email templates.
//!
//! Same shape as chat templates plus a subject line and a text alignment
//! hint for right-to-left content.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{DocId, DocumentStore};
use crate::types::{Language, Viewer};

use super::{
    Entity, create_entity, dedupe_tags, delete_entity, epoch, get_visible, list_visible,
    patch_document, require_viewer, update_entity,
};

pub const EMAIL_TEMPLATES_COLLECTION: &str = "emailTemplates";

fn default_private() -> bool {
    true
}

/// Rendering hint only; `Right` pairs with [`Language::He`] content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    #[serde(skip)]
    pub id: DocId,
    #[serde(rename = "userId", default)]
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject: String,
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
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default = "epoch")]
    pub created_at: Timestamp,
    #[serde(default = "epoch")]
    pub updated_at: Timestamp,
}

impl Entity for EmailTemplate {
    const KIND: &'static str = "email template";
    const COLLECTION: &'static str = EMAIL_TEMPLATES_COLLECTION;

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

#[derive(Debug, Clone, Default)]
pub struct NewEmailTemplate {
    pub name: String,
    pub subject: String,
    pub content_male: String,
    pub content_female: String,
    pub tags: Vec<String>,
    pub language: Language,
    pub text_align: TextAlign,
    /// `None` applies the kind default: email templates are private unless
    /// shared explicitly.
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

#[derive(Debug, Clone)]
pub struct EmailTemplateRepository<S> {
    store: S,
}

impl<S: DocumentStore> EmailTemplateRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        viewer: Option<&Viewer>,
        draft: NewEmailTemplate,
    ) -> Result<EmailTemplate> {
        let viewer = require_viewer(viewer, "create an email template")?;
        let now = Timestamp::now();
        let mut tags = draft.tags;
        dedupe_tags(&mut tags);

        let template = EmailTemplate {
            id: DocId::default(),
            owner_id: viewer.id.clone(),
            name: draft.name,
            subject: draft.subject,
            content_male: draft.content_male,
            content_female: draft.content_female,
            tags,
            is_private: draft.is_private.unwrap_or(true),
            language: draft.language,
            text_align: draft.text_align,
            created_at: now,
            updated_at: now,
        };
        create_entity(&self.store, template).await
    }

    pub async fn list(&self, viewer: Option<&Viewer>) -> Result<Vec<EmailTemplate>> {
        list_visible(&self.store, viewer).await
    }

    pub async fn get(&self, viewer: Option<&Viewer>, id: &DocId) -> Result<EmailTemplate> {
        get_visible(&self.store, viewer, id).await
    }

    pub async fn update(
        &self,
        viewer: Option<&Viewer>,
        id: &DocId,
        mut patch: EmailTemplatePatch,
    ) -> Result<()> {
        if let Some(tags) = patch.tags.as_mut() {
            dedupe_tags(tags);
        }
        let partial = patch_document(&patch)?;
        update_entity::<EmailTemplate, _>(&self.store, viewer, id, partial).await
    }

    pub async fn delete(&self, viewer: Option<&Viewer>, id: &DocId) -> Result<()> {
        delete_entity::<EmailTemplate, _>(&self.store, viewer, id).await
    }
}
