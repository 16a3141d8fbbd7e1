//! Case-resolution playbooks.
//!
//! Titled documents with a description, ordered steps, inline images, and
//! links auto-derived from step text. Unlike the template kinds, resolutions
//! are public by default.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, TemplateError};
use crate::store::{DocId, Document, DocumentStore};
use crate::templating::{StepLink, extract_links};
use crate::types::{Language, Viewer};

use super::{
    Entity, FIELD_PRIVATE, create_entity, dedupe_tags, delete_entity, epoch, get_visible,
    list_visible, patch_document, require_viewer, update_entity,
};

pub const CASE_RESOLUTIONS_COLLECTION: &str = "caseResolutions";

/// A step may carry at most this many inline images.
pub const MAX_STEP_IMAGES: usize = 5;

/// Wire name of the inverted visibility flag written by older revisions.
const FIELD_PUBLISHED: &str = "isPublished";

/// One ordered step of a resolution playbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStep {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub links: Vec<StepLink>,
}

impl ResolutionStep {
    /// A fresh step with a generated id and links derived from its content.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let links = extract_links(&content);
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            images: Vec::new(),
            links,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResolution {
    #[serde(skip)]
    pub id: DocId,
    #[serde(rename = "userId", default)]
    pub owner_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_images: Vec<String>,
    #[serde(default)]
    pub steps: Vec<ResolutionStep>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "epoch")]
    pub created_at: Timestamp,
    #[serde(default = "epoch")]
    pub updated_at: Timestamp,
}

impl Entity for CaseResolution {
    const KIND: &'static str = "case resolution";
    const COLLECTION: &'static str = CASE_RESOLUTIONS_COLLECTION;

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

    /// Older revisions stored the visibility flag inverted as `isPublished`.
    fn normalize_document(doc: &mut Document) {
        if !doc.contains_key(FIELD_PRIVATE) {
            if let Some(published) = doc.get(FIELD_PUBLISHED).and_then(Value::as_bool) {
                doc.insert(FIELD_PRIVATE.to_string(), Value::Bool(!published));
            }
        }
    }
}

fn validate_steps(steps: &[ResolutionStep]) -> Result<()> {
    for step in steps {
        if step.images.len() > MAX_STEP_IMAGES {
            return Err(TemplateError::InvalidInput(format!(
                "step '{}' has {} images; at most {MAX_STEP_IMAGES} are allowed",
                step.id,
                step.images.len()
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct NewCaseResolution {
    pub title: String,
    pub description: String,
    pub description_images: Vec<String>,
    pub steps: Vec<ResolutionStep>,
    pub tags: Vec<String>,
    pub reason: String,
    pub language: Language,
    /// `None` applies the kind default: resolutions are public unless marked
    /// private explicitly.
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResolutionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<ResolutionStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

#[derive(Debug, Clone)]
pub struct CaseResolutionRepository<S> {
    store: S,
}

impl<S: DocumentStore> CaseResolutionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        viewer: Option<&Viewer>,
        draft: NewCaseResolution,
    ) -> Result<CaseResolution> {
        let viewer = require_viewer(viewer, "create a case resolution")?;
        validate_steps(&draft.steps)?;
        let now = Timestamp::now();
        let mut tags = draft.tags;
        dedupe_tags(&mut tags);

        let resolution = CaseResolution {
            id: DocId::default(),
            owner_id: viewer.id.clone(),
            title: draft.title,
            description: draft.description,
            description_images: draft.description_images,
            steps: draft.steps,
            tags,
            reason: draft.reason,
            is_private: draft.is_private.unwrap_or(false),
            language: draft.language,
            created_at: now,
            updated_at: now,
        };
        create_entity(&self.store, resolution).await
    }

    pub async fn list(&self, viewer: Option<&Viewer>) -> Result<Vec<CaseResolution>> {
        list_visible(&self.store, viewer).await
    }

    pub async fn get(&self, viewer: Option<&Viewer>, id: &DocId) -> Result<CaseResolution> {
        get_visible(&self.store, viewer, id).await
    }

    pub async fn update(
        &self,
        viewer: Option<&Viewer>,
        id: &DocId,
        mut patch: CaseResolutionPatch,
    ) -> Result<()> {
        if let Some(steps) = patch.steps.as_ref() {
            validate_steps(steps)?;
        }
        if let Some(tags) = patch.tags.as_mut() {
            dedupe_tags(tags);
        }
        let partial = patch_document(&patch)?;
        update_entity::<CaseResolution, _>(&self.store, viewer, id, partial).await
    }

    pub async fn delete(&self, viewer: Option<&Viewer>, id: &DocId) -> Result<()> {
        delete_entity::<CaseResolution, _>(&self.store, viewer, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_new_derives_links() {
        let step = ResolutionStep::new("open https://help.example/console first");
        assert!(!step.id.is_empty());
        assert_eq!(step.links.len(), 1);
        assert_eq!(step.links[0].url, "https://help.example/console");
    }

    #[test]
    fn test_validate_steps_caps_images() {
        let mut step = ResolutionStep::new("x");
        step.images = (0..6).map(|i| format!("https://img.example/{i}")).collect();
        assert!(matches!(
            validate_steps(&[step]),
            Err(TemplateError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_legacy_published_flag_maps_to_private() {
        let mut doc = Document::new();
        doc.insert(FIELD_PUBLISHED.to_string(), Value::Bool(true));
        CaseResolution::normalize_document(&mut doc);
        assert_eq!(doc.get(FIELD_PRIVATE), Some(&Value::Bool(false)));

        // An explicit isPrivate always wins over the legacy key.
        let mut doc = Document::new();
        doc.insert(FIELD_PUBLISHED.to_string(), Value::Bool(true));
        doc.insert(FIELD_PRIVATE.to_string(), Value::Bool(true));
        CaseResolution::normalize_document(&mut doc);
        assert_eq!(doc.get(FIELD_PRIVATE), Some(&Value::Bool(true)));
    }
}
