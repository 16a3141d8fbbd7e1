//! First-run database initialization.
//!
//! The store creates collections implicitly on first write, but existence
//! cannot be probed cheaply, so each collection gets a sentinel document
//! under the reserved `placeholder` id. Initialization also upserts the
//! viewer's profile document and optionally seeds starter templates for a
//! brand-new account. Sentinels are filtered out of every repository read
//! surface.

use jiff::Timestamp;
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::{Result, TemplateError};
use crate::store::{DocId, Document, DocumentStore, Predicate, StoreError};
use crate::types::Viewer;

use super::chat::{CHAT_TEMPLATES_COLLECTION, ChatTemplate};
use super::email::{EMAIL_TEMPLATES_COLLECTION, EmailTemplate, TextAlign};
use super::reply::CASE_REPLIES_COLLECTION;
use super::resolution::CASE_RESOLUTIONS_COLLECTION;
use super::{
    FIELD_CREATED, FIELD_OWNER, PLACEHOLDER_ID, create_entity, require_viewer, timestamp_value,
};

pub const USERS_COLLECTION: &str = "users";

/// Every collection the application touches, sentinel-probed on bootstrap.
pub const BOOTSTRAP_COLLECTIONS: &[&str] = &[
    USERS_COLLECTION,
    CHAT_TEMPLATES_COLLECTION,
    EMAIL_TEMPLATES_COLLECTION,
    CASE_RESOLUTIONS_COLLECTION,
    CASE_REPLIES_COLLECTION,
];

fn placeholder_id() -> DocId {
    DocId::new(PLACEHOLDER_ID)
}

fn as_object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// Guarantee `collection` exists by probing for its sentinel and writing one
/// when absent. The sentinel is public so the probe works for any account.
pub async fn ensure_collection<S: DocumentStore>(store: &S, collection: &str) -> Result<()> {
    let id = placeholder_id();
    match store.get(collection, &id).await {
        Ok(_) => Ok(()),
        Err(StoreError::NotFound(..)) => {
            tracing::debug!("creating sentinel for collection '{collection}'");
            let sentinel = as_object(json!({
                "type": PLACEHOLDER_ID,
                "createdAt": timestamp_value(Timestamp::now())?,
                "isPrivate": false,
            }));
            store
                .upsert(collection, &id, sentinel)
                .await
                .map_err(|e| TemplateError::from_write("ensure collection", "sentinel", e))
        }
        Err(other) => Err(TemplateError::from_read("ensure collection", other)),
    }
}

/// Create or refresh the viewer's profile document, preserving an existing
/// `createdAt`.
async fn upsert_profile<S: DocumentStore>(store: &S, viewer: &Viewer) -> Result<()> {
    let id = DocId::new(viewer.id.clone());
    let created_at = match store.get(USERS_COLLECTION, &id).await {
        Ok(existing) => existing.get(FIELD_CREATED).cloned(),
        Err(StoreError::NotFound(..)) => None,
        Err(other) => return Err(TemplateError::from_read("load profile", other)),
    };

    let now = timestamp_value(Timestamp::now())?;
    let profile = as_object(json!({
        "email": viewer.email,
        "displayName": viewer.display_name,
        "photoURL": viewer.photo_url,
        "createdAt": created_at.unwrap_or_else(|| now.clone()),
        "updatedAt": now,
    }));
    store
        .upsert(USERS_COLLECTION, &id, profile)
        .await
        .map_err(|e| TemplateError::from_write("save profile", "profile", e))
}

async fn owns_any<S: DocumentStore>(store: &S, collection: &str, viewer: &Viewer) -> Result<bool> {
    let docs = store
        .query(
            collection,
            &[Predicate::eq(FIELD_OWNER, viewer.id.as_str())],
            &[],
        )
        .await
        .map_err(|e| TemplateError::from_read("probe templates", e))?;
    Ok(!docs.is_empty())
}

/// Seed the starter content a brand-new account begins with. Skipped for any
/// kind the viewer already owns documents of.
async fn seed_starters<S: DocumentStore>(
    store: &S,
    viewer: &Viewer,
    config: &Config,
) -> Result<()> {
    let now = Timestamp::now();

    if !owns_any(store, CHAT_TEMPLATES_COLLECTION, viewer).await? {
        tracing::debug!("seeding starter chat template for '{}'", viewer.id);
        create_entity(
            store,
            ChatTemplate {
                id: DocId::default(),
                owner_id: viewer.id.clone(),
                name: "Welcome Message".to_string(),
                content_male: "Hello Mr. {name}, how can I assist you today?".to_string(),
                content_female: "Hello Ms. {name}, how can I assist you today?".to_string(),
                tags: vec!["greeting".to_string(), "welcome".to_string()],
                is_private: false,
                language: config.default_language,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;
    }

    if !owns_any(store, EMAIL_TEMPLATES_COLLECTION, viewer).await? {
        tracing::debug!("seeding starter email template for '{}'", viewer.id);
        create_entity(
            store,
            EmailTemplate {
                id: DocId::default(),
                owner_id: viewer.id.clone(),
                name: "Issue Follow-up".to_string(),
                subject: "Following Up on Your Recent Issue".to_string(),
                content_male: "Dear Mr. {name},\n\nI hope this email finds you well.".to_string(),
                content_female: "Dear Ms. {name},\n\nI hope this email finds you well."
                    .to_string(),
                tags: vec!["follow-up".to_string(), "support".to_string()],
                is_private: false,
                language: config.default_language,
                text_align: TextAlign::Left,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;
    }

    Ok(())
}

/// Full first-run initialization for an authenticated account: collection
/// sentinels, profile document, and (when configured) starter content.
/// Idempotent; safe to run on every login.
pub async fn initialize<S: DocumentStore>(
    store: &S,
    viewer: Option<&Viewer>,
    config: &Config,
) -> Result<()> {
    let viewer = require_viewer(viewer, "initialize the database")?;

    tokio::try_join!(
        ensure_collection(store, USERS_COLLECTION),
        ensure_collection(store, CHAT_TEMPLATES_COLLECTION),
        ensure_collection(store, EMAIL_TEMPLATES_COLLECTION),
        ensure_collection(store, CASE_RESOLUTIONS_COLLECTION),
        ensure_collection(store, CASE_REPLIES_COLLECTION),
    )?;

    upsert_profile(store, viewer).await?;

    if config.seed_on_bootstrap {
        seed_starters(store, viewer, config).await?;
    }

    tracing::debug!("database initialization completed for '{}'", viewer.id);
    Ok(())
}

/// Non-destructive setup probe: true when every collection sentinel and the
/// viewer's profile document exist.
pub async fn verify_setup<S: DocumentStore>(store: &S, viewer: &Viewer) -> Result<bool> {
    for collection in BOOTSTRAP_COLLECTIONS {
        match store.get(collection, &placeholder_id()).await {
            Ok(_) => {}
            Err(StoreError::NotFound(..)) => return Ok(false),
            Err(other) => return Err(TemplateError::from_read("verify setup", other)),
        }
    }
    match store
        .get(USERS_COLLECTION, &DocId::new(viewer.id.clone()))
        .await
    {
        Ok(_) => Ok(true),
        Err(StoreError::NotFound(..)) => Ok(false),
        Err(other) => Err(TemplateError::from_read("verify setup", other)),
    }
}
