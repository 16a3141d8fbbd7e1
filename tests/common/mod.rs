//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use serde_json::json;
use templateworks::{DocId, Document, DocumentStore, MemoryStore, Viewer};

/// Primary test account.
pub fn ana() -> Viewer {
    Viewer {
        id: "user-ana".to_string(),
        email: "ana@example.com".to_string(),
        display_name: "Ana".to_string(),
        photo_url: String::new(),
    }
}

/// Secondary test account, never the owner of ana's content.
pub fn noa() -> Viewer {
    Viewer {
        id: "user-noa".to_string(),
        email: "noa@example.com".to_string(),
        display_name: "Noa".to_string(),
        photo_url: String::new(),
    }
}

fn to_document(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

/// Seed a raw chat-template document at a chosen id, bypassing the
/// repository, for tests that need controlled timestamps and ids.
pub async fn put_chat_doc(
    store: &MemoryStore,
    id: &str,
    owner: &str,
    name: &str,
    created_at: &str,
    is_private: bool,
) {
    let doc = to_document(json!({
        "userId": owner,
        "name": name,
        "contentMale": "",
        "contentFemale": "",
        "tags": [],
        "isPrivate": is_private,
        "language": "en",
        "createdAt": created_at,
        "updatedAt": created_at,
    }));
    store
        .upsert("chatTemplates", &DocId::new(id), doc)
        .await
        .unwrap();
}

/// Seed a raw case-resolution document with the legacy `isPublished` flag
/// instead of `isPrivate`.
pub async fn put_legacy_resolution_doc(
    store: &MemoryStore,
    id: &str,
    owner: &str,
    title: &str,
    created_at: &str,
    is_published: bool,
) {
    let doc = to_document(json!({
        "userId": owner,
        "title": title,
        "description": "",
        "steps": [],
        "tags": [],
        "isPublished": is_published,
        "language": "en",
        "createdAt": created_at,
        "updatedAt": created_at,
    }));
    store
        .upsert("caseResolutions", &DocId::new(id), doc)
        .await
        .unwrap();
}
