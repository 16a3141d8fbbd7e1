//! Ownership/visibility composition across the repository contract.

mod common;

use common::{ana, noa, put_chat_doc};
use templateworks::{
    ChatTemplateRepository, MemoryStore, NewChatTemplate, TemplateError,
};

#[tokio::test]
async fn test_public_entity_is_visible_to_everyone() {
    let store = MemoryStore::new();
    let repo = ChatTemplateRepository::new(store);
    let created = repo
        .create(
            Some(&ana()),
            NewChatTemplate {
                name: "Shared greeting".to_string(),
                is_private: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    for viewer in [ana(), noa()] {
        let listed = repo.list(Some(&viewer)).await.unwrap();
        assert!(
            listed.iter().any(|t| t.id == created.id),
            "'{}' should see the public template",
            viewer.id
        );
    }
}

#[tokio::test]
async fn test_private_entity_is_visible_only_to_owner() {
    let store = MemoryStore::new();
    let repo = ChatTemplateRepository::new(store);
    let created = repo
        .create(
            Some(&ana()),
            NewChatTemplate {
                name: "Ana's draft".to_string(),
                is_private: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let owner_view = repo.list(Some(&ana())).await.unwrap();
    assert!(owner_view.iter().any(|t| t.id == created.id));

    let other_view = repo.list(Some(&noa())).await.unwrap();
    assert!(!other_view.iter().any(|t| t.id == created.id));
}

#[tokio::test]
async fn test_owned_public_entity_listed_once() {
    let store = MemoryStore::new();
    let repo = ChatTemplateRepository::new(store);
    // Matches both the owned-by-viewer and the public query branches.
    let created = repo
        .create(
            Some(&ana()),
            NewChatTemplate {
                name: "Both branches".to_string(),
                is_private: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = repo.list(Some(&ana())).await.unwrap();
    let occurrences = listed.iter().filter(|t| t.id == created.id).count();
    assert_eq!(occurrences, 1);
}

#[tokio::test]
async fn test_list_orders_newest_first_with_id_tiebreak() {
    let store = MemoryStore::new();
    put_chat_doc(&store, "aaa", "user-ana", "old", "2024-01-01T00:00:00Z", false).await;
    put_chat_doc(&store, "bbb", "user-ana", "tie-low", "2024-06-01T00:00:00Z", false).await;
    put_chat_doc(&store, "zzz", "user-ana", "tie-high", "2024-06-01T00:00:00Z", false).await;
    put_chat_doc(&store, "ccc", "user-ana", "new", "2024-12-01T00:00:00Z", false).await;

    let repo = ChatTemplateRepository::new(store);
    let listed = repo.list(Some(&ana())).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["new", "tie-high", "tie-low", "old"]);

    // Stable across repeated calls with no intervening writes.
    let again = repo.list(Some(&ana())).await.unwrap();
    let names_again: Vec<&str> = again.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, names_again);
}

#[tokio::test]
async fn test_list_requires_viewer() {
    let repo = ChatTemplateRepository::new(MemoryStore::new());
    assert!(matches!(
        repo.list(None).await,
        Err(TemplateError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn test_list_surfaces_missing_composite_index_distinctly() {
    let store = MemoryStore::strict();
    let repo = ChatTemplateRepository::new(store.clone());

    match repo.list(Some(&ana())).await {
        Err(TemplateError::IndexRequired(collection, message)) => {
            assert_eq!(collection, "chatTemplates");
            assert!(message.contains("composite index"));
        }
        other => panic!("expected IndexRequired, got {other:?}"),
    }

    // Provisioning both branch indexes makes the same call succeed.
    store.register_index("chatTemplates", &["userId", "createdAt"]);
    store.register_index("chatTemplates", &["isPrivate", "createdAt"]);
    repo.list(Some(&ana())).await.unwrap();
}

#[tokio::test]
async fn test_get_applies_visibility() {
    let store = MemoryStore::new();
    let repo = ChatTemplateRepository::new(store);
    let private = repo
        .create(
            Some(&ana()),
            NewChatTemplate {
                name: "Private".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(repo.get(Some(&ana()), &private.id).await.is_ok());
    assert!(matches!(
        repo.get(Some(&noa()), &private.id).await,
        Err(TemplateError::PermissionDenied(..))
    ));
}
