//! Threaded replies under a case resolution.

mod common;

use common::{ana, noa};
use templateworks::{
    CaseReplyPatch, CaseReplyRepository, MemoryStore, NewCaseReply, TemplateError,
};

fn reply_draft(resolution_id: &str, content: &str) -> NewCaseReply {
    NewCaseReply {
        resolution_id: resolution_id.to_string(),
        content: content.to_string(),
        images: Vec::new(),
    }
}

#[tokio::test]
async fn test_list_is_scoped_and_oldest_first() {
    let repo = CaseReplyRepository::new(MemoryStore::new());

    repo.create(Some(&ana()), reply_draft("res-1", "first"))
        .await
        .unwrap();
    repo.create(Some(&noa()), reply_draft("res-1", "second"))
        .await
        .unwrap();
    repo.create(Some(&ana()), reply_draft("res-2", "elsewhere"))
        .await
        .unwrap();

    let thread = repo.list(Some(&noa()), "res-1").await.unwrap();
    let contents: Vec<&str> = thread.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[tokio::test]
async fn test_list_requires_viewer() {
    let repo = CaseReplyRepository::new(MemoryStore::new());
    assert!(matches!(
        repo.list(None, "res-1").await,
        Err(TemplateError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn test_only_author_may_edit_or_delete() {
    let repo = CaseReplyRepository::new(MemoryStore::new());
    let created = repo
        .create(Some(&ana()), reply_draft("res-1", "original"))
        .await
        .unwrap();

    let result = repo
        .update(
            Some(&noa()),
            &created.id,
            CaseReplyPatch {
                content: Some("defaced".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(TemplateError::PermissionDenied(..))));

    assert!(matches!(
        repo.delete(Some(&noa()), &created.id).await,
        Err(TemplateError::PermissionDenied(..))
    ));

    repo.update(
        Some(&ana()),
        &created.id,
        CaseReplyPatch {
            content: Some("amended".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let thread = repo.list(Some(&ana()), "res-1").await.unwrap();
    assert_eq!(thread[0].content, "amended");

    repo.delete(Some(&ana()), &created.id).await.unwrap();
    assert!(repo.list(Some(&ana()), "res-1").await.unwrap().is_empty());
}
