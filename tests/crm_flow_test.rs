// Accounts, candidates and todos against the database layer.

use crewdex::types::candidate::CreateCandidate;
use crewdex::types::error::AppError;
use crewdex::types::todo::{CreateTodo, TodoFilter, UpdateTodo};
use crewdex::types::user::RegisterRequest;
use crewdex::utils::token::extract_token_parts;
use entity::todo::LinkedKind;

mod common;
use common::TestContext;

#[tokio::test]
async fn test_register_and_login_rotate_token() {
    let ctx = TestContext::new().await;

    let (user, token) = ctx
        .db
        .create_user(RegisterRequest {
            username: "frida".into(),
            email: "Frida@Test.com".into(),
            password: "correct horse".into(),
        })
        .await
        .unwrap();
    assert_eq!(user.email, "frida@test.com");

    let (uid, _secret) = extract_token_parts(&token).unwrap();
    assert_eq!(uid, user.id);

    let (_, fresh) = ctx.db.verify_login("frida", "correct horse").await.unwrap();
    assert_ne!(token, fresh);

    let err = ctx
        .db
        .verify_login("frida", "wrong horse")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("dupe").await;

    let err = ctx
        .db
        .create_user(RegisterRequest {
            username: user.username.clone(),
            email: "somewhere-else@test.com".into(),
            password: "password".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists));

    let err = ctx
        .db
        .create_user(RegisterRequest {
            username: "different-handle".into(),
            email: user.email.clone(),
            password: "password".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists));
}

#[tokio::test]
async fn test_candidate_comments_bump_candidate() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("recruiter").await;
    let scope = ctx.db.scope_of(user.id).await.unwrap();

    let detail = ctx
        .db
        .create_candidate(
            CreateCandidate {
                name: "Grace".into(),
                email: "grace@applicants.test".into(),
                phone: String::new(),
                role: "Backend".into(),
                skills: "rust".into(),
                resume_filename: String::new(),
                resume_original_name: String::new(),
            },
            user.id,
            &scope,
        )
        .await
        .unwrap();
    let candidate = detail.candidate;

    let comment = ctx
        .db
        .create_comment(candidate.id, "strong systems background", user.id, &scope)
        .await
        .unwrap();

    let detail = ctx.db.get_candidate(candidate.id, &scope).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert!(detail.candidate.updated_at > candidate.updated_at);

    ctx.db
        .delete_comment(
            candidate.id,
            comment.id,
            &scope,
            crewdex::types::scope::Role::Solo,
            user.id,
        )
        .await
        .unwrap();
    let detail = ctx.db.get_candidate(candidate.id, &scope).await.unwrap();
    assert!(detail.comments.is_empty());
}

#[tokio::test]
async fn test_todo_completion_transitions() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("planner").await;
    let (company, _) = ctx
        .seed_company_with_contact(user.id, "Todo Co", "Tess")
        .await;
    let scope = ctx.db.scope_of(user.id).await.unwrap();

    let todo = ctx
        .db
        .create_todo(
            CreateTodo {
                title: "follow up".into(),
                description: String::new(),
                due_date: None,
                linked_kind: LinkedKind::Company,
                linked_id: company.id,
            },
            user.id,
            &scope,
        )
        .await
        .unwrap();
    assert!(!todo.completed);
    assert!(todo.completed_at.is_none());

    let done = ctx
        .db
        .update_todo(
            todo.id,
            UpdateTodo {
                completed: Some(true),
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();
    assert!(done.completed);
    assert!(done.completed_at.is_some());

    // Reopening clears the completion timestamp.
    let reopened = ctx
        .db
        .update_todo(
            todo.id,
            UpdateTodo {
                completed: Some(false),
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();
    assert!(!reopened.completed);
    assert!(reopened.completed_at.is_none());

    // An explicit null clears the due date; an absent field leaves it alone.
    let due = chrono::Utc::now() + chrono::Duration::days(7);
    let dated = ctx
        .db
        .update_todo(
            todo.id,
            UpdateTodo {
                due_date: Some(Some(due)),
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();
    assert!(dated.due_date.is_some());

    let untouched = ctx
        .db
        .update_todo(
            todo.id,
            UpdateTodo {
                description: Some("ping again".into()),
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();
    assert_eq!(untouched.due_date, dated.due_date);

    let cleared = ctx
        .db
        .update_todo(
            todo.id,
            UpdateTodo {
                due_date: Some(None),
                ..Default::default()
            },
            &scope,
        )
        .await
        .unwrap();
    assert!(cleared.due_date.is_none());

    let active = ctx.db.list_todos(&scope, TodoFilter::Active).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].linked_name, "Todo Co");
    let completed = ctx
        .db
        .list_todos(&scope, TodoFilter::Completed)
        .await
        .unwrap();
    assert!(completed.is_empty());
}
