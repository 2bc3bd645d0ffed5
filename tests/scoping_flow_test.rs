// Tenant isolation and in-scope integrity: out-of-scope rows read as
// absent, parent links resolve inside the caller's scope, and member
// deletes are limited to their own rows.

use crewdex::types::contact::{ContactSort, CreateContact};
use crewdex::types::error::AppError;
use crewdex::types::scope::Role;
use crewdex::types::todo::CreateTodo;
use entity::todo::LinkedKind;

mod common;
use common::TestContext;

#[tokio::test]
async fn test_solo_users_cannot_see_each_other() {
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice").await;
    let bob = ctx.create_user("bob").await;

    let (company, _) = ctx
        .seed_company_with_contact(alice.id, "Alice Co", "Ann")
        .await;

    let bob_scope = ctx.db.scope_of(bob.id).await.unwrap();
    assert!(ctx.db.list_companies(&bob_scope).await.unwrap().is_empty());

    // Out-of-scope reads as nonexistent, not as forbidden.
    let err = ctx.db.get_company(company.id, &bob_scope).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = ctx
        .db
        .delete_company(company.id, &bob_scope, Role::Solo, bob.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_workspace_rows_visible_to_all_members() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    let (company, _) = ctx
        .seed_company_with_contact(owner.id, "Shared Co", "Sam")
        .await;

    let member_scope = ctx.db.scope_of(member.id).await.unwrap();
    let detail = ctx.db.get_company(company.id, &member_scope).await.unwrap();
    assert_eq!(detail.company.name, "Shared Co");
}

#[tokio::test]
async fn test_member_deletes_only_own_rows() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    let (owners_company, _) = ctx
        .seed_company_with_contact(owner.id, "Owners Co", "Olive")
        .await;
    let (members_company, _) = ctx
        .seed_company_with_contact(member.id, "Members Co", "Milo")
        .await;

    let scope = ctx.db.scope_of(member.id).await.unwrap();

    let err = ctx
        .db
        .delete_company(owners_company.id, &scope, Role::Member, member.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    ctx.db
        .delete_company(members_company.id, &scope, Role::Member, member.id)
        .await
        .unwrap();

    // The owner deletes anything in the workspace, regardless of author.
    let (members_second, _) = ctx
        .seed_company_with_contact(member.id, "Members Second", "Mia")
        .await;
    ctx.db
        .delete_company(members_second.id, &scope, Role::Owner, owner.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_parent_links_resolve_in_scope() {
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice").await;
    let bob = ctx.create_user("bob").await;

    let (alice_company, alice_contact) = ctx
        .seed_company_with_contact(alice.id, "Alice Co", "Ann")
        .await;

    let bob_scope = ctx.db.scope_of(bob.id).await.unwrap();

    // Contact pointing at a foreign company.
    let err = ctx
        .db
        .create_contact(
            CreateContact {
                company_id: alice_company.id,
                name: "Sneaky".into(),
                role: String::new(),
                department: String::new(),
                description: String::new(),
                email: String::new(),
                phone: String::new(),
            },
            bob.id,
            &bob_scope,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Note under a foreign contact.
    let err = ctx
        .db
        .create_note(alice_contact.id, "peeking", bob.id, &bob_scope)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Todo linked to a foreign company.
    let err = ctx
        .db
        .create_todo(
            CreateTodo {
                title: "call them".into(),
                description: String::new(),
                due_date: None,
                linked_kind: LinkedKind::Company,
                linked_id: alice_company.id,
            },
            bob.id,
            &bob_scope,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_note_bumps_contact_and_company_freshness() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("writer").await;

    let (company, contact) = ctx
        .seed_company_with_contact(user.id, "Fresh Co", "Fred")
        .await;
    let scope = ctx.db.scope_of(user.id).await.unwrap();

    let company_before = ctx.db.get_company(company.id, &scope).await.unwrap();
    let contact_before = ctx.db.get_contact(contact.id, &scope).await.unwrap();

    ctx.db
        .create_note(contact.id, "met at the fair", user.id, &scope)
        .await
        .unwrap();

    let company_after = ctx.db.get_company(company.id, &scope).await.unwrap();
    let contact_after = ctx.db.get_contact(contact.id, &scope).await.unwrap();
    assert!(company_after.company.updated_at > company_before.company.updated_at);
    assert!(contact_after.contact.updated_at > contact_before.contact.updated_at);

    // The note date feeds the contact listing.
    let listed = ctx
        .db
        .list_contacts(&scope, ContactSort::LastNote)
        .await
        .unwrap();
    assert!(listed[0].last_note_date.is_some());
}

#[tokio::test]
async fn test_search_is_scope_filtered() {
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice").await;
    let bob = ctx.create_user("bob").await;

    ctx.seed_company_with_contact(alice.id, "Widget Works", "Wendy")
        .await;
    ctx.seed_company_with_contact(bob.id, "Widget World", "Walt")
        .await;

    let alice_scope = ctx.db.scope_of(alice.id).await.unwrap();
    let results = ctx.db.search(&alice_scope, "widget").await.unwrap();
    assert_eq!(results.companies.len(), 1);
    assert_eq!(results.companies[0].company.name, "Widget Works");

    let bob_scope = ctx.db.scope_of(bob.id).await.unwrap();
    let results = ctx.db.search(&bob_scope, "widget").await.unwrap();
    assert_eq!(results.companies.len(), 1);
    assert_eq!(results.companies[0].company.name, "Widget World");
}

#[tokio::test]
async fn test_search_matches_contacts_case_insensitively() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("searcher").await;

    ctx.seed_company_with_contact(user.id, "Globex", "Wendy")
        .await;
    let scope = ctx.db.scope_of(user.id).await.unwrap();

    // Query case differs from the stored contact name in both directions.
    let results = ctx.db.search(&scope, "wendy").await.unwrap();
    assert_eq!(results.contacts.len(), 1);
    assert_eq!(results.contacts[0].contact.name, "Wendy");

    let results = ctx.db.search(&scope, "WENDY").await.unwrap();
    assert_eq!(results.contacts.len(), 1);

    // A company-name hit surfaces its contacts too.
    let results = ctx.db.search(&scope, "globex").await.unwrap();
    assert_eq!(results.contacts.len(), 1);
    assert_eq!(results.companies.len(), 1);
}
