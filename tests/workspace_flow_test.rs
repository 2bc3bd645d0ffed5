// Workspace lifecycle against the database layer directly: role derivation,
// ownership transfer, leaving and removal.

use crewdex::types::error::AppError;
use crewdex::types::scope::{Role, Scope};

mod common;
use common::TestContext;

#[tokio::test]
async fn test_new_user_starts_solo() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("solo").await;

    assert_eq!(ctx.db.scope_of(user.id).await.unwrap(), Scope::Solo(user.id));
    assert_eq!(ctx.db.role_of(user.id).await.unwrap(), Role::Solo);

    let view = ctx.db.workspace_view(user.id).await.unwrap();
    assert!(view.team.is_none());
    assert_eq!(view.role, Role::Solo);
    assert!(view.members.is_empty());
    assert!(view.invitations.is_empty());
}

#[tokio::test]
async fn test_first_invite_creates_workspace_and_restamps_solo_rows() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;

    let (company, _contact) = ctx
        .seed_company_with_contact(owner.id, "Acme", "Alice")
        .await;

    let invitation = ctx.db.invite(owner.id, &invitee.email).await.unwrap();

    // The inviter is now the owner of a fresh workspace.
    assert_eq!(ctx.db.role_of(owner.id).await.unwrap(), Role::Owner);
    let scope = ctx.db.scope_of(owner.id).await.unwrap();
    let ws_id = match scope {
        Scope::Workspace(id) => id,
        Scope::Solo(_) => panic!("inviter should be workspace-scoped after inviting"),
    };
    assert_eq!(invitation.workspace_id, ws_id);

    // Pre-existing solo rows moved into the workspace with the user.
    let detail = ctx.db.get_company(company.id, &scope).await.unwrap();
    assert_eq!(detail.company.workspace_id, Some(ws_id));
    assert_eq!(detail.contacts.len(), 1);

    let ws = ctx.db.get_workspace(ws_id).await.unwrap();
    assert_eq!(ws.owner_id, owner.id);
    assert!(ws.name.contains(&owner.username));
}

#[tokio::test]
async fn test_owner_sees_pending_invitations_members_do_not() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;
    let outsider = ctx.create_user("outsider").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();
    ctx.db.invite(owner.id, &outsider.email).await.unwrap();

    let owner_view = ctx.db.workspace_view(owner.id).await.unwrap();
    assert_eq!(owner_view.role, Role::Owner);
    assert_eq!(owner_view.members.len(), 2);
    assert_eq!(owner_view.invitations.len(), 1);

    let member_view = ctx.db.workspace_view(member.id).await.unwrap();
    assert_eq!(member_view.role, Role::Member);
    assert_eq!(member_view.members.len(), 2);
    assert!(member_view.invitations.is_empty());
}

#[tokio::test]
async fn test_ownership_transfer_flips_roles() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    // A member cannot transfer ownership.
    let err = ctx
        .db
        .transfer_ownership(member.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    ctx.db.transfer_ownership(owner.id, member.id).await.unwrap();

    // Role is derived from the workspace row, so it flips immediately.
    assert_eq!(ctx.db.role_of(owner.id).await.unwrap(), Role::Member);
    assert_eq!(ctx.db.role_of(member.id).await.unwrap(), Role::Owner);

    // The old owner, now a mere member, is subject to member rules again.
    let err = ctx
        .db
        .transfer_ownership(owner.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_transfer_requires_target_membership() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;
    let outsider = ctx.create_user("outsider").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    let err = ctx
        .db
        .transfer_ownership(owner.id, outsider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_owner_must_transfer_before_leaving() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    let err = ctx.db.leave_workspace(owner.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    ctx.db.transfer_ownership(owner.id, member.id).await.unwrap();
    ctx.db.leave_workspace(owner.id).await.unwrap();

    assert_eq!(ctx.db.role_of(owner.id).await.unwrap(), Role::Solo);
    assert_eq!(ctx.db.role_of(member.id).await.unwrap(), Role::Owner);
}

#[tokio::test]
async fn test_solo_user_cannot_leave() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("solo").await;

    let err = ctx.db.leave_workspace(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_departed_member_rows_stay_with_the_team() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    let (company, _) = ctx
        .seed_company_with_contact(member.id, "Members Co", "Bob")
        .await;

    ctx.db.leave_workspace(member.id).await.unwrap();

    // The workspace keeps the rows; the former member lost sight of them.
    let owner_scope = ctx.db.scope_of(owner.id).await.unwrap();
    assert!(ctx.db.get_company(company.id, &owner_scope).await.is_ok());

    let member_scope = ctx.db.scope_of(member.id).await.unwrap();
    let err = ctx
        .db
        .get_company(company.id, &member_scope)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_member_removal_rules() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;
    let outsider = ctx.create_user("outsider").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    // Owner cannot remove themselves.
    let err = ctx.db.remove_member(owner.id, owner.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Members cannot remove anyone, themselves included.
    let err = ctx.db.remove_member(member.id, owner.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let err = ctx.db.remove_member(member.id, member.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // A non-member target reads as absent.
    let err = ctx
        .db
        .remove_member(owner.id, outsider.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    ctx.db.remove_member(owner.id, member.id).await.unwrap();
    assert_eq!(ctx.db.role_of(member.id).await.unwrap(), Role::Solo);

    let view = ctx.db.workspace_view(owner.id).await.unwrap();
    assert_eq!(view.members.len(), 1);
}
