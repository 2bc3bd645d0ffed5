// Invitation lifecycle: issuing, the merge/fresh-start choice on accept,
// and the pending-only terminal transitions.

use crewdex::types::error::AppError;
use crewdex::types::scope::Role;
use entity::invitation::InvitationStatus;

mod common;
use common::TestContext;

#[tokio::test]
async fn test_invite_is_pending_and_lowercased() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;

    let invitation = ctx
        .db
        .invite(owner.id, &invitee.email.to_uppercase())
        .await
        .unwrap();
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.email, invitee.email);
    assert_eq!(invitation.invited_by, owner.id);

    let mine = ctx.db.invitations_for_user(invitee.id).await.unwrap();
    assert_eq!(mine.invitations.len(), 1);
    assert_eq!(mine.invitations[0].id, invitation.id);
    assert!(!mine.has_solo_data);
}

#[tokio::test]
async fn test_self_invite_rejected() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;

    let err = ctx.db.invite(owner.id, &owner.email).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    // No workspace was created along the way.
    assert_eq!(ctx.db.role_of(owner.id).await.unwrap(), Role::Solo);
}

#[tokio::test]
async fn test_duplicate_pending_invite_rejected() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;

    ctx.db.invite(owner.id, &invitee.email).await.unwrap();
    let err = ctx.db.invite(owner.id, &invitee.email).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_declined_invite_can_be_reissued() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;

    let first = ctx.db.invite(owner.id, &invitee.email).await.unwrap();
    ctx.db
        .decline_invitation(first.id, invitee.id)
        .await
        .unwrap();

    // Only pending invitations block reissue.
    let second = ctx.db.invite(owner.id, &invitee.email).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(second.status, InvitationStatus::Pending);
}

#[tokio::test]
async fn test_member_cannot_invite() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;
    let outsider = ctx.create_user("outsider").await;

    let invitation = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, member.id, true)
        .await
        .unwrap();

    let err = ctx.db.invite(member.id, &outsider.email).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_accept_with_merge_carries_solo_data_in() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;

    let (company, contact) = ctx
        .seed_company_with_contact(invitee.id, "Brought Along", "Carol")
        .await;

    let mine = ctx.db.invitations_for_user(invitee.id).await.unwrap();
    assert!(mine.has_solo_data);

    let invitation = ctx.db.invite(owner.id, &invitee.email).await.unwrap();
    let ws_id = ctx
        .db
        .accept_invitation(invitation.id, invitee.id, true)
        .await
        .unwrap();

    assert_eq!(ctx.db.role_of(invitee.id).await.unwrap(), Role::Member);

    // Everyone in the workspace now sees the merged rows.
    let owner_scope = ctx.db.scope_of(owner.id).await.unwrap();
    let detail = ctx.db.get_company(company.id, &owner_scope).await.unwrap();
    assert_eq!(detail.company.workspace_id, Some(ws_id));
    assert_eq!(detail.contacts[0].id, contact.id);

    // Authorship survives the re-stamp.
    assert_eq!(detail.company.created_by, invitee.id);
}

#[tokio::test]
async fn test_accept_fresh_start_purges_solo_data() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;

    let (company, _) = ctx
        .seed_company_with_contact(invitee.id, "Left Behind", "Dave")
        .await;

    let invitation = ctx.db.invite(owner.id, &invitee.email).await.unwrap();
    ctx.db
        .accept_invitation(invitation.id, invitee.id, false)
        .await
        .unwrap();

    // The rows are gone from every vantage point.
    let owner_scope = ctx.db.scope_of(owner.id).await.unwrap();
    let err = ctx
        .db
        .get_company(company.id, &owner_scope)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let member_scope = ctx.db.scope_of(invitee.id).await.unwrap();
    let err = ctx
        .db
        .get_company(company.id, &member_scope)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_accept_requires_matching_email() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;
    let impostor = ctx.create_user("impostor").await;

    let invitation = ctx.db.invite(owner.id, &invitee.email).await.unwrap();

    let err = ctx
        .db
        .accept_invitation(invitation.id, impostor.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Still pending for the rightful addressee.
    let invitation = ctx.db.get_invitation(invitation.id).await.unwrap();
    assert_eq!(invitation.status, InvitationStatus::Pending);
}

#[tokio::test]
async fn test_accept_while_already_teamed_rejected() {
    let ctx = TestContext::new().await;
    let owner_a = ctx.create_user("owner-a").await;
    let owner_b = ctx.create_user("owner-b").await;
    let invitee = ctx.create_user("invitee").await;

    let inv_a = ctx.db.invite(owner_a.id, &invitee.email).await.unwrap();
    let inv_b = ctx.db.invite(owner_b.id, &invitee.email).await.unwrap();

    ctx.db
        .accept_invitation(inv_a.id, invitee.id, true)
        .await
        .unwrap();

    let err = ctx
        .db
        .accept_invitation(inv_b.id, invitee.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_terminal_invitation_cannot_be_resolved_again() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let invitee = ctx.create_user("invitee").await;

    let invitation = ctx.db.invite(owner.id, &invitee.email).await.unwrap();
    ctx.db
        .decline_invitation(invitation.id, invitee.id)
        .await
        .unwrap();

    let err = ctx
        .db
        .accept_invitation(invitation.id, invitee.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = ctx
        .db
        .decline_invitation(invitation.id, invitee.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = ctx
        .db
        .cancel_invitation(invitation.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The declined user never joined.
    assert_eq!(ctx.db.role_of(invitee.id).await.unwrap(), Role::Solo);
}

#[tokio::test]
async fn test_cancel_is_owner_only() {
    let ctx = TestContext::new().await;
    let owner = ctx.create_user("owner").await;
    let member = ctx.create_user("member").await;
    let invitee = ctx.create_user("invitee").await;

    let to_member = ctx.db.invite(owner.id, &member.email).await.unwrap();
    ctx.db
        .accept_invitation(to_member.id, member.id, true)
        .await
        .unwrap();

    let invitation = ctx.db.invite(owner.id, &invitee.email).await.unwrap();

    let err = ctx
        .db
        .cancel_invitation(invitation.id, member.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    ctx.db
        .cancel_invitation(invitation.id, owner.id)
        .await
        .unwrap();
    let invitation = ctx.db.get_invitation(invitation.id).await.unwrap();
    assert_eq!(invitation.status, InvitationStatus::Cancelled);

    // Cancelled invitations stop showing up for the addressee.
    let mine = ctx.db.invitations_for_user(invitee.id).await.unwrap();
    assert!(mine.invitations.is_empty());
}
