use crate::db::postgres_service::PostgresService;
use crate::db::scoped::{adopt_solo_data, has_solo_data, purge_solo_data};
use crate::types::error::AppError;
use crate::types::invite::MyInvitations;
use crate::types::scope::Role;
use crate::utils::token::new_id;
use chrono::Utc;
use entity::invitation::{
    ActiveModel as InvitationActive, Column, Entity as Invitation, InvitationStatus,
    Model as InvitationModel,
};
use entity::membership::ActiveModel as MembershipActive;
use entity::user::{ActiveModel as UserActive, Entity as User};
use entity::workspace::Entity as Workspace;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

impl PostgresService {
    pub async fn get_invitation(&self, id: Uuid) -> Result<InvitationModel, AppError> {
        Invitation::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn pending_invitations_for_workspace(
        &self,
        workspace_id: Uuid,
    ) -> Result<Vec<InvitationModel>, AppError> {
        Ok(Invitation::find()
            .filter(Column::WorkspaceId.eq(workspace_id))
            .filter(Column::Status.eq(InvitationStatus::Pending))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Pending invitations addressed to the caller, plus the solo-data
    /// probe the client needs to render the merge/fresh-start choice.
    pub async fn invitations_for_user(&self, user_id: Uuid) -> Result<MyInvitations, AppError> {
        let user = self.get_user_by_id(&user_id).await?;
        let invitations = Invitation::find()
            .filter(Column::Email.eq(user.email))
            .filter(Column::Status.eq(InvitationStatus::Pending))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await?;
        let has_solo = has_solo_data(&self.db, user_id).await?;
        Ok(MyInvitations {
            invitations,
            has_solo_data: has_solo,
        })
    }

    /// Owner (or solo user, whose workspace is created here on the spot)
    /// invites an email address into their workspace.
    pub async fn invite(&self, inviter_id: Uuid, email: &str) -> Result<InvitationModel, AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::Validation("email is required".into()));
        }

        let txn = self.db.begin().await?;

        let inviter = User::find_by_id(inviter_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        if inviter.email == email {
            txn.rollback().await?;
            return Err(AppError::Validation("you cannot invite yourself".into()));
        }

        let workspace_id = match Self::role_of_in(&txn, inviter_id).await? {
            Role::Member => {
                txn.rollback().await?;
                return Err(AppError::Forbidden);
            }
            Role::Owner => inviter
                .workspace_id
                .ok_or_else(|| AppError::Internal("owner without workspace pointer".into()))?,
            // First invite from a solo user creates their workspace, in the
            // same transaction as the invitation itself.
            Role::Solo => Self::create_workspace_in(&txn, &inviter).await?.id,
        };

        let already_pending = Invitation::find()
            .filter(Column::WorkspaceId.eq(workspace_id))
            .filter(Column::Email.eq(email.clone()))
            .filter(Column::Status.eq(InvitationStatus::Pending))
            .count(&txn)
            .await?
            > 0;
        if already_pending {
            txn.rollback().await?;
            return Err(AppError::Validation(
                "an invitation is already pending for this email".into(),
            ));
        }

        let now = Utc::now();
        let inserted = InvitationActive {
            id: Set(new_id()),
            workspace_id: Set(workspace_id),
            invited_by: Set(inviter_id),
            email: Set(email),
            status: Set(InvitationStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await;

        let invitation = match inserted {
            Ok(inv) => inv,
            Err(err) => {
                txn.rollback().await?;
                // The partial unique index backs up the pending check under
                // concurrent invites.
                return match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Validation(
                        "an invitation is already pending for this email".into(),
                    )),
                    _ => Err(err.into()),
                };
            }
        };

        txn.commit().await?;
        Ok(invitation)
    }

    /// Flip `pending -> status` only if the row is still pending. Running
    /// inside the caller's transaction, this is what makes two concurrent
    /// accepts resolve to exactly one winner.
    async fn resolve_invitation<C: ConnectionTrait>(
        conn: &C,
        invitation_id: Uuid,
        status: InvitationStatus,
    ) -> Result<(), AppError> {
        let res = Invitation::update_many()
            .col_expr(Column::Status, Expr::value(status))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(invitation_id))
            .filter(Column::Status.eq(InvitationStatus::Pending))
            .exec(conn)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::Conflict("invitation is no longer pending".into()));
        }
        Ok(())
    }

    /// Accept and resolve the merge/fresh-start choice in one transaction:
    /// status flip, data sweep, membership insert and workspace pointer all
    /// commit together or not at all.
    pub async fn accept_invitation(
        &self,
        invitation_id: Uuid,
        user_id: Uuid,
        merge_data: bool,
    ) -> Result<Uuid, AppError> {
        let txn = self.db.begin().await?;

        let invitation = Invitation::find_by_id(invitation_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let user = User::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        if user.email != invitation.email {
            txn.rollback().await?;
            return Err(AppError::Conflict(
                "invitation was issued to a different email".into(),
            ));
        }
        if user.workspace_id.is_some() {
            txn.rollback().await?;
            return Err(AppError::Validation(
                "leave your current workspace before accepting an invitation".into(),
            ));
        }

        Self::resolve_invitation(&txn, invitation_id, InvitationStatus::Accepted).await?;

        if merge_data {
            adopt_solo_data(&txn, user_id, invitation.workspace_id).await?;
        } else {
            purge_solo_data(&txn, user_id).await?;
        }

        MembershipActive {
            workspace_id: Set(invitation.workspace_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        let mut am: UserActive = user.into();
        am.workspace_id = Set(Some(invitation.workspace_id));
        am.updated_at = Set(Utc::now());
        am.update(&txn).await?;

        txn.commit().await?;
        Ok(invitation.workspace_id)
    }

    /// No data side effects; just a terminal flip.
    pub async fn decline_invitation(
        &self,
        invitation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        let invitation = Invitation::find_by_id(invitation_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let user = User::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        if user.email != invitation.email {
            txn.rollback().await?;
            return Err(AppError::Conflict(
                "invitation was issued to a different email".into(),
            ));
        }

        Self::resolve_invitation(&txn, invitation_id, InvitationStatus::Declined).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Only the workspace owner may cancel an outstanding invitation.
    pub async fn cancel_invitation(
        &self,
        invitation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        let invitation = Invitation::find_by_id(invitation_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let workspace = Workspace::find_by_id(invitation.workspace_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        if workspace.owner_id != user_id {
            txn.rollback().await?;
            return Err(AppError::Forbidden);
        }

        Self::resolve_invitation(&txn, invitation_id, InvitationStatus::Cancelled).await?;
        txn.commit().await?;
        Ok(())
    }
}
