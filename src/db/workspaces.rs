use crate::db::postgres_service::PostgresService;
use crate::db::scoped::adopt_solo_data;
use crate::types::error::AppError;
use crate::types::scope::{Role, Scope};
use crate::types::team::WorkspaceView;
use crate::types::user::MemberView;
use crate::utils::token::new_id;
use chrono::Utc;
use entity::membership::{ActiveModel as MembershipActive, Entity as Membership};
use entity::user::{ActiveModel as UserActive, Entity as User, Model as UserModel};
use entity::workspace::{ActiveModel as WorkspaceActive, Entity as Workspace, Model as WorkspaceModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

impl PostgresService {
    /// The single place a user id turns into a scope. Handlers call this
    /// once per request and pass the result down.
    pub async fn scope_of(&self, user_id: Uuid) -> Result<Scope, AppError> {
        let user = self.get_user_by_id(&user_id).await?;
        Ok(match user.workspace_id {
            Some(ws) => Scope::Workspace(ws),
            None => Scope::Solo(user_id),
        })
    }

    /// Pure read of current workspace state. Never cached; after an
    /// ownership transfer the next call already answers with the new roles.
    pub async fn role_of(&self, user_id: Uuid) -> Result<Role, AppError> {
        Self::role_of_in(&self.db, user_id).await
    }

    pub(crate) async fn role_of_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> Result<Role, AppError> {
        let user = User::find_by_id(user_id)
            .one(conn)
            .await?
            .ok_or(AppError::NotFound)?;
        let Some(ws_id) = user.workspace_id else {
            return Ok(Role::Solo);
        };
        let ws = Workspace::find_by_id(ws_id)
            .one(conn)
            .await?
            .ok_or(AppError::NotFound)?;
        if ws.owner_id == user_id {
            Ok(Role::Owner)
        } else {
            Ok(Role::Member)
        }
    }

    pub async fn get_workspace(&self, id: Uuid) -> Result<WorkspaceModel, AppError> {
        Workspace::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Workspace bootstrap: workspace row, owner membership, workspace
    /// pointer and the solo-data sweep, all under the caller's transaction
    /// so a half-migrated state can never be observed.
    pub(crate) async fn create_workspace_in<C: ConnectionTrait>(
        conn: &C,
        owner: &UserModel,
    ) -> Result<WorkspaceModel, AppError> {
        if owner.workspace_id.is_some() {
            return Err(AppError::Validation("already in a workspace".into()));
        }

        let now = Utc::now();
        let ws = WorkspaceActive {
            id: Set(new_id()),
            name: Set(format!("{}'s workspace", owner.username)),
            owner_id: Set(owner.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;

        MembershipActive {
            workspace_id: Set(ws.id),
            user_id: Set(owner.id),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;

        let mut am: UserActive = owner.clone().into();
        am.workspace_id = Set(Some(ws.id));
        am.updated_at = Set(now);
        am.update(conn).await?;

        adopt_solo_data(conn, owner.id, ws.id).await?;

        Ok(ws)
    }

    pub async fn create_workspace(&self, owner_id: Uuid) -> Result<WorkspaceModel, AppError> {
        let txn = self.db.begin().await?;
        let owner = User::find_by_id(owner_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let ws = Self::create_workspace_in(&txn, &owner).await?;
        txn.commit().await?;
        Ok(ws)
    }

    pub async fn workspace_members(&self, workspace_id: Uuid) -> Result<Vec<MemberView>, AppError> {
        let rows = Membership::find()
            .filter(entity::membership::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(entity::membership::Column::CreatedAt)
            .find_also_related(User)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(m, user)| {
                user.map(|u| MemberView {
                    id: u.id,
                    username: u.username,
                    email: u.email,
                    joined_at: m.created_at,
                })
            })
            .collect())
    }

    /// Changes only the owner pointer; the previous owner's demotion to
    /// member falls out of role derivation.
    pub async fn transfer_ownership(
        &self,
        acting_user: Uuid,
        new_owner_id: Uuid,
    ) -> Result<(), AppError> {
        if self.role_of(acting_user).await? != Role::Owner {
            return Err(AppError::Forbidden);
        }
        let actor = self.get_user_by_id(&acting_user).await?;
        let ws_id = actor
            .workspace_id
            .ok_or_else(|| AppError::Internal("owner without workspace pointer".into()))?;

        let target = self.get_user_by_id(&new_owner_id).await?;
        if target.workspace_id != Some(ws_id) {
            return Err(AppError::Conflict("new owner is not a member".into()));
        }

        let ws = self.get_workspace(ws_id).await?;
        let mut am: WorkspaceActive = ws.into();
        am.owner_id = Set(new_owner_id);
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await?;
        Ok(())
    }

    /// Member departure. Rows they created while in the workspace stay
    /// workspace-scoped; team data outlives membership.
    pub async fn leave_workspace(&self, user_id: Uuid) -> Result<(), AppError> {
        match self.role_of(user_id).await? {
            Role::Solo => Err(AppError::Validation("not in a workspace".into())),
            Role::Owner => Err(AppError::Validation(
                "owner must transfer ownership before leaving".into(),
            )),
            Role::Member => {
                let user = self.get_user_by_id(&user_id).await?;
                let ws_id = user
                    .workspace_id
                    .ok_or_else(|| AppError::Internal("member without workspace pointer".into()))?;
                self.detach_member(ws_id, user_id).await
            }
        }
    }

    /// Owner-only removal of another member. The owner themself can't be
    /// removed; transfer first.
    pub async fn remove_member(&self, acting_user: Uuid, member_id: Uuid) -> Result<(), AppError> {
        if self.role_of(acting_user).await? != Role::Owner {
            return Err(AppError::Forbidden);
        }
        if acting_user == member_id {
            return Err(AppError::Validation(
                "owner cannot remove themselves, transfer ownership first".into(),
            ));
        }
        let actor = self.get_user_by_id(&acting_user).await?;
        let ws_id = actor
            .workspace_id
            .ok_or_else(|| AppError::Internal("owner without workspace pointer".into()))?;

        let target = self.get_user_by_id(&member_id).await?;
        if target.workspace_id != Some(ws_id) {
            return Err(AppError::NotFound);
        }
        self.detach_member(ws_id, member_id).await
    }

    /// Membership row and workspace pointer always move together.
    async fn detach_member(&self, workspace_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        Membership::delete_many()
            .filter(entity::membership::Column::WorkspaceId.eq(workspace_id))
            .filter(entity::membership::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        let user = User::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let mut am: UserActive = user.into();
        am.workspace_id = Set(None);
        am.updated_at = Set(Utc::now());
        am.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    pub async fn workspace_view(&self, user_id: Uuid) -> Result<WorkspaceView, AppError> {
        let user = self.get_user_by_id(&user_id).await?;
        let Some(ws_id) = user.workspace_id else {
            return Ok(WorkspaceView {
                team: None,
                role: Role::Solo,
                members: vec![],
                invitations: vec![],
            });
        };

        let ws = self.get_workspace(ws_id).await?;
        let role = if ws.owner_id == user_id {
            Role::Owner
        } else {
            Role::Member
        };
        let members = self.workspace_members(ws_id).await?;
        let invitations = if role == Role::Owner {
            self.pending_invitations_for_workspace(ws_id).await?
        } else {
            vec![]
        };

        Ok(WorkspaceView {
            team: Some(ws),
            role,
            members,
            invitations,
        })
    }
}
