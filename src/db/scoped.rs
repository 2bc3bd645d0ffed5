use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::types::error::AppError;
use crate::types::scope::Scope;

/// The one scoping implementation shared by all six CRM entity kinds.
///
/// Each kind exposes its scope pair (`workspace_id`, `created_by`) plus id
/// and freshness columns. The visibility filters and the solo-data sweeps
/// used when a user joins a workspace are written once against this trait.
pub trait ScopedEntity: EntityTrait {
    fn id_column() -> Self::Column;
    fn workspace_column() -> Self::Column;
    fn created_by_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
}

macro_rules! impl_scoped {
    ($module:ident) => {
        impl ScopedEntity for entity::$module::Entity {
            fn id_column() -> Self::Column {
                entity::$module::Column::Id
            }
            fn workspace_column() -> Self::Column {
                entity::$module::Column::WorkspaceId
            }
            fn created_by_column() -> Self::Column {
                entity::$module::Column::CreatedBy
            }
            fn updated_at_column() -> Self::Column {
                entity::$module::Column::UpdatedAt
            }
        }
    };
}

impl_scoped!(company);
impl_scoped!(contact);
impl_scoped!(note);
impl_scoped!(todo);
impl_scoped!(candidate);
impl_scoped!(candidate_comment);

/// `workspace_id = X` for team scopes, `created_by = u AND workspace_id IS
/// NULL` for solo.
pub fn scope_condition<E: ScopedEntity>(scope: &Scope) -> Condition {
    match scope {
        Scope::Workspace(ws) => Condition::all().add(E::workspace_column().eq(*ws)),
        Scope::Solo(user) => Condition::all()
            .add(E::workspace_column().is_null())
            .add(E::created_by_column().eq(*user)),
    }
}

/// A row outside the scope is reported exactly like a missing row, so
/// callers can't probe for other tenants' ids.
pub async fn find_in_scope<E, C>(conn: &C, id: Uuid, scope: &Scope) -> Result<E::Model, AppError>
where
    E: ScopedEntity,
    C: ConnectionTrait,
{
    E::find()
        .filter(E::id_column().eq(id))
        .filter(scope_condition::<E>(scope))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_in_scope<E, C>(conn: &C, scope: &Scope) -> Result<Vec<E::Model>, AppError>
where
    E: ScopedEntity,
    C: ConnectionTrait,
{
    Ok(E::find()
        .filter(scope_condition::<E>(scope))
        .all(conn)
        .await?)
}

/// Freshness signal: parent rows surface "most recently active" ordering,
/// so child mutations bump them.
pub async fn bump_updated_at<E, C>(conn: &C, id: Uuid) -> Result<(), AppError>
where
    E: ScopedEntity,
    C: ConnectionTrait,
{
    E::update_many()
        .col_expr(E::updated_at_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn restamp_solo_rows<E, C>(
    conn: &C,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<u64, AppError>
where
    E: ScopedEntity,
    C: ConnectionTrait,
{
    let res = E::update_many()
        .col_expr(E::workspace_column(), Expr::value(workspace_id))
        .filter(E::workspace_column().is_null())
        .filter(E::created_by_column().eq(user_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

async fn purge_solo_rows<E, C>(conn: &C, user_id: Uuid) -> Result<u64, AppError>
where
    E: ScopedEntity,
    C: ConnectionTrait,
{
    let res = E::delete_many()
        .filter(E::workspace_column().is_null())
        .filter(E::created_by_column().eq(user_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

async fn count_solo_rows<E, C>(conn: &C, user_id: Uuid) -> Result<u64, AppError>
where
    E: ScopedEntity,
    E::Model: Sync,
    C: ConnectionTrait,
{
    Ok(E::find()
        .filter(E::workspace_column().is_null())
        .filter(E::created_by_column().eq(user_id))
        .count(conn)
        .await?)
}

/// The merge sweep: every solo row the user created, across every entity
/// kind, becomes workspace data. Callers run this inside the same
/// transaction as the membership change.
pub async fn adopt_solo_data<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<u64, AppError> {
    let mut moved = 0;
    moved += restamp_solo_rows::<entity::company::Entity, _>(conn, user_id, workspace_id).await?;
    moved += restamp_solo_rows::<entity::contact::Entity, _>(conn, user_id, workspace_id).await?;
    moved += restamp_solo_rows::<entity::note::Entity, _>(conn, user_id, workspace_id).await?;
    moved += restamp_solo_rows::<entity::todo::Entity, _>(conn, user_id, workspace_id).await?;
    moved += restamp_solo_rows::<entity::candidate::Entity, _>(conn, user_id, workspace_id).await?;
    moved +=
        restamp_solo_rows::<entity::candidate_comment::Entity, _>(conn, user_id, workspace_id)
            .await?;
    Ok(moved)
}

/// The fresh-start sweep: children first so FK cascades never race the
/// parent deletes.
pub async fn purge_solo_data<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<u64, AppError> {
    let mut dropped = 0;
    dropped += purge_solo_rows::<entity::candidate_comment::Entity, _>(conn, user_id).await?;
    dropped += purge_solo_rows::<entity::note::Entity, _>(conn, user_id).await?;
    dropped += purge_solo_rows::<entity::todo::Entity, _>(conn, user_id).await?;
    dropped += purge_solo_rows::<entity::contact::Entity, _>(conn, user_id).await?;
    dropped += purge_solo_rows::<entity::candidate::Entity, _>(conn, user_id).await?;
    dropped += purge_solo_rows::<entity::company::Entity, _>(conn, user_id).await?;
    Ok(dropped)
}

pub async fn has_solo_data<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<bool, AppError> {
    Ok(count_solo_rows::<entity::company::Entity, _>(conn, user_id).await? > 0
        || count_solo_rows::<entity::contact::Entity, _>(conn, user_id).await? > 0
        || count_solo_rows::<entity::note::Entity, _>(conn, user_id).await? > 0
        || count_solo_rows::<entity::todo::Entity, _>(conn, user_id).await? > 0
        || count_solo_rows::<entity::candidate::Entity, _>(conn, user_id).await? > 0
        || count_solo_rows::<entity::candidate_comment::Entity, _>(conn, user_id).await? > 0)
}
