use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::scope::Role;
use crate::types::team::{InviteRequest, TransferRequest, WorkspaceView};
use crate::types::user::MemberView;
use crate::types::error::AppError;
use crate::utils::webutils::auth_user_id;
use actix_web::{delete, get, post, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[get("")]
async fn view(db: web::Data<Arc<PostgresService>>, auth: BearerAuth) -> ApiResult<WorkspaceView> {
    let user_id = auth_user_id(&auth)?;
    Ok(ApiResponse::Ok(db.workspace_view(user_id).await?))
}

#[get("/members")]
async fn members(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
) -> ApiResult<Vec<MemberView>> {
    let user_id = auth_user_id(&auth)?;
    if db.role_of(user_id).await? != Role::Owner {
        return Err(AppError::Forbidden);
    }
    let user = db.get_user_by_id(&user_id).await?;
    let ws_id = user.workspace_id.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::Ok(db.workspace_members(ws_id).await?))
}

#[post("/invite")]
async fn invite(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    data: web::Json<InviteRequest>,
) -> ApiResult<entity::invitation::Model> {
    let user_id = auth_user_id(&auth)?;
    let invitation = db.invite(user_id, &data.email).await?;
    info!("user {} invited {}", user_id, invitation.email);
    Ok(ApiResponse::Created(invitation))
}

#[delete("/invite/{id}")]
async fn cancel_invite(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<()> {
    let user_id = auth_user_id(&auth)?;
    db.cancel_invitation(path.into_inner(), user_id).await?;
    Ok(ApiResponse::NoContent)
}

#[post("/transfer")]
async fn transfer(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    data: web::Json<TransferRequest>,
) -> ApiResult<Message> {
    let user_id = auth_user_id(&auth)?;
    db.transfer_ownership(user_id, data.new_owner_id).await?;
    Ok(ApiResponse::Ok(Message {
        message: "Ownership transferred successfully".into(),
    }))
}

#[post("/leave")]
async fn leave(db: web::Data<Arc<PostgresService>>, auth: BearerAuth) -> ApiResult<Message> {
    let user_id = auth_user_id(&auth)?;
    db.leave_workspace(user_id).await?;
    Ok(ApiResponse::Ok(Message {
        message: "You have left the team".into(),
    }))
}

#[delete("/members/{id}")]
async fn remove_member(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<()> {
    let user_id = auth_user_id(&auth)?;
    db.remove_member(user_id, path.into_inner()).await?;
    Ok(ApiResponse::NoContent)
}
