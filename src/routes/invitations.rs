use crate::db::postgres_service::PostgresService;
use crate::types::invite::{AcceptRequest, AcceptResponse, MyInvitations};
use crate::types::response::{ApiResponse, ApiResult};
use crate::utils::webutils::auth_user_id;
use actix_web::{get, post, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[get("")]
async fn list(db: web::Data<Arc<PostgresService>>, auth: BearerAuth) -> ApiResult<MyInvitations> {
    let user_id = auth_user_id(&auth)?;
    Ok(ApiResponse::Ok(db.invitations_for_user(user_id).await?))
}

#[post("/{id}/accept")]
async fn accept(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
    data: web::Json<AcceptRequest>,
) -> ApiResult<AcceptResponse> {
    let user_id = auth_user_id(&auth)?;
    let workspace_id = db
        .accept_invitation(path.into_inner(), user_id, data.merge_data)
        .await?;
    info!(
        "user {} joined workspace {} (merge_data={})",
        user_id, workspace_id, data.merge_data
    );
    Ok(ApiResponse::Ok(AcceptResponse { workspace_id }))
}

#[post("/{id}/decline")]
async fn decline(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<()> {
    let user_id = auth_user_id(&auth)?;
    db.decline_invitation(path.into_inner(), user_id).await?;
    Ok(ApiResponse::EmptyOk)
}
