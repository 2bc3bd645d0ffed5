use crate::db::postgres_service::PostgresService;
use crate::types::candidate::{CandidateDetail, CreateCandidate, CreateComment, UpdateCandidate};
use crate::types::response::{ApiResponse, ApiResult};
use crate::utils::webutils::auth_user_id;
use actix_web::{delete, get, post, put, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;
use uuid::Uuid;

#[get("")]
async fn list(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
) -> ApiResult<Vec<entity::candidate::Model>> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(db.list_candidates(&scope).await?))
}

#[get("/{id}")]
async fn get(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<CandidateDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.get_candidate(path.into_inner(), &scope).await?,
    ))
}

#[post("")]
async fn create(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    data: web::Json<CreateCandidate>,
) -> ApiResult<CandidateDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Created(
        db.create_candidate(data.into_inner(), user_id, &scope)
            .await?,
    ))
}

#[put("/{id}")]
async fn update(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
    data: web::Json<UpdateCandidate>,
) -> ApiResult<CandidateDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.update_candidate(path.into_inner(), data.into_inner(), &scope)
            .await?,
    ))
}

#[delete("/{id}")]
async fn delete(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<()> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    let role = db.role_of(user_id).await?;
    db.delete_candidate(path.into_inner(), &scope, role, user_id)
        .await?;
    Ok(ApiResponse::NoContent)
}

#[post("/{id}/comments")]
async fn create_comment(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
    data: web::Json<CreateComment>,
) -> ApiResult<entity::candidate_comment::Model> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Created(
        db.create_comment(path.into_inner(), &data.content, user_id, &scope)
            .await?,
    ))
}

#[put("/{id}/comments/{comment_id}")]
async fn update_comment(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<CreateComment>,
) -> ApiResult<entity::candidate_comment::Model> {
    let (candidate_id, comment_id) = path.into_inner();
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.update_comment(candidate_id, comment_id, &data.content, &scope)
            .await?,
    ))
}

#[delete("/{id}/comments/{comment_id}")]
async fn delete_comment(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let (candidate_id, comment_id) = path.into_inner();
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    let role = db.role_of(user_id).await?;
    db.delete_comment(candidate_id, comment_id, &scope, role, user_id)
        .await?;
    Ok(ApiResponse::NoContent)
}
