use crate::db::postgres_service::PostgresService;
use crate::types::company::{CompanyDetail, CompanyView, CreateCompany, UpdateCompany};
use crate::types::response::{ApiResponse, ApiResult};
use crate::utils::webutils::auth_user_id;
use actix_web::{delete, get, post, put, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;
use uuid::Uuid;

#[get("")]
async fn list(db: web::Data<Arc<PostgresService>>, auth: BearerAuth) -> ApiResult<Vec<CompanyView>> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(db.list_companies(&scope).await?))
}

#[get("/{id}")]
async fn get(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<CompanyDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.get_company(path.into_inner(), &scope).await?,
    ))
}

#[post("")]
async fn create(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    data: web::Json<CreateCompany>,
) -> ApiResult<CompanyDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Created(
        db.create_company(data.into_inner(), user_id, &scope).await?,
    ))
}

#[put("/{id}")]
async fn update(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
    data: web::Json<UpdateCompany>,
) -> ApiResult<CompanyDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.update_company(path.into_inner(), data.into_inner(), &scope)
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
    db.delete_company(path.into_inner(), &scope, role, user_id)
        .await?;
    Ok(ApiResponse::NoContent)
}
