use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::todo::{CreateTodo, TodoListQuery, TodoView, UpdateTodo};
use crate::utils::webutils::auth_user_id;
use actix_web::{delete, get, post, put, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;
use uuid::Uuid;

#[get("")]
async fn list(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    query: web::Query<TodoListQuery>,
) -> ApiResult<Vec<TodoView>> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(db.list_todos(&scope, query.filter).await?))
}

#[get("/{id}")]
async fn get(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<entity::todo::Model> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(db.get_todo(path.into_inner(), &scope).await?))
}

#[post("")]
async fn create(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    data: web::Json<CreateTodo>,
) -> ApiResult<entity::todo::Model> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Created(
        db.create_todo(data.into_inner(), user_id, &scope).await?,
    ))
}

#[put("/{id}")]
async fn update(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
    data: web::Json<UpdateTodo>,
) -> ApiResult<entity::todo::Model> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.update_todo(path.into_inner(), data.into_inner(), &scope)
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
    db.delete_todo(path.into_inner(), &scope, role, user_id)
        .await?;
    Ok(ApiResponse::NoContent)
}
