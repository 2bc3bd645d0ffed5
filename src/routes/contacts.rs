use crate::db::postgres_service::PostgresService;
use crate::types::contact::{
    ContactDetail, ContactListQuery, ContactView, CreateContact, CreateNote, UpdateContact,
};
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
    query: web::Query<ContactListQuery>,
) -> ApiResult<Vec<ContactView>> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(db.list_contacts(&scope, query.sort).await?))
}

#[get("/{id}")]
async fn get(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
) -> ApiResult<ContactDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.get_contact(path.into_inner(), &scope).await?,
    ))
}

#[post("")]
async fn create(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    data: web::Json<CreateContact>,
) -> ApiResult<ContactDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Created(
        db.create_contact(data.into_inner(), user_id, &scope).await?,
    ))
}

#[put("/{id}")]
async fn update(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
    data: web::Json<UpdateContact>,
) -> ApiResult<ContactDetail> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.update_contact(path.into_inner(), data.into_inner(), &scope)
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
    db.delete_contact(path.into_inner(), &scope, role, user_id)
        .await?;
    Ok(ApiResponse::NoContent)
}

#[post("/{id}/notes")]
async fn create_note(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<Uuid>,
    data: web::Json<CreateNote>,
) -> ApiResult<entity::note::Model> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Created(
        db.create_note(path.into_inner(), &data.content, user_id, &scope)
            .await?,
    ))
}

#[put("/{id}/notes/{note_id}")]
async fn update_note(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<CreateNote>,
) -> ApiResult<entity::note::Model> {
    let (contact_id, note_id) = path.into_inner();
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(
        db.update_note(contact_id, note_id, &data.content, &scope)
            .await?,
    ))
}

#[delete("/{id}/notes/{note_id}")]
async fn delete_note(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let (contact_id, note_id) = path.into_inner();
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    let role = db.role_of(user_id).await?;
    db.delete_note(contact_id, note_id, &scope, role, user_id)
        .await?;
    Ok(ApiResponse::NoContent)
}
