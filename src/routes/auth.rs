use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{AuthResponse, LoginRequest, RegisterRequest};
use actix_web::{post, web};
use std::sync::Arc;
use tracing::info;

#[post("/register")]
async fn register(
    db: web::Data<Arc<PostgresService>>,
    data: web::Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let (user, token) = db.create_user(data.into_inner()).await?;
    info!("registered user {}", user.username);

    Ok(ApiResponse::Created(AuthResponse {
        user_id: user.id,
        username: user.username,
        token,
    }))
}

#[post("/login")]
async fn login(
    db: web::Data<Arc<PostgresService>>,
    data: web::Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let (user, token) = db.verify_login(&data.username, &data.password).await?;

    Ok(ApiResponse::Ok(AuthResponse {
        user_id: user.id,
        username: user.username,
        token,
    }))
}
