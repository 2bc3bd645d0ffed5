use actix_web::{dev::ServiceRequest, error::ErrorUnauthorized, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;

use crate::db::postgres_service::PostgresService;
use crate::types::error::AppError;
use crate::utils::token::{extract_token_parts, verify};

/// Pulls the authenticated user id out of an already-validated bearer token.
pub fn auth_user_id(auth: &BearerAuth) -> Result<uuid::Uuid, AppError> {
    extract_token_parts(auth.token())
        .map(|(id, _)| id)
        .ok_or(AppError::Unauthorized)
}

pub async fn validate_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let Some((user_id, secret)) = extract_token_parts(credentials.token()) else {
        return Err((ErrorUnauthorized("Invalid token"), req));
    };
    let secret = secret.to_owned();

    let Some(db) = req
        .app_data::<web::Data<Arc<PostgresService>>>()
        .map(|d| d.clone())
    else {
        return Err((ErrorUnauthorized("Invalid token"), req));
    };

    match db.get_user_by_id(&user_id).await {
        Ok(user) if verify(&secret, &user.token_hash).unwrap_or(false) => Ok(req),
        _ => Err((ErrorUnauthorized("Invalid token"), req)),
    }
}
