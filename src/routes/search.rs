use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::search::{SearchQuery, SearchResults};
use crate::utils::webutils::auth_user_id;
use actix_web::{get, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;

#[get("")]
async fn search(
    db: web::Data<Arc<PostgresService>>,
    auth: BearerAuth,
    query: web::Query<SearchQuery>,
) -> ApiResult<SearchResults> {
    let user_id = auth_user_id(&auth)?;
    let scope = db.scope_of(user_id).await?;
    Ok(ApiResponse::Ok(db.search(&scope, &query.q).await?))
}
