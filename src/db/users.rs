use crate::db::postgres_service::PostgresService;
use crate::types::error::AppError;
use crate::types::user::RegisterRequest;
use crate::utils::token::{construct_token, encrypt, new_id, new_token, verify};
use chrono::Utc;
use entity::user::{ActiveModel as UserActive, Column, Entity as User, Model as UserModel};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

impl PostgresService {
    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<UserModel, AppError> {
        Ok(User::find_by_id(*id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<UserModel, AppError> {
        Ok(User::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<UserModel, AppError> {
        Ok(User::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    async fn user_exists(&self, username: &str, email: &str) -> Result<bool, AppError> {
        Ok(User::find()
            .filter(
                sea_orm::Condition::any()
                    .add(Column::Username.eq(username))
                    .add(Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?
            > 0)
    }

    /// Signup. Emails are stored lowercased so invitation matching stays
    /// case-insensitive.
    pub async fn create_user(&self, payload: RegisterRequest) -> Result<(UserModel, String), AppError> {
        let username = payload.username.trim().to_owned();
        let email = payload.email.trim().to_lowercase();
        if username.is_empty() || email.is_empty() || payload.password.is_empty() {
            return Err(AppError::Validation(
                "username, email and password are required".into(),
            ));
        }
        if self.user_exists(&username, &email).await? {
            return Err(AppError::AlreadyExists);
        }

        let uid = new_id();
        let secret = new_token();
        let now = Utc::now();
        let password_hash =
            encrypt(&payload.password).map_err(|e| AppError::Internal(e.to_string()))?;
        let token_hash = encrypt(&secret).map_err(|e| AppError::Internal(e.to_string()))?;

        let user = UserActive {
            id: Set(uid),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            token_hash: Set(token_hash),
            workspace_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok((user, construct_token(&uid, &secret)))
    }

    /// Password check plus a fresh bearer token. One live token per user;
    /// logging in invalidates the previous one.
    pub async fn verify_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserModel, String), AppError> {
        let user = match self.get_user_by_username(username).await {
            Ok(u) => u,
            Err(AppError::NotFound) => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };
        if !verify(password, &user.password_hash).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        let secret = new_token();
        let token_hash = encrypt(&secret).map_err(|e| AppError::Internal(e.to_string()))?;
        let mut am: UserActive = user.into();
        am.token_hash = Set(token_hash);
        am.updated_at = Set(Utc::now());
        let user = am.update(&self.db).await?;

        let token = construct_token(&user.id, &secret);
        Ok((user, token))
    }
}
