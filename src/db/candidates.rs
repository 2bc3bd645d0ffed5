use crate::db::postgres_service::PostgresService;
use crate::db::scoped::{bump_updated_at, find_in_scope, list_in_scope, scope_condition};
use crate::types::candidate::{CandidateDetail, CreateCandidate, UpdateCandidate};
use crate::types::error::AppError;
use crate::types::scope::{Role, Scope};
use crate::utils::token::new_id;
use chrono::Utc;
use entity::candidate::{
    ActiveModel as CandidateActive, Entity as Candidate, Model as CandidateModel,
};
use entity::candidate_comment::{
    ActiveModel as CommentActive, Entity as Comment, Model as CommentModel,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

impl PostgresService {
    pub async fn list_candidates(&self, scope: &Scope) -> Result<Vec<CandidateModel>, AppError> {
        let mut candidates = list_in_scope::<Candidate, _>(&self.db, scope).await?;
        candidates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(candidates)
    }

    pub async fn get_candidate(&self, id: Uuid, scope: &Scope) -> Result<CandidateDetail, AppError> {
        let candidate = find_in_scope::<Candidate, _>(&self.db, id, scope).await?;
        self.candidate_detail(candidate, scope).await
    }

    async fn candidate_detail(
        &self,
        candidate: CandidateModel,
        scope: &Scope,
    ) -> Result<CandidateDetail, AppError> {
        let comments = Comment::find()
            .filter(entity::candidate_comment::Column::CandidateId.eq(candidate.id))
            .filter(scope_condition::<Comment>(scope))
            .order_by_desc(entity::candidate_comment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(CandidateDetail {
            candidate,
            comments,
        })
    }

    pub async fn create_candidate(
        &self,
        payload: CreateCandidate,
        user_id: Uuid,
        scope: &Scope,
    ) -> Result<CandidateDetail, AppError> {
        let name = payload.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }

        let now = Utc::now();
        let candidate = CandidateActive {
            id: Set(new_id()),
            name: Set(name),
            email: Set(payload.email),
            phone: Set(payload.phone),
            role: Set(payload.role),
            skills: Set(payload.skills),
            resume_filename: Set(payload.resume_filename),
            resume_original_name: Set(payload.resume_original_name),
            workspace_id: Set(scope.workspace_id()),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(CandidateDetail {
            candidate,
            comments: vec![],
        })
    }

    pub async fn update_candidate(
        &self,
        id: Uuid,
        patch: UpdateCandidate,
        scope: &Scope,
    ) -> Result<CandidateDetail, AppError> {
        let candidate = find_in_scope::<Candidate, _>(&self.db, id, scope).await?;

        let mut am: CandidateActive = candidate.into();
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name is required".into()));
            }
            am.name = Set(name.trim().to_owned());
        }
        if let Some(v) = patch.email {
            am.email = Set(v);
        }
        if let Some(v) = patch.phone {
            am.phone = Set(v);
        }
        if let Some(v) = patch.role {
            am.role = Set(v);
        }
        if let Some(v) = patch.skills {
            am.skills = Set(v);
        }
        if let Some(v) = patch.resume_filename {
            am.resume_filename = Set(v);
        }
        if let Some(v) = patch.resume_original_name {
            am.resume_original_name = Set(v);
        }
        am.updated_at = Set(Utc::now());
        let candidate = am.update(&self.db).await?;

        self.candidate_detail(candidate, scope).await
    }

    pub async fn delete_candidate(
        &self,
        id: Uuid,
        scope: &Scope,
        role: Role,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let candidate = find_in_scope::<Candidate, _>(&self.db, id, scope).await?;
        if !role.can_delete(candidate.created_by, user_id) {
            return Err(AppError::Forbidden);
        }
        candidate.delete(&self.db).await?;
        Ok(())
    }

    // Comments hang off a candidate; the candidate's scope is checked
    // before the comment is ever looked at.

    async fn comment_under_candidate(
        &self,
        candidate_id: Uuid,
        comment_id: Uuid,
        scope: &Scope,
    ) -> Result<CommentModel, AppError> {
        Comment::find()
            .filter(entity::candidate_comment::Column::Id.eq(comment_id))
            .filter(entity::candidate_comment::Column::CandidateId.eq(candidate_id))
            .filter(scope_condition::<Comment>(scope))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create_comment(
        &self,
        candidate_id: Uuid,
        content: &str,
        user_id: Uuid,
        scope: &Scope,
    ) -> Result<CommentModel, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("content is required".into()));
        }
        let candidate = find_in_scope::<Candidate, _>(&self.db, candidate_id, scope).await?;

        let now = Utc::now();
        let comment = CommentActive {
            id: Set(new_id()),
            candidate_id: Set(candidate.id),
            content: Set(content.to_owned()),
            workspace_id: Set(scope.workspace_id()),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        bump_updated_at::<Candidate, _>(&self.db, candidate.id).await?;
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        candidate_id: Uuid,
        comment_id: Uuid,
        content: &str,
        scope: &Scope,
    ) -> Result<CommentModel, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("content is required".into()));
        }
        find_in_scope::<Candidate, _>(&self.db, candidate_id, scope).await?;
        let comment = self
            .comment_under_candidate(candidate_id, comment_id, scope)
            .await?;

        let mut am: CommentActive = comment.into();
        am.content = Set(content.to_owned());
        am.updated_at = Set(Utc::now());
        let comment = am.update(&self.db).await?;

        bump_updated_at::<Candidate, _>(&self.db, candidate_id).await?;
        Ok(comment)
    }

    pub async fn delete_comment(
        &self,
        candidate_id: Uuid,
        comment_id: Uuid,
        scope: &Scope,
        role: Role,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        find_in_scope::<Candidate, _>(&self.db, candidate_id, scope).await?;
        let comment = self
            .comment_under_candidate(candidate_id, comment_id, scope)
            .await?;
        if !role.can_delete(comment.created_by, user_id) {
            return Err(AppError::Forbidden);
        }

        comment.delete(&self.db).await?;
        bump_updated_at::<Candidate, _>(&self.db, candidate_id).await?;
        Ok(())
    }
}
