use crate::db::postgres_service::PostgresService;
use crate::db::scoped::{bump_updated_at, find_in_scope, scope_condition};
use crate::types::error::AppError;
use crate::types::scope::{Role, Scope};
use crate::utils::token::new_id;
use chrono::Utc;
use entity::company::Entity as Company;
use entity::contact::Entity as Contact;
use entity::note::{ActiveModel as NoteActive, Entity as Note, Model as NoteModel};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use uuid::Uuid;

/// Notes are only reachable through their contact, so every operation
/// checks the contact's scope first; the note itself is never a way in.
impl PostgresService {
    async fn note_under_contact(
        &self,
        contact_id: Uuid,
        note_id: Uuid,
        scope: &Scope,
    ) -> Result<NoteModel, AppError> {
        Note::find()
            .filter(entity::note::Column::Id.eq(note_id))
            .filter(entity::note::Column::ContactId.eq(contact_id))
            .filter(scope_condition::<Note>(scope))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create_note(
        &self,
        contact_id: Uuid,
        content: &str,
        user_id: Uuid,
        scope: &Scope,
    ) -> Result<NoteModel, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("content is required".into()));
        }
        let contact = find_in_scope::<Contact, _>(&self.db, contact_id, scope).await?;

        let now = Utc::now();
        let note = NoteActive {
            id: Set(new_id()),
            contact_id: Set(contact.id),
            content: Set(content.to_owned()),
            workspace_id: Set(scope.workspace_id()),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        bump_updated_at::<Contact, _>(&self.db, contact.id).await?;
        bump_updated_at::<Company, _>(&self.db, contact.company_id).await?;

        Ok(note)
    }

    pub async fn update_note(
        &self,
        contact_id: Uuid,
        note_id: Uuid,
        content: &str,
        scope: &Scope,
    ) -> Result<NoteModel, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("content is required".into()));
        }
        let contact = find_in_scope::<Contact, _>(&self.db, contact_id, scope).await?;
        let note = self.note_under_contact(contact_id, note_id, scope).await?;

        let mut am: NoteActive = note.into();
        am.content = Set(content.to_owned());
        am.updated_at = Set(Utc::now());
        let note = am.update(&self.db).await?;

        bump_updated_at::<Contact, _>(&self.db, contact.id).await?;
        bump_updated_at::<Company, _>(&self.db, contact.company_id).await?;

        Ok(note)
    }

    pub async fn delete_note(
        &self,
        contact_id: Uuid,
        note_id: Uuid,
        scope: &Scope,
        role: Role,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let contact = find_in_scope::<Contact, _>(&self.db, contact_id, scope).await?;
        let note = self.note_under_contact(contact_id, note_id, scope).await?;
        if !role.can_delete(note.created_by, user_id) {
            return Err(AppError::Forbidden);
        }

        note.delete(&self.db).await?;
        bump_updated_at::<Contact, _>(&self.db, contact.id).await?;
        bump_updated_at::<Company, _>(&self.db, contact.company_id).await?;
        Ok(())
    }
}
