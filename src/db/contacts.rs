use crate::db::postgres_service::PostgresService;
use crate::db::scoped::{bump_updated_at, find_in_scope, list_in_scope, scope_condition};
use crate::types::contact::{
    ContactDetail, ContactSort, ContactView, CreateContact, UpdateContact,
};
use crate::types::error::AppError;
use crate::types::scope::{Role, Scope};
use crate::utils::token::new_id;
use chrono::{DateTime, Utc};
use entity::company::Entity as Company;
use entity::contact::{ActiveModel as ContactActive, Entity as Contact, Model as ContactModel};
use entity::note::Entity as Note;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use std::collections::HashMap;
use uuid::Uuid;

impl PostgresService {
    pub async fn list_contacts(
        &self,
        scope: &Scope,
        sort: ContactSort,
    ) -> Result<Vec<ContactView>, AppError> {
        let contacts = list_in_scope::<Contact, _>(&self.db, scope).await?;

        let companies: HashMap<Uuid, String> = list_in_scope::<Company, _>(&self.db, scope)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut last_notes: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
        for note in list_in_scope::<Note, _>(&self.db, scope).await? {
            last_notes
                .entry(note.contact_id)
                .and_modify(|d| *d = (*d).max(note.created_at))
                .or_insert(note.created_at);
        }

        let mut views: Vec<ContactView> = contacts
            .into_iter()
            .map(|contact| ContactView {
                company_name: companies.get(&contact.company_id).cloned().unwrap_or_default(),
                last_note_date: last_notes.get(&contact.id).copied(),
                contact,
            })
            .collect();

        match sort {
            ContactSort::Name => views
                .sort_by(|a, b| a.contact.name.to_lowercase().cmp(&b.contact.name.to_lowercase())),
            ContactSort::Company => views.sort_by(|a, b| {
                (a.company_name.to_lowercase(), a.contact.name.to_lowercase())
                    .cmp(&(b.company_name.to_lowercase(), b.contact.name.to_lowercase()))
            }),
            // Most recently noted first; never-noted contacts fall to the
            // end in name order.
            ContactSort::LastNote => views.sort_by(|a, b| {
                match (b.last_note_date, a.last_note_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Greater,
                    (None, Some(_)) => std::cmp::Ordering::Less,
                    (None, None) => std::cmp::Ordering::Equal,
                }
                .then_with(|| a.contact.name.to_lowercase().cmp(&b.contact.name.to_lowercase()))
            }),
        }

        Ok(views)
    }

    pub async fn get_contact(&self, id: Uuid, scope: &Scope) -> Result<ContactDetail, AppError> {
        let contact = find_in_scope::<Contact, _>(&self.db, id, scope).await?;
        self.contact_detail(contact, scope).await
    }

    async fn contact_detail(
        &self,
        contact: ContactModel,
        scope: &Scope,
    ) -> Result<ContactDetail, AppError> {
        let company = find_in_scope::<Company, _>(&self.db, contact.company_id, scope).await?;
        let notes = Note::find()
            .filter(entity::note::Column::ContactId.eq(contact.id))
            .filter(scope_condition::<Note>(scope))
            .order_by_desc(entity::note::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(ContactDetail {
            contact,
            company_name: company.name,
            notes,
        })
    }

    pub async fn create_contact(
        &self,
        payload: CreateContact,
        user_id: Uuid,
        scope: &Scope,
    ) -> Result<ContactDetail, AppError> {
        let name = payload.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        // The company reference must resolve inside the caller's scope;
        // anything else reads as nonexistent.
        let company = find_in_scope::<Company, _>(&self.db, payload.company_id, scope).await?;

        let now = Utc::now();
        let contact = ContactActive {
            id: Set(new_id()),
            company_id: Set(company.id),
            name: Set(name),
            role: Set(payload.role),
            department: Set(payload.department),
            description: Set(payload.description),
            email: Set(payload.email),
            phone: Set(payload.phone),
            workspace_id: Set(scope.workspace_id()),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        bump_updated_at::<Company, _>(&self.db, company.id).await?;

        Ok(ContactDetail {
            contact,
            company_name: company.name,
            notes: vec![],
        })
    }

    pub async fn update_contact(
        &self,
        id: Uuid,
        patch: UpdateContact,
        scope: &Scope,
    ) -> Result<ContactDetail, AppError> {
        let contact = find_in_scope::<Contact, _>(&self.db, id, scope).await?;
        let old_company_id = contact.company_id;

        let mut am: ContactActive = contact.into();
        if let Some(company_id) = patch.company_id {
            if company_id != old_company_id {
                find_in_scope::<Company, _>(&self.db, company_id, scope).await?;
                am.company_id = Set(company_id);
            }
        }
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name is required".into()));
            }
            am.name = Set(name.trim().to_owned());
        }
        if let Some(v) = patch.role {
            am.role = Set(v);
        }
        if let Some(v) = patch.department {
            am.department = Set(v);
        }
        if let Some(v) = patch.description {
            am.description = Set(v);
        }
        if let Some(v) = patch.email {
            am.email = Set(v);
        }
        if let Some(v) = patch.phone {
            am.phone = Set(v);
        }
        am.updated_at = Set(Utc::now());
        let contact = am.update(&self.db).await?;

        if contact.company_id != old_company_id {
            bump_updated_at::<Company, _>(&self.db, old_company_id).await?;
            bump_updated_at::<Company, _>(&self.db, contact.company_id).await?;
        }

        self.contact_detail(contact, scope).await
    }

    pub async fn delete_contact(
        &self,
        id: Uuid,
        scope: &Scope,
        role: Role,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let contact = find_in_scope::<Contact, _>(&self.db, id, scope).await?;
        if !role.can_delete(contact.created_by, user_id) {
            return Err(AppError::Forbidden);
        }
        let company_id = contact.company_id;
        contact.delete(&self.db).await?;
        bump_updated_at::<Company, _>(&self.db, company_id).await?;
        Ok(())
    }
}
