use crate::db::postgres_service::PostgresService;
use crate::db::scoped::{find_in_scope, list_in_scope, scope_condition};
use crate::types::company::{CompanyDetail, CompanyView, CreateCompany, UpdateCompany};
use crate::types::error::AppError;
use crate::types::scope::{Role, Scope};
use crate::utils::token::new_id;
use chrono::Utc;
use entity::company::{ActiveModel as CompanyActive, Entity as Company, Model as CompanyModel};
use entity::contact::Entity as Contact;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use std::collections::HashMap;
use uuid::Uuid;

impl PostgresService {
    pub async fn list_companies(&self, scope: &Scope) -> Result<Vec<CompanyView>, AppError> {
        let mut companies = list_in_scope::<Company, _>(&self.db, scope).await?;
        companies.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let contacts = list_in_scope::<Contact, _>(&self.db, scope).await?;
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for c in &contacts {
            *counts.entry(c.company_id).or_default() += 1;
        }

        Ok(companies
            .into_iter()
            .map(|company| {
                let contact_count = counts.get(&company.id).copied().unwrap_or(0);
                CompanyView {
                    company,
                    contact_count,
                }
            })
            .collect())
    }

    pub async fn get_company(&self, id: Uuid, scope: &Scope) -> Result<CompanyDetail, AppError> {
        let company = find_in_scope::<Company, _>(&self.db, id, scope).await?;
        self.company_detail(company, scope).await
    }

    async fn company_detail(
        &self,
        company: CompanyModel,
        scope: &Scope,
    ) -> Result<CompanyDetail, AppError> {
        let mut contacts = Contact::find()
            .filter(entity::contact::Column::CompanyId.eq(company.id))
            .filter(scope_condition::<Contact>(scope))
            .all(&self.db)
            .await?;
        contacts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(CompanyDetail { company, contacts })
    }

    pub async fn create_company(
        &self,
        payload: CreateCompany,
        user_id: Uuid,
        scope: &Scope,
    ) -> Result<CompanyDetail, AppError> {
        let name = payload.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }

        let now = Utc::now();
        let company = CompanyActive {
            id: Set(new_id()),
            name: Set(name),
            technologies: Set(payload.technologies),
            organization_number: Set(payload.organization_number),
            address: Set(payload.address),
            workspace_id: Set(scope.workspace_id()),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(CompanyDetail {
            company,
            contacts: vec![],
        })
    }

    pub async fn update_company(
        &self,
        id: Uuid,
        patch: UpdateCompany,
        scope: &Scope,
    ) -> Result<CompanyDetail, AppError> {
        let company = find_in_scope::<Company, _>(&self.db, id, scope).await?;

        let mut am: CompanyActive = company.into();
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name is required".into()));
            }
            am.name = Set(name.trim().to_owned());
        }
        if let Some(v) = patch.technologies {
            am.technologies = Set(v);
        }
        if let Some(v) = patch.organization_number {
            am.organization_number = Set(v);
        }
        if let Some(v) = patch.address {
            am.address = Set(v);
        }
        am.updated_at = Set(Utc::now());
        let company = am.update(&self.db).await?;

        self.company_detail(company, scope).await
    }

    pub async fn delete_company(
        &self,
        id: Uuid,
        scope: &Scope,
        role: Role,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let company = find_in_scope::<Company, _>(&self.db, id, scope).await?;
        if !role.can_delete(company.created_by, user_id) {
            return Err(AppError::Forbidden);
        }
        // Contacts and their notes go with it (FK cascade).
        company.delete(&self.db).await?;
        Ok(())
    }
}
