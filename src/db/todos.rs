use crate::db::postgres_service::PostgresService;
use crate::db::scoped::{find_in_scope, list_in_scope};
use crate::types::error::AppError;
use crate::types::scope::{Role, Scope};
use crate::types::todo::{CreateTodo, TodoFilter, TodoView, UpdateTodo};
use crate::utils::token::new_id;
use chrono::Utc;
use entity::company::Entity as Company;
use entity::contact::Entity as Contact;
use entity::todo::{ActiveModel as TodoActive, Entity as Todo, LinkedKind, Model as TodoModel};
use sea_orm::{ActiveModelTrait, ModelTrait, Set};
use std::collections::HashMap;
use uuid::Uuid;

impl PostgresService {
    pub async fn list_todos(
        &self,
        scope: &Scope,
        filter: TodoFilter,
    ) -> Result<Vec<TodoView>, AppError> {
        let mut todos = list_in_scope::<Todo, _>(&self.db, scope).await?;
        todos.retain(|t| match filter {
            TodoFilter::All => true,
            TodoFilter::Active => !t.completed,
            TodoFilter::Completed => t.completed,
        });
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let companies: HashMap<Uuid, String> = list_in_scope::<Company, _>(&self.db, scope)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let contacts: HashMap<Uuid, (String, Uuid)> = list_in_scope::<Contact, _>(&self.db, scope)
            .await?
            .into_iter()
            .map(|c| (c.id, (c.name, c.company_id)))
            .collect();

        Ok(todos
            .into_iter()
            .map(|todo| {
                let (linked_name, linked_company_name) = match todo.linked_kind {
                    LinkedKind::Company => (
                        companies
                            .get(&todo.linked_id)
                            .cloned()
                            .unwrap_or_else(|| "Unknown".into()),
                        None,
                    ),
                    LinkedKind::Contact => match contacts.get(&todo.linked_id) {
                        Some((name, company_id)) => {
                            (name.clone(), companies.get(company_id).cloned())
                        }
                        None => ("Unknown".into(), None),
                    },
                };
                TodoView {
                    todo,
                    linked_name,
                    linked_company_name,
                }
            })
            .collect())
    }

    pub async fn get_todo(&self, id: Uuid, scope: &Scope) -> Result<TodoModel, AppError> {
        find_in_scope::<Todo, _>(&self.db, id, scope).await
    }

    pub async fn create_todo(
        &self,
        payload: CreateTodo,
        user_id: Uuid,
        scope: &Scope,
    ) -> Result<TodoModel, AppError> {
        let title = payload.title.trim().to_owned();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".into()));
        }
        // The linked target must exist in the caller's scope.
        match payload.linked_kind {
            LinkedKind::Contact => {
                find_in_scope::<Contact, _>(&self.db, payload.linked_id, scope).await?;
            }
            LinkedKind::Company => {
                find_in_scope::<Company, _>(&self.db, payload.linked_id, scope).await?;
            }
        }

        let now = Utc::now();
        Ok(TodoActive {
            id: Set(new_id()),
            title: Set(title),
            description: Set(payload.description),
            due_date: Set(payload.due_date),
            completed: Set(false),
            completed_at: Set(None),
            linked_kind: Set(payload.linked_kind),
            linked_id: Set(payload.linked_id),
            workspace_id: Set(scope.workspace_id()),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn update_todo(
        &self,
        id: Uuid,
        patch: UpdateTodo,
        scope: &Scope,
    ) -> Result<TodoModel, AppError> {
        let todo = find_in_scope::<Todo, _>(&self.db, id, scope).await?;
        let was_completed = todo.completed;

        let now = Utc::now();
        let mut am: TodoActive = todo.into();
        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("title is required".into()));
            }
            am.title = Set(title.trim().to_owned());
        }
        if let Some(v) = patch.description {
            am.description = Set(v);
        }
        if let Some(v) = patch.due_date {
            am.due_date = Set(v);
        }
        if let Some(completed) = patch.completed {
            am.completed = Set(completed);
            if completed && !was_completed {
                am.completed_at = Set(Some(now));
            } else if !completed && was_completed {
                am.completed_at = Set(None);
            }
        }
        am.updated_at = Set(now);
        Ok(am.update(&self.db).await?)
    }

    pub async fn delete_todo(
        &self,
        id: Uuid,
        scope: &Scope,
        role: Role,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let todo = find_in_scope::<Todo, _>(&self.db, id, scope).await?;
        if !role.can_delete(todo.created_by, user_id) {
            return Err(AppError::Forbidden);
        }
        todo.delete(&self.db).await?;
        Ok(())
    }
}
