#![allow(dead_code)]

use crewdex::db::postgres_service::PostgresService;
use crewdex::types::company::CreateCompany;
use crewdex::types::contact::CreateContact;
use crewdex::types::scope::Scope;
use crewdex::types::user::RegisterRequest;
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use uuid::Uuid;

pub struct TestContext {
    pub db: Arc<PostgresService>,
    pub _container: ContainerAsync<Postgres>,
}

impl TestContext {
    pub async fn new() -> TestContext {
        let postgres = Postgres::default();
        let container = postgres
            .start()
            .await
            .expect("Failed to start postgres container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let db = Arc::new(
            PostgresService::new(&db_url)
                .await
                .expect("Failed to initialize PostgresService"),
        );

        TestContext {
            db,
            _container: container,
        }
    }

    /// Register a user with a unique handle and email.
    pub async fn create_user(&self, name: &str) -> entity::user::Model {
        let suffix = Uuid::new_v4().simple().to_string();
        let (user, _token) = self
            .db
            .create_user(RegisterRequest {
                username: format!("{name}-{suffix}"),
                email: format!("{name}-{suffix}@test.com"),
                password: "hunter2hunter2".into(),
            })
            .await
            .expect("Failed to create user");
        user
    }

    pub async fn scope(&self, user_id: Uuid) -> Scope {
        self.db.scope_of(user_id).await.expect("Failed to resolve scope")
    }

    /// A company plus one contact, created under the user's current scope.
    pub async fn seed_company_with_contact(
        &self,
        user_id: Uuid,
        company_name: &str,
        contact_name: &str,
    ) -> (entity::company::Model, entity::contact::Model) {
        let scope = self.scope(user_id).await;
        let company = self
            .db
            .create_company(
                CreateCompany {
                    name: company_name.into(),
                    technologies: "rust, postgres".into(),
                    organization_number: String::new(),
                    address: String::new(),
                },
                user_id,
                &scope,
            )
            .await
            .expect("Failed to create company");

        let contact = self
            .db
            .create_contact(
                CreateContact {
                    company_id: company.company.id,
                    name: contact_name.into(),
                    role: String::new(),
                    department: String::new(),
                    description: String::new(),
                    email: String::new(),
                    phone: String::new(),
                },
                user_id,
                &scope,
            )
            .await
            .expect("Failed to create contact");

        (company.company, contact.contact)
    }
}
