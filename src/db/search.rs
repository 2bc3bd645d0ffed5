use crate::db::postgres_service::PostgresService;
use crate::db::scoped::list_in_scope;
use crate::types::company::CompanyView;
use crate::types::contact::ContactView;
use crate::types::error::AppError;
use crate::types::scope::Scope;
use crate::types::search::SearchResults;
use chrono::{DateTime, Utc};
use entity::company::Entity as Company;
use entity::contact::Entity as Contact;
use entity::note::Entity as Note;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

impl PostgresService {
    /// Substring search over contacts and companies, inside the caller's
    /// scope only. Matching is case-insensitive for both kinds, so the
    /// filtering runs in memory over the scoped rows rather than through
    /// SQL LIKE.
    pub async fn search(&self, scope: &Scope, query: &str) -> Result<SearchResults, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults {
                contacts: vec![],
                companies: vec![],
            });
        }

        let companies = list_in_scope::<Company, _>(&self.db, scope).await?;
        let contacts = list_in_scope::<Contact, _>(&self.db, scope).await?;

        let company_names: HashMap<Uuid, String> = companies
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();
        // A name hit on the company also surfaces its contacts.
        let matching_company_ids: HashSet<Uuid> = companies
            .iter()
            .filter(|c| contains_ci(&c.name, query))
            .map(|c| c.id)
            .collect();

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for c in &contacts {
            *counts.entry(c.company_id).or_default() += 1;
        }

        let mut last_notes: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
        for note in list_in_scope::<Note, _>(&self.db, scope).await? {
            last_notes
                .entry(note.contact_id)
                .and_modify(|d| *d = (*d).max(note.created_at))
                .or_insert(note.created_at);
        }

        let contact_views = contacts
            .into_iter()
            .filter(|c| {
                contains_ci(&c.name, query)
                    || contains_ci(&c.role, query)
                    || contains_ci(&c.department, query)
                    || contains_ci(&c.description, query)
                    || contains_ci(&c.email, query)
                    || matching_company_ids.contains(&c.company_id)
            })
            .map(|contact| ContactView {
                company_name: company_names
                    .get(&contact.company_id)
                    .cloned()
                    .unwrap_or_default(),
                last_note_date: last_notes.get(&contact.id).copied(),
                contact,
            })
            .collect();

        let company_views = companies
            .into_iter()
            .filter(|c| contains_ci(&c.name, query) || contains_ci(&c.technologies, query))
            .map(|company| {
                let contact_count = counts.get(&company.id).copied().unwrap_or(0);
                CompanyView {
                    company,
                    contact_count,
                }
            })
            .collect();

        Ok(SearchResults {
            contacts: contact_views,
            companies: company_views,
        })
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
