pub mod candidates;
pub mod companies;
pub mod contacts;
pub mod invites;
pub mod notes;
pub mod postgres_service;
pub mod scoped;
pub mod search;
pub mod todos;
pub mod users;
pub mod workspaces;
