pub mod candidate;
pub mod company;
pub mod contact;
pub mod error;
pub mod invite;
pub mod response;
pub mod scope;
pub mod search;
pub mod team;
pub mod todo;
pub mod user;
