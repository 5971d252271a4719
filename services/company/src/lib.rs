//! Company account service
//!
//! Companies register with an email and password, log in for a stateless
//! session token, and use that token to read, update or delete their own
//! record. [`service::CompanyService`] holds the rules; storage sits behind
//! [`repositories::CompanyRepository`].

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod state;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
pub use service::{API_VERSION, CompanyService};
pub use state::AppState;
