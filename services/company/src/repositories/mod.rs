//! Company storage
//!
//! [`CompanyRepository`] is the only storage interface the service layer
//! sees. Identifiers cross it as strings; an identifier that is not a
//! well-formed UUID behaves exactly like one that does not exist.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::{Company, CompanyPatch, NewCompany};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCompanyRepository;
pub use postgres::PostgresCompanyRepository;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Store a new company and return its identifier
    async fn create(&self, company: &NewCompany) -> RepositoryResult<String>;

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Company>;

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Company>;

    /// Oldest company with exactly this name
    async fn get_by_name(&self, name: &str) -> RepositoryResult<Company>;

    /// Apply the present fields of `patch`; returns `(matched, modified)`
    async fn update(&self, patch: &CompanyPatch, id: &str) -> RepositoryResult<(u64, u64)>;

    /// Returns the number of deleted records
    async fn delete(&self, id: &str) -> RepositoryResult<u64>;

    /// Set `last_active` to now without touching any other field
    async fn update_active(&self, id: &str) -> RepositoryResult<i64>;

    /// Check that the storage engine is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}

pub(crate) fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}
