//! In-memory company repository
//!
//! Keeps every record in a map behind a single `RwLock`. Each operation runs
//! inside one critical section, so it observes the same atomicity the
//! PostgreSQL statements provide.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CompanyRepository, parse_id};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{Company, CompanyPatch, NewCompany};

#[derive(Clone, Default)]
pub struct InMemoryCompanyRepository {
    companies: Arc<RwLock<HashMap<Uuid, Company>>>,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored companies
    pub async fn len(&self) -> usize {
        self.companies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.companies.read().await.is_empty()
    }

    async fn find_first(&self, matches: impl Fn(&Company) -> bool) -> RepositoryResult<Company> {
        self.companies
            .read()
            .await
            .values()
            .filter(|&company| matches(company))
            .min_by_key(|company| company.created_at)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn create(&self, company: &NewCompany) -> RepositoryResult<String> {
        let mut companies = self.companies.write().await;

        if companies.values().any(|c| c.email == company.email) {
            return Err(RepositoryError::DuplicateEmail);
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        companies.insert(
            id,
            Company {
                id,
                email: company.email.clone(),
                password_hash: company.password_hash.clone(),
                name: company.name.clone(),
                mission: company.mission.clone(),
                location: company.location.clone(),
                last_active: company.last_active,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id.to_string())
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Company> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;

        self.companies
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Company> {
        self.find_first(|company| company.email == email).await
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Company> {
        self.find_first(|company| company.name == name).await
    }

    async fn update(&self, patch: &CompanyPatch, id: &str) -> RepositoryResult<(u64, u64)> {
        let Some(id) = parse_id(id) else {
            return Ok((0, 0));
        };

        let mut companies = self.companies.write().await;
        if !companies.contains_key(&id) {
            return Ok((0, 0));
        }

        if let Some(email) = &patch.email {
            if companies.values().any(|c| c.id != id && &c.email == email) {
                return Err(RepositoryError::DuplicateEmail);
            }
        }

        let Some(company) = companies.get_mut(&id) else {
            return Ok((0, 0));
        };

        if !patch.changes(company) {
            return Ok((1, 0));
        }

        patch.clone().apply(company);
        company.updated_at = Utc::now();
        Ok((1, 1))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<u64> {
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };

        let removed = self.companies.write().await.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn update_active(&self, id: &str) -> RepositoryResult<i64> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;

        let mut companies = self.companies.write().await;
        let company = companies.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        company.last_active = Utc::now().timestamp();

        Ok(company.last_active)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
