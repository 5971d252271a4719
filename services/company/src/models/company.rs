//! Company model and its public projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Company entity as stored by a repository.
///
/// Deliberately not `Serialize`: the only way a company leaves the service
/// is through [`CompanyView`], which has no password field.
#[derive(Clone, PartialEq, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub mission: String,
    pub location: String,
    /// Unix seconds of the last authenticated activity
    pub last_active: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Company")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("name", &self.name)
            .field("mission", &self.mission)
            .field("location", &self.location)
            .field("last_active", &self.last_active)
            .finish()
    }
}

/// New company creation payload. `password_hash` must already be hashed.
#[derive(Clone)]
pub struct NewCompany {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub mission: String,
    pub location: String,
    pub last_active: i64,
}

/// Field-scoped company update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub mission: Option<String>,
    pub location: Option<String>,
    pub last_active: Option<i64>,
}

impl CompanyPatch {
    /// Whether applying the patch to `company` would change anything
    pub fn changes(&self, company: &Company) -> bool {
        fn differs<T: PartialEq>(new: &Option<T>, current: &T) -> bool {
            new.as_ref().is_some_and(|value| value != current)
        }

        differs(&self.email, &company.email)
            || differs(&self.password_hash, &company.password_hash)
            || differs(&self.name, &company.name)
            || differs(&self.mission, &company.mission)
            || differs(&self.location, &company.location)
            || differs(&self.last_active, &company.last_active)
    }

    /// Apply the present fields to `company`
    pub fn apply(self, company: &mut Company) {
        if let Some(email) = self.email {
            company.email = email;
        }
        if let Some(password_hash) = self.password_hash {
            company.password_hash = password_hash;
        }
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(mission) = self.mission {
            company.mission = mission;
        }
        if let Some(location) = self.location {
            company.location = location;
        }
        if let Some(last_active) = self.last_active {
            company.last_active = last_active;
        }
    }
}

/// Public view of a company, safe to return to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub mission: String,
    pub location: String,
    pub last_active: i64,
}

impl From<Company> for CompanyView {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.to_string(),
            email: company.email,
            name: company.name,
            mission: company.mission,
            location: company.location,
            last_active: company.last_active,
        }
    }
}
