//! Request and response contracts of the company service
//!
//! These are transport-agnostic; the HTTP layer deserializes bodies into
//! them (or builds them from path, query and header parts) and serializes
//! the responses as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::CompanyView;

/// Company fields supplied on creation
#[derive(Clone, Deserialize)]
pub struct NewCompanyInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub location: String,
}

impl fmt::Debug for NewCompanyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCompanyInput")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("mission", &self.mission)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Request for company creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub api_version: String,
    pub company: NewCompanyInput,
}

/// Response for company creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyResponse {
    pub api_version: String,
    pub status: String,
    pub id: String,
}

/// Request for login
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub api_version: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("api_version", &self.api_version)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Response for login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub api_version: String,
    pub status: String,
    pub token: String,
}

/// Request for token validation
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}

/// Response for token validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub account_id: String,
}

/// Request for the company owning a token
#[derive(Debug, Clone, Deserialize)]
pub struct GetAuthenticatedRequest {
    pub token: String,
}

/// Request for a company by email
#[derive(Debug, Clone, Deserialize)]
pub struct GetByEmailRequest {
    pub email: String,
}

/// Request for a company by name
#[derive(Debug, Clone, Deserialize)]
pub struct GetByNameRequest {
    pub name: String,
}

/// Response carrying a single public company view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub api_version: String,
    pub status: String,
    pub company: CompanyView,
}

/// Company fields that may be changed by an update
#[derive(Clone, Default, Deserialize)]
pub struct CompanyUpdateInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl fmt::Debug for CompanyUpdateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanyUpdateInput")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("mission", &self.mission)
            .field("location", &self.location)
            .finish()
    }
}

/// Request for a company update
#[derive(Debug, Clone)]
pub struct UpdateCompanyRequest {
    pub api_version: String,
    pub token: String,
    pub id: String,
    pub company: CompanyUpdateInput,
}

/// Response for a company update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyResponse {
    pub api_version: String,
    pub status: String,
    pub matched: u64,
    pub modified: u64,
}

/// Request for a company deletion
#[derive(Debug, Clone)]
pub struct DeleteCompanyRequest {
    pub api_version: String,
    pub token: String,
    pub id: String,
}

/// Response for a company deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCompanyResponse {
    pub api_version: String,
    pub status: String,
    pub count: u64,
}
