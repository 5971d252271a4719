//! Shared fixtures for the company service integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use company::{
    CompanyService,
    jwt::{Claims, JwtConfig, JwtKeys, JwtService},
    models::{CreateCompanyRequest, LoginRequest, NewCompanyInput},
    password::{PasswordConfig, PasswordService},
    repositories::InMemoryCompanyRepository,
};

pub const SECRET: &str = "integration-test-secret";

pub fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        keys: JwtKeys::Secret(SECRET.to_string()),
        token_expiry: 3600,
        issuer: "company-service".to_string(),
    })
    .expect("jwt service")
}

pub fn passwords() -> PasswordService {
    PasswordService::new(PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("password service")
}

/// Service over a fresh in-memory store; the store handle shares its data
pub fn service() -> (CompanyService, InMemoryCompanyRepository) {
    let repository = InMemoryCompanyRepository::new();
    let service = CompanyService::new(Arc::new(repository.clone()), jwt(), passwords());
    (service, repository)
}

pub fn create_request(email: &str, password: &str) -> CreateCompanyRequest {
    CreateCompanyRequest {
        api_version: "v1".to_string(),
        company: NewCompanyInput {
            email: email.to_string(),
            password: password.to_string(),
            name: "Acme".to_string(),
            mission: "Make anvils".to_string(),
            location: "Arizona".to_string(),
        },
    }
}

pub fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        api_version: "v1".to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Token signed with the shared secret for an arbitrary subject and expiry offset
pub fn token_for(sub: &str, expires_in: i64) -> String {
    let now = Utc::now().timestamp();
    jwt()
        .sign(&Claims {
            sub: sub.to_string(),
            email: "forged@x.com".to_string(),
            iat: now - 60,
            exp: now + expires_in,
            iss: "company-service".to_string(),
        })
        .expect("signed token")
}

/// Create a company and log it in, returning `(id, token)`
pub async fn registered(service: &CompanyService, email: &str, password: &str) -> (String, String) {
    let created = service
        .create_company(create_request(email, password))
        .await
        .expect("create company");
    let login = service
        .login(login_request(email, password))
        .await
        .expect("login");
    (created.id, login.token)
}
