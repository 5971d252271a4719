//! Application state shared across handlers

use crate::service::CompanyService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub company_service: CompanyService,
}
