//! Company service models

pub mod company;
pub mod requests;

pub use company::{Company, CompanyPatch, CompanyView, NewCompany};
pub use requests::{
    CompanyResponse, CompanyUpdateInput, CreateCompanyRequest, CreateCompanyResponse,
    DeleteCompanyRequest, DeleteCompanyResponse, GetAuthenticatedRequest, GetByEmailRequest,
    GetByNameRequest, LoginRequest, LoginResponse, NewCompanyInput, UpdateCompanyRequest,
    UpdateCompanyResponse, ValidateTokenRequest, ValidateTokenResponse,
};
