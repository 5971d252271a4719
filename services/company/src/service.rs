//! Company account service
//!
//! Validates requests, enforces token ownership, and drives the password
//! hasher, token service and repository. Every caller-visible error leaves
//! through [`ServiceError`].
//!
//! Operations that chain repository calls (login, update and authenticated
//! reads all finish with `update_active`) fail as a whole when a later step
//! fails. Each step is safe to replay: `update` re-applies the same values
//! and `update_active` only stamps the current time.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{RepositoryError, ServiceError, ServiceResult};
use crate::jwt::{Claims, JwtService};
use crate::models::{
    CompanyPatch, CompanyResponse, CompanyUpdateInput, CompanyView, CreateCompanyRequest,
    CreateCompanyResponse, DeleteCompanyRequest, DeleteCompanyResponse, GetAuthenticatedRequest,
    GetByEmailRequest, GetByNameRequest, LoginRequest, LoginResponse, NewCompany,
    UpdateCompanyRequest, UpdateCompanyResponse, ValidateTokenRequest, ValidateTokenResponse,
};
use crate::password::PasswordService;
use crate::repositories::CompanyRepository;
use crate::validation::{validate_email, validate_password, validate_profile_field};

/// API version implemented by this service
pub const API_VERSION: &str = "v1";

#[derive(Clone)]
pub struct CompanyService {
    repository: Arc<dyn CompanyRepository>,
    jwt_service: JwtService,
    password_service: PasswordService,
}

impl CompanyService {
    pub fn new(
        repository: Arc<dyn CompanyRepository>,
        jwt_service: JwtService,
        password_service: PasswordService,
    ) -> Self {
        Self {
            repository,
            jwt_service,
            password_service,
        }
    }

    /// Reject requests for an API version other than [`API_VERSION`].
    /// An empty version means the caller did not ask for one.
    fn check_api(&self, api: &str) -> ServiceResult<()> {
        if !api.is_empty() && api != API_VERSION {
            return Err(ServiceError::VersionMismatch {
                implemented: API_VERSION,
                requested: api.to_string(),
            });
        }
        Ok(())
    }

    /// Decode `token` and require that it was issued to company `id`
    fn authorize(&self, token: &str, id: &str) -> ServiceResult<Claims> {
        let claims = self.jwt_service.decode(token)?;

        if claims.sub.is_empty() || claims.sub != id {
            warn!("Token for company {} used against company {}", claims.sub, id);
            return Err(ServiceError::INVALID_TOKEN);
        }

        Ok(claims)
    }

    /// Create a new company
    pub async fn create_company(
        &self,
        req: CreateCompanyRequest,
    ) -> ServiceResult<CreateCompanyResponse> {
        self.check_api(&req.api_version)?;

        let input = req.company;
        validate_email(&input.email).map_err(ServiceError::InvalidArgument)?;
        validate_password(&input.password).map_err(ServiceError::InvalidArgument)?;
        validate_profile_field("Name", &input.name).map_err(ServiceError::InvalidArgument)?;
        validate_profile_field("Mission", &input.mission)
            .map_err(ServiceError::InvalidArgument)?;
        validate_profile_field("Location", &input.location)
            .map_err(ServiceError::InvalidArgument)?;

        info!("Creating company: {}", input.email);

        let password_hash = self.password_service.hash_blocking(input.password).await?;

        let id = self
            .repository
            .create(&NewCompany {
                email: input.email,
                password_hash,
                name: input.name,
                mission: input.mission,
                location: input.location,
                last_active: chrono::Utc::now().timestamp(),
            })
            .await?;

        info!("Company created: {}", id);

        Ok(CreateCompanyResponse {
            api_version: API_VERSION.to_string(),
            status: "Created".to_string(),
            id,
        })
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, req: LoginRequest) -> ServiceResult<LoginResponse> {
        self.check_api(&req.api_version)?;

        info!("Login attempt for company: {}", req.email);

        let company = match self.repository.get_by_email(&req.email).await {
            Ok(company) => company,
            Err(RepositoryError::NotFound) => {
                self.password_service
                    .verify_unknown_blocking(req.password)
                    .await;
                warn!("Login rejected for {}", req.email);
                return Err(ServiceError::INVALID_CREDENTIALS);
            }
            Err(e) => return Err(e.into()),
        };

        let verified = self
            .password_service
            .verify_blocking(req.password, company.password_hash.clone())
            .await;
        if !verified {
            warn!("Login rejected for {}", req.email);
            return Err(ServiceError::INVALID_CREDENTIALS);
        }

        let token = self.jwt_service.encode(&company)?;

        // Deleted since the lookup
        self.repository
            .update_active(&company.id.to_string())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::INVALID_CREDENTIALS,
                other => other.into(),
            })?;

        Ok(LoginResponse {
            api_version: API_VERSION.to_string(),
            status: "Success".to_string(),
            token,
        })
    }

    /// Check a session token and report whom it was issued to
    pub async fn validate_token(
        &self,
        req: ValidateTokenRequest,
    ) -> ServiceResult<ValidateTokenResponse> {
        let claims = self.jwt_service.decode(&req.token)?;

        if claims.sub.is_empty() {
            warn!("Token without a company id presented");
            return Err(ServiceError::INVALID_TOKEN);
        }

        Ok(ValidateTokenResponse {
            valid: true,
            account_id: claims.sub,
        })
    }

    /// Return the company a session token was issued to, recording the activity
    pub async fn get_authenticated(
        &self,
        req: GetAuthenticatedRequest,
    ) -> ServiceResult<CompanyResponse> {
        let claims = self.jwt_service.decode(&req.token)?;

        let mut company = self
            .repository
            .get_by_id(&claims.sub)
            .await
            .map_err(token_lookup_error)?;

        company.last_active = self
            .repository
            .update_active(&claims.sub)
            .await
            .map_err(token_lookup_error)?;

        Ok(CompanyResponse {
            api_version: API_VERSION.to_string(),
            status: "Success".to_string(),
            company: company.into(),
        })
    }

    /// Look a company up by email
    pub async fn get_by_email(&self, req: GetByEmailRequest) -> ServiceResult<CompanyResponse> {
        let company = self.repository.get_by_email(&req.email).await?;
        Ok(found(company.into()))
    }

    /// Look a company up by name
    pub async fn get_by_name(&self, req: GetByNameRequest) -> ServiceResult<CompanyResponse> {
        let company = self.repository.get_by_name(&req.name).await?;
        Ok(found(company.into()))
    }

    /// Update the company a session token was issued to
    pub async fn update_company(
        &self,
        req: UpdateCompanyRequest,
    ) -> ServiceResult<UpdateCompanyResponse> {
        self.check_api(&req.api_version)?;
        self.authorize(&req.token, &req.id)?;

        let patch = self.build_patch(req.company).await?;

        info!("Updating company: {}", req.id);

        let (matched, modified) = self.repository.update(&patch, &req.id).await?;
        if matched == 0 {
            return Err(ServiceError::NotFound);
        }

        self.repository.update_active(&req.id).await?;

        Ok(UpdateCompanyResponse {
            api_version: API_VERSION.to_string(),
            status: "Updated".to_string(),
            matched,
            modified,
        })
    }

    /// Delete the company a session token was issued to
    pub async fn delete_company(
        &self,
        req: DeleteCompanyRequest,
    ) -> ServiceResult<DeleteCompanyResponse> {
        self.check_api(&req.api_version)?;
        self.authorize(&req.token, &req.id)?;

        info!("Deleting company: {}", req.id);

        let count = self.repository.delete(&req.id).await?;

        Ok(DeleteCompanyResponse {
            api_version: API_VERSION.to_string(),
            status: "Deleted".to_string(),
            count,
        })
    }

    /// Whether the storage engine is reachable
    pub async fn health(&self) -> bool {
        self.repository.ping().await.is_ok()
    }

    /// Validate update input and hash a new password, if any
    async fn build_patch(&self, input: CompanyUpdateInput) -> ServiceResult<CompanyPatch> {
        if let Some(email) = &input.email {
            validate_email(email).map_err(ServiceError::InvalidArgument)?;
        }
        for (field, value) in [
            ("Name", &input.name),
            ("Mission", &input.mission),
            ("Location", &input.location),
        ] {
            if let Some(value) = value {
                validate_profile_field(field, value).map_err(ServiceError::InvalidArgument)?;
            }
        }

        let password_hash = match input.password {
            Some(password) => {
                validate_password(&password).map_err(ServiceError::InvalidArgument)?;
                Some(self.password_service.hash_blocking(password).await?)
            }
            None => None,
        };

        Ok(CompanyPatch {
            email: input.email,
            password_hash,
            name: input.name,
            mission: input.mission,
            location: input.location,
            last_active: None,
        })
    }
}

/// A token naming a company that cannot be found is an invalid token
fn token_lookup_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::INVALID_TOKEN,
        other => other.into(),
    }
}

fn found(company: CompanyView) -> CompanyResponse {
    CompanyResponse {
        api_version: API_VERSION.to_string(),
        status: "Success".to_string(),
        company,
    }
}
