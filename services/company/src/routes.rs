//! Company service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ServiceError,
    middleware::BearerToken,
    models::{
        CompanyUpdateInput, CreateCompanyRequest, DeleteCompanyRequest, GetAuthenticatedRequest,
        GetByEmailRequest, GetByNameRequest, LoginRequest, UpdateCompanyRequest,
        ValidateTokenRequest,
    },
    state::AppState,
};

/// Body of an update request; the token and id come from the header and path
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyBody {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub company: CompanyUpdateInput,
}

/// Query string of a delete request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVersionQuery {
    #[serde(default)]
    pub api_version: String,
}

/// Create the router for the company service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/validate", get(validate_token))
        .route("/v1/companies", post(create_company))
        .route("/v1/companies/me", get(get_authenticated))
        .route("/v1/companies/email/:email", get(get_by_email))
        .route("/v1/companies/name/:name", get(get_by_name))
        .route(
            "/v1/companies/:id",
            patch(update_company).delete(delete_company),
        )
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = state.company_service.health().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "service": "company-service"
        })),
    )
}

/// Company registration endpoint
pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state.company_service.create_company(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Company login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state.company_service.login(payload).await?;
    Ok(Json(response))
}

/// Token validation endpoint
pub async fn validate_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state
        .company_service
        .validate_token(ValidateTokenRequest { token })
        .await?;
    Ok(Json(response))
}

/// Profile of the authenticated company
pub async fn get_authenticated(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state
        .company_service
        .get_authenticated(GetAuthenticatedRequest { token })
        .await?;
    Ok(Json(response))
}

pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state
        .company_service
        .get_by_email(GetByEmailRequest { email })
        .await?;
    Ok(Json(response))
}

pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state
        .company_service
        .get_by_name(GetByNameRequest { name })
        .await?;
    Ok(Json(response))
}

/// Update endpoint; only the owner of the token may update
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    Json(body): Json<UpdateCompanyBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state
        .company_service
        .update_company(UpdateCompanyRequest {
            api_version: body.api_version,
            token,
            id,
            company: body.company,
        })
        .await?;
    Ok(Json(response))
}

/// Delete endpoint; only the owner of the token may delete
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    Query(query): Query<ApiVersionQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state
        .company_service
        .delete_company(DeleteCompanyRequest {
            api_version: query.api_version,
            token,
            id,
        })
        .await?;
    Ok(Json(response))
}
