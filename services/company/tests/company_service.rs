//! Behaviour of the company service over the in-memory repository

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use company::{
    CompanyService, ServiceError,
    error::RepositoryResult,
    models::{
        Company, CompanyPatch, CompanyUpdateInput, DeleteCompanyRequest, GetAuthenticatedRequest,
        GetByEmailRequest, GetByNameRequest, NewCompany, UpdateCompanyRequest,
        ValidateTokenRequest,
    },
    repositories::{CompanyRepository, InMemoryCompanyRepository},
};
use support::{create_request, login_request, registered, service, token_for};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

fn update_request(token: &str, id: &str, company: CompanyUpdateInput) -> UpdateCompanyRequest {
    UpdateCompanyRequest {
        api_version: "v1".to_string(),
        token: token.to_string(),
        id: id.to_string(),
        company,
    }
}

fn delete_request(token: &str, id: &str) -> DeleteCompanyRequest {
    DeleteCompanyRequest {
        api_version: "v1".to_string(),
        token: token.to_string(),
        id: id.to_string(),
    }
}

fn rename(name: &str) -> CompanyUpdateInput {
    CompanyUpdateInput {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn is_unauthenticated(err: &ServiceError) -> bool {
    matches!(err, ServiceError::Unauthenticated(_))
}

#[tokio::test]
async fn test_end_to_end_flow() {
    let (service, _) = service();

    let created = assert_ok!(service.create_company(create_request("a@x.com", "p1")).await);
    assert_eq!(created.status, "Created");
    assert_eq!(created.api_version, "v1");

    let login = assert_ok!(service.login(login_request("a@x.com", "p1")).await);
    assert!(!login.token.is_empty());

    let validated = assert_ok!(
        service
            .validate_token(ValidateTokenRequest {
                token: login.token.clone()
            })
            .await
    );
    assert!(validated.valid);
    assert_eq!(validated.account_id, created.id);

    let updated = assert_ok!(
        service
            .update_company(update_request(&login.token, &created.id, rename("N")))
            .await
    );
    assert_eq!((updated.matched, updated.modified), (1, 1));

    let err = assert_err!(service.login(login_request("a@x.com", "wrong")).await);
    assert!(is_unauthenticated(&err));
}

#[tokio::test]
async fn test_stored_password_is_hashed() {
    let (service, repository) = service();
    let (id, _) = registered(&service, "a@x.com", "p1").await;

    let stored = repository.get_by_id(&id).await.unwrap();
    assert_ne!(stored.password_hash, "p1");
    assert!(support::passwords().verify("p1", &stored.password_hash));
}

#[tokio::test]
async fn test_version_mismatch_fails_before_any_work() {
    let (service, repository) = service();

    let mut request = create_request("a@x.com", "p1");
    request.api_version = "v2".to_string();
    let err = assert_err!(service.create_company(request).await);
    assert!(matches!(err, ServiceError::VersionMismatch { .. }));
    assert!(repository.is_empty().await);

    let (id, token) = registered(&service, "a@x.com", "p1").await;

    let mut login = login_request("a@x.com", "p1");
    login.api_version = "v0".to_string();
    assert!(matches!(
        service.login(login).await,
        Err(ServiceError::VersionMismatch { .. })
    ));

    let mut update = update_request(&token, &id, rename("N"));
    update.api_version = "v2".to_string();
    assert!(matches!(
        service.update_company(update).await,
        Err(ServiceError::VersionMismatch { .. })
    ));

    let mut delete = delete_request(&token, &id);
    delete.api_version = "v2".to_string();
    assert!(matches!(
        service.delete_company(delete).await,
        Err(ServiceError::VersionMismatch { .. })
    ));
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_empty_api_version_is_accepted() {
    let (service, _) = service();

    let mut request = create_request("a@x.com", "p1");
    request.api_version = String::new();
    assert_ok!(service.create_company(request).await);

    let mut login = login_request("a@x.com", "p1");
    login.api_version = String::new();
    assert_ok!(service.login(login).await);
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthenticated() {
    let (service, _) = service();
    registered(&service, "a@x.com", "p1").await;

    let unknown = assert_err!(service.login(login_request("b@x.com", "p1")).await);
    let wrong = assert_err!(service.login(login_request("a@x.com", "p2")).await);

    assert!(is_unauthenticated(&unknown));
    assert_eq!(unknown.to_string(), wrong.to_string());
}

/// Store whose companies vanish between the login lookup and the activity stamp
struct DeletedDuringLogin(InMemoryCompanyRepository);

#[async_trait]
impl CompanyRepository for DeletedDuringLogin {
    async fn create(&self, company: &NewCompany) -> RepositoryResult<String> {
        self.0.create(company).await
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Company> {
        self.0.get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Company> {
        self.0.get_by_email(email).await
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Company> {
        self.0.get_by_name(name).await
    }

    async fn update(&self, patch: &CompanyPatch, id: &str) -> RepositoryResult<(u64, u64)> {
        self.0.update(patch, id).await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<u64> {
        self.0.delete(id).await
    }

    async fn update_active(&self, id: &str) -> RepositoryResult<i64> {
        self.0.delete(id).await?;
        self.0.update_active(id).await
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.0.ping().await
    }
}

#[tokio::test]
async fn test_login_of_concurrently_deleted_company_is_unauthenticated() {
    let store = InMemoryCompanyRepository::new();
    let service = CompanyService::new(
        Arc::new(DeletedDuringLogin(store.clone())),
        support::jwt(),
        support::passwords(),
    );
    assert_ok!(service.create_company(create_request("a@x.com", "p1")).await);

    let err = assert_err!(service.login(login_request("a@x.com", "p1")).await);
    assert!(is_unauthenticated(&err));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_login_records_activity() {
    let (service, repository) = service();
    let created = service
        .create_company(create_request("a@x.com", "p1"))
        .await
        .unwrap();

    // Backdate so the refresh is observable within the same second
    repository
        .update(
            &CompanyPatch {
                last_active: Some(1),
                ..Default::default()
            },
            &created.id,
        )
        .await
        .unwrap();

    service.login(login_request("a@x.com", "p1")).await.unwrap();
    assert!(repository.get_by_id(&created.id).await.unwrap().last_active > 1);
}

#[tokio::test]
async fn test_cross_account_update_and_delete_are_rejected() {
    let (service, repository) = service();
    let (victim_id, _) = registered(&service, "victim@x.com", "p1").await;
    let (_, attacker_token) = registered(&service, "attacker@x.com", "p2").await;

    let err = assert_err!(
        service
            .update_company(update_request(&attacker_token, &victim_id, rename("pwned")))
            .await
    );
    assert!(is_unauthenticated(&err));

    let err = assert_err!(
        service
            .delete_company(delete_request(&attacker_token, &victim_id))
            .await
    );
    assert!(is_unauthenticated(&err));

    // Same answer for ids that do not exist at all
    let missing = Uuid::new_v4().to_string();
    let err = assert_err!(
        service
            .update_company(update_request(&attacker_token, &missing, rename("x")))
            .await
    );
    assert!(is_unauthenticated(&err));
    let err = assert_err!(
        service
            .delete_company(delete_request(&attacker_token, &missing))
            .await
    );
    assert!(is_unauthenticated(&err));

    let victim = repository.get_by_id(&victim_id).await.unwrap();
    assert_eq!(victim.name, "Acme");
    assert_eq!(repository.len().await, 2);
}

#[tokio::test]
async fn test_empty_subject_is_rejected() {
    let (service, _) = service();
    let token = token_for("", 3600);

    let err = assert_err!(
        service
            .validate_token(ValidateTokenRequest {
                token: token.clone()
            })
            .await
    );
    assert!(is_unauthenticated(&err));

    // An empty path id does not match an empty claim either
    let err = assert_err!(service.update_company(update_request(&token, "", rename("x"))).await);
    assert!(is_unauthenticated(&err));
}

#[tokio::test]
async fn test_expired_and_tampered_tokens_are_rejected() {
    let (service, _) = service();
    let (id, token) = registered(&service, "a@x.com", "p1").await;

    let expired = token_for(&id, -10);
    let err = assert_err!(
        service
            .validate_token(ValidateTokenRequest { token: expired.clone() })
            .await
    );
    assert!(is_unauthenticated(&err));
    let err = assert_err!(
        service
            .update_company(update_request(&expired, &id, rename("x")))
            .await
    );
    assert!(is_unauthenticated(&err));

    let mut tampered: Vec<char> = token.chars().collect();
    let mid = token.rfind('.').unwrap() + 10;
    tampered[mid] = if tampered[mid] == 'x' { 'y' } else { 'x' };
    let tampered: String = tampered.into_iter().collect();

    let err = assert_err!(
        service
            .get_authenticated(GetAuthenticatedRequest { token: tampered })
            .await
    );
    assert!(is_unauthenticated(&err));
}

#[tokio::test]
async fn test_get_authenticated_returns_public_view_and_refreshes_activity() {
    let (service, repository) = service();
    let (id, token) = registered(&service, "a@x.com", "p1").await;

    repository
        .update(
            &CompanyPatch {
                last_active: Some(1),
                ..Default::default()
            },
            &id,
        )
        .await
        .unwrap();

    let response = assert_ok!(
        service
            .get_authenticated(GetAuthenticatedRequest { token })
            .await
    );
    assert_eq!(response.company.id, id);
    assert_eq!(response.company.email, "a@x.com");
    assert!(response.company.last_active > 1);
    assert_eq!(
        repository.get_by_id(&id).await.unwrap().last_active,
        response.company.last_active
    );
}

#[tokio::test]
async fn test_delete_then_get_authenticated_is_unauthenticated() {
    let (service, repository) = service();
    let (id, token) = registered(&service, "a@x.com", "p1").await;

    let deleted = assert_ok!(service.delete_company(delete_request(&token, &id)).await);
    assert_eq!(deleted.count, 1);
    assert_eq!(deleted.status, "Deleted");
    assert!(repository.is_empty().await);

    let err = assert_err!(
        service
            .get_authenticated(GetAuthenticatedRequest {
                token: token.clone()
            })
            .await
    );
    assert!(is_unauthenticated(&err));

    // The token itself is still well-formed; the record is simply gone
    let err = assert_err!(
        service
            .update_company(update_request(&token, &id, rename("N")))
            .await
    );
    assert!(matches!(err, ServiceError::NotFound));

    let again = assert_ok!(service.delete_company(delete_request(&token, &id)).await);
    assert_eq!(again.count, 0);
}

#[tokio::test]
async fn test_get_by_email_is_repeatable() {
    let (service, _) = service();
    registered(&service, "a@x.com", "p1").await;

    let first = assert_ok!(
        service
            .get_by_email(GetByEmailRequest {
                email: "a@x.com".to_string()
            })
            .await
    );
    let second = assert_ok!(
        service
            .get_by_email(GetByEmailRequest {
                email: "a@x.com".to_string()
            })
            .await
    );
    assert_eq!(first, second);

    let err = assert_err!(
        service
            .get_by_email(GetByEmailRequest {
                email: "nobody@x.com".to_string()
            })
            .await
    );
    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn test_get_by_name() {
    let (service, _) = service();
    let (id, _) = registered(&service, "a@x.com", "p1").await;

    let found = assert_ok!(
        service
            .get_by_name(GetByNameRequest {
                name: "Acme".to_string()
            })
            .await
    );
    assert_eq!(found.company.id, id);

    assert!(matches!(
        service
            .get_by_name(GetByNameRequest {
                name: "Globex".to_string()
            })
            .await,
        Err(ServiceError::NotFound)
    ));
}

#[tokio::test]
async fn test_password_change_is_hashed_once() {
    let (service, repository) = service();
    let (id, token) = registered(&service, "a@x.com", "p1").await;

    let change = CompanyUpdateInput {
        password: Some("p2".to_string()),
        ..Default::default()
    };
    let updated = assert_ok!(service.update_company(update_request(&token, &id, change)).await);
    assert_eq!((updated.matched, updated.modified), (1, 1));

    let stored = repository.get_by_id(&id).await.unwrap();
    assert_ne!(stored.password_hash, "p2");

    assert_ok!(service.login(login_request("a@x.com", "p2")).await);
    let err = assert_err!(service.login(login_request("a@x.com", "p1")).await);
    assert!(is_unauthenticated(&err));
}

#[tokio::test]
async fn test_noop_update_reports_no_modification() {
    let (service, _) = service();
    let (id, token) = registered(&service, "a@x.com", "p1").await;

    let same = assert_ok!(
        service
            .update_company(update_request(&token, &id, rename("Acme")))
            .await
    );
    assert_eq!((same.matched, same.modified), (1, 0));

    let empty = assert_ok!(
        service
            .update_company(update_request(&token, &id, CompanyUpdateInput::default()))
            .await
    );
    assert_eq!((empty.matched, empty.modified), (1, 0));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let (service, repository) = service();
    registered(&service, "a@x.com", "p1").await;

    let err = assert_err!(service.create_company(create_request("a@x.com", "p9")).await);
    assert!(matches!(err, ServiceError::AlreadyExists));
    assert_eq!(repository.len().await, 1);

    let (id, token) = registered(&service, "b@x.com", "p2").await;
    let steal = CompanyUpdateInput {
        email: Some("a@x.com".to_string()),
        ..Default::default()
    };
    let err = assert_err!(service.update_company(update_request(&token, &id, steal)).await);
    assert!(matches!(err, ServiceError::AlreadyExists));
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let (service, repository) = service();

    let err = assert_err!(service.create_company(create_request("not-an-email", "p1")).await);
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    let err = assert_err!(service.create_company(create_request("a@x.com", "")).await);
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    assert!(repository.is_empty().await);

    let (id, token) = registered(&service, "a@x.com", "p1").await;
    let blank_password = CompanyUpdateInput {
        password: Some(String::new()),
        ..Default::default()
    };
    let err = assert_err!(
        service
            .update_company(update_request(&token, &id, blank_password))
            .await
    );
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}
