//! PostgreSQL company repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::migrate::Migrator;
use sqlx::{PgPool, Row};
use tracing::info;

use super::{CompanyRepository, parse_id};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{Company, CompanyPatch, NewCompany};

/// Schema migrations for the companies table
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const COMPANY_COLUMNS: &str =
    "id, email, password_hash, name, mission, location, last_active, created_at, updated_at";

/// Company repository backed by a shared PostgreSQL pool
#[derive(Clone)]
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    /// Create a new company repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> RepositoryResult<Company> {
        let query = format!(
            "SELECT {} FROM companies WHERE {} = $1 ORDER BY created_at LIMIT 1",
            COMPANY_COLUMNS, column
        );

        sqlx::query_as::<_, Company>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

/// Map a unique violation on the email constraint to `DuplicateEmail`
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::DuplicateEmail,
        _ => RepositoryError::Database(err),
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create(&self, company: &NewCompany) -> RepositoryResult<String> {
        info!("Creating new company: {}", company.email);

        let row = sqlx::query(
            r#"
            INSERT INTO companies (email, password_hash, name, mission, location, last_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&company.email)
        .bind(&company.password_hash)
        .bind(&company.name)
        .bind(&company.mission)
        .bind(&company.location)
        .bind(company.last_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        let id: uuid::Uuid = row.try_get("id")?;
        Ok(id.to_string())
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Company> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;

        let query = format!("SELECT {} FROM companies WHERE id = $1", COMPANY_COLUMNS);
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Company> {
        self.fetch_one_by("email", email).await
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Company> {
        self.fetch_one_by("name", name).await
    }

    async fn update(&self, patch: &CompanyPatch, id: &str) -> RepositoryResult<(u64, u64)> {
        let Some(id) = parse_id(id) else {
            return Ok((0, 0));
        };

        // One statement: the snapshot in `target` counts the match, the
        // guarded UPDATE only touches the row when a present field differs.
        let row = sqlx::query(
            r#"
            WITH target AS (
                SELECT id FROM companies WHERE id = $1
            ), updated AS (
                UPDATE companies
                SET email = COALESCE($2::text, email),
                    password_hash = COALESCE($3::text, password_hash),
                    name = COALESCE($4::text, name),
                    mission = COALESCE($5::text, mission),
                    location = COALESCE($6::text, location),
                    last_active = COALESCE($7::bigint, last_active),
                    updated_at = NOW()
                WHERE id = $1
                  AND (
                       ($2::text IS NOT NULL AND email IS DISTINCT FROM $2::text)
                    OR ($3::text IS NOT NULL AND password_hash IS DISTINCT FROM $3::text)
                    OR ($4::text IS NOT NULL AND name IS DISTINCT FROM $4::text)
                    OR ($5::text IS NOT NULL AND mission IS DISTINCT FROM $5::text)
                    OR ($6::text IS NOT NULL AND location IS DISTINCT FROM $6::text)
                    OR ($7::bigint IS NOT NULL AND last_active IS DISTINCT FROM $7::bigint)
                  )
                RETURNING id
            )
            SELECT (SELECT COUNT(*) FROM target) AS matched,
                   (SELECT COUNT(*) FROM updated) AS modified
            "#,
        )
        .bind(id)
        .bind(&patch.email)
        .bind(&patch.password_hash)
        .bind(&patch.name)
        .bind(&patch.mission)
        .bind(&patch.location)
        .bind(patch.last_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        let matched: i64 = row.try_get("matched")?;
        let modified: i64 = row.try_get("modified")?;
        Ok((matched as u64, modified as u64))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<u64> {
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };

        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_active(&self, id: &str) -> RepositoryResult<i64> {
        let id = parse_id(id).ok_or(RepositoryError::NotFound)?;
        let now = Utc::now().timestamp();

        let row = sqlx::query("UPDATE companies SET last_active = $2 WHERE id = $1 RETURNING last_active")
            .bind(id)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.try_get("last_active")?)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
