use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::database::{self, DatabaseConfig};
use company::{
    AppState, CompanyService,
    config::{ServerConfig, StorageBackend},
    jwt::{JwtConfig, JwtService},
    password::{PasswordConfig, PasswordService},
    repositories::{
        CompanyRepository, InMemoryCompanyRepository, PostgresCompanyRepository,
        postgres::MIGRATOR,
    },
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting company service");

    let server_config = ServerConfig::from_env()?;

    // The pool is opened here and closed after the server stops
    let (repository, pool): (Arc<dyn CompanyRepository>, Option<PgPool>) = match server_config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            if !database::health_check(&pool).await? {
                anyhow::bail!("Failed to connect to database");
            }
            database::run_migrations(&pool, &MIGRATOR).await?;

            let repository: Arc<dyn CompanyRepository> =
                Arc::new(PostgresCompanyRepository::new(pool.clone()));
            (repository, Some(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; companies will not survive a restart");
            let repository: Arc<dyn CompanyRepository> = Arc::new(InMemoryCompanyRepository::new());
            (repository, None)
        }
    };

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;
    let password_service = PasswordService::new(PasswordConfig::from_env())?;

    let app_state = AppState {
        company_service: CompanyService::new(repository, jwt_service, password_service),
    };

    let app = routes::create_router(app_state);

    let addr = server_config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Company service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        database::close_pool(pool).await;
    }

    info!("Company service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down company service");
}
