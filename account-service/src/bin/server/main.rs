use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use account_service::config::Config;
use account_service::config::LogConfig;
use account_service::config::LogFormat;
use account_service::domain::user::service::CredentialService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::SigningSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Notify;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    init_tracing(&config.log);

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );
    tracing::info!(
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        max_connections = config.database.max_connections,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    let signing_secret = SigningSecret::new(config.jwt.secret.as_bytes())?;
    let password_hasher = PasswordHasher::with_cost(config.password)?;
    let authenticator = Arc::new(
        Authenticator::new(&signing_secret, &config.jwt.issuer)
            .with_password_hasher(password_hasher),
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let credential_service = Arc::new(CredentialService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service, authenticator, &config.server);

    let shutdown = Arc::new(Notify::new());
    let drain = Arc::clone(&shutdown);
    let mut http_server = tokio::spawn(
        axum::serve(http_listener, http_application)
            .with_graceful_shutdown(async move { drain.notified().await })
            .into_future(),
    );

    tokio::select! {
        result = &mut http_server => {
            result??;
        }
        () = shutdown_signal() => {
            shutdown.notify_one();
            let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
            match tokio::time::timeout(grace, &mut http_server).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = config.server.shutdown_timeout_secs,
                        "Graceful shutdown timed out, aborting in-flight requests"
                    );
                    http_server.abort();
                }
            }
        }
    }

    pg_pool.close().await;
    tracing::info!("Server exited");

    Ok(())
}

fn init_tracing(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
