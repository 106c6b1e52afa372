//! ClipCast Accounts Server
//!
//! Production server for the account REST API:
//! - Auth: register, login, logout, refresh-token
//! - Users: change-password, me, details, avatar, cover-image
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CC_API_PORT` | `8080` | HTTP API port |
//! | `CC_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `CC_MONGO_DB` | `clipcast` | MongoDB database name |
//! | `CC_ACCESS_TOKEN_SECRET` | - | Access token signing secret (required) |
//! | `CC_REFRESH_TOKEN_SECRET` | - | Refresh token signing secret (required, distinct) |
//! | `CC_ACCESS_TOKEN_TTL_SECS` | `900` | Access token lifetime |
//! | `CC_REFRESH_TOKEN_TTL_SECS` | `864000` | Refresh token lifetime |
//! | `CC_MEDIA_UPLOAD_URL` | - | Media host upload endpoint (required) |
//! | `CC_MEDIA_API_KEY` | - | Media host API key (optional) |
//! | `CC_UPLOAD_TEMP_DIR` | `./tmp/uploads` | Staging directory for multipart files |
//! | `RUST_LOG` | `info` | Log level |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Extension, Router, response::Json, routing::get};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cc_accounts::api::{
    AccountsApiDoc, AppState, AuthApiState, UsersState, auth_router, users_router,
};
use cc_accounts::repository::{CredentialStore, UserRepository, ensure_indexes};
use cc_accounts::service::{
    MediaHostClient, MediaUploader, PasswordService, RegistrationService, SessionService,
    TokenConfig, TokenService,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting ClipCast Accounts Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("CC_API_PORT", 8080);
    let mongo_url = env_or("CC_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("CC_MONGO_DB", "clipcast");

    let access_secret =
        std::env::var("CC_ACCESS_TOKEN_SECRET").context("CC_ACCESS_TOKEN_SECRET is required")?;
    let refresh_secret =
        std::env::var("CC_REFRESH_TOKEN_SECRET").context("CC_REFRESH_TOKEN_SECRET is required")?;

    let media_upload_url =
        std::env::var("CC_MEDIA_UPLOAD_URL").context("CC_MEDIA_UPLOAD_URL is required")?;
    let media_api_key = std::env::var("CC_MEDIA_API_KEY").ok();

    let staging_dir = PathBuf::from(env_or("CC_UPLOAD_TEMP_DIR", "./tmp/uploads"));
    tokio::fs::create_dir_all(&staging_dir)
        .await
        .with_context(|| format!("failed to create staging dir {}", staging_dir.display()))?;

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    ensure_indexes(&db).await?;

    // Initialize services
    let passwords = Arc::new(PasswordService::new());
    let store: Arc<dyn CredentialStore> = Arc::new(UserRepository::new(&db, passwords));

    let token_service = Arc::new(TokenService::new(TokenConfig {
        access_secret,
        refresh_secret,
        access_ttl_secs: env_or_parse("CC_ACCESS_TOKEN_TTL_SECS", 900),
        refresh_ttl_secs: env_or_parse("CC_REFRESH_TOKEN_TTL_SECS", 864_000),
    })?);

    let session_service = Arc::new(SessionService::new(store.clone(), token_service.clone()));

    let media: Arc<dyn MediaUploader> = Arc::new(MediaHostClient::new(
        reqwest::Client::new(),
        media_upload_url,
        media_api_key,
    ));
    let registration_service = Arc::new(RegistrationService::new(store.clone(), media.clone()));
    info!("Services initialized");

    // Build API states
    let app_state = AppState {
        tokens: token_service,
    };
    let auth_state = AuthApiState {
        session: session_service.clone(),
        registration: registration_service,
        staging_dir: staging_dir.clone(),
    };
    let users_state = UsersState {
        store,
        media,
        session: session_service,
        staging_dir,
    };

    // Build the router
    let app = Router::new()
        .nest(
            "/api/v1/users",
            auth_router(auth_state).merge(users_router(users_state)),
        )
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", AccountsApiDoc::openapi()))
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let listener = TcpListener::bind(&api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ClipCast Accounts Server shutdown complete");
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
