//! Staffdesk Admin Server
//!
//! Production server for the role-and-permission administration APIs.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SD_API_PORT` | `8080` | HTTP API port |
//! | `SD_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `SD_MONGO_DB` | `staffdesk` | MongoDB database name |
//! | `SD_JWT_SECRET` | dev default | HS256 JWT secret |
//! | `SD_JWT_ISSUER` | `staffdesk` | JWT issuer claim |
//! | `SD_DEV_MODE` | `false` | Seed development data on startup |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use sd_platform::seed::DevDataSeeder;
use sd_platform::shared::middleware::{AppState, AuthLayer};
use sd_platform::{
    roles_router, AuthConfig, AuthService, AuthorizationService, MongoPermissionGroupStore,
    MongoRoleStore, MongoUserStore, PermissionCache, RolesState,
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
    sd_common::logging::init_logging("sd-admin-server");

    info!("Starting Staffdesk Admin Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("SD_API_PORT", 8080);
    let mongo_url = env_or("SD_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("SD_MONGO_DB", "staffdesk");
    let jwt_secret = env_or("SD_JWT_SECRET", "dev-secret-change-in-production");
    let jwt_issuer = env_or("SD_JWT_ISSUER", "staffdesk");

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    // Seed development data if in dev mode
    let dev_mode = std::env::var("SD_DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if dev_mode {
        let seeder = DevDataSeeder::new(db.clone());
        if let Err(e) = seeder.seed().await {
            tracing::warn!("Dev data seeding skipped (data may already exist): {}", e);
        }
    }

    // Initialize stores
    let role_store = Arc::new(MongoRoleStore::new(&db));
    let user_store = Arc::new(MongoUserStore::new(&db));
    let group_store = Arc::new(MongoPermissionGroupStore::new(&db));
    info!("Stores initialized");

    // Permission cache: the authorization layer reads through it, role
    // mutations invalidate it
    let cache = Arc::new(PermissionCache::new());

    // Initialize auth services
    let auth_config = AuthConfig {
        secret_key: jwt_secret,
        issuer: jwt_issuer,
        access_token_expiry_secs: 3600,
    };
    let auth_service = Arc::new(AuthService::new(auth_config));
    let authz_service = Arc::new(AuthorizationService::new(
        role_store.clone(),
        group_store.clone(),
        cache.clone(),
    ));
    info!("Auth services initialized");

    // Create AppState
    let app_state = AppState {
        auth_service,
        authz_service,
    };

    // Build API state
    let roles_state = RolesState {
        role_store,
        user_store,
        group_store,
        cache,
    };

    // Build API router using OpenApiRouter for auto-collected OpenAPI paths
    let (router, mut openapi) = OpenApiRouter::new()
        .nest("/api/admin/roles", roles_router(roles_state))
        .split_for_parts();

    // Update OpenAPI info
    openapi.info.title = "Staffdesk Admin API".to_string();
    openapi.info.version = "1.0.0".to_string();
    openapi.info.description =
        Some("REST APIs for role and permission administration".to_string());

    let app = Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        // OpenAPI / Swagger UI with auto-collected paths
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        // Auth middleware
        .layer(AuthLayer::new(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let api_listener = TcpListener::bind(&api_addr).await?;
    let api_task = tokio::spawn(async move {
        axum::serve(api_listener, app).await.unwrap();
    });

    info!("Staffdesk Admin Server started");
    info!("Press Ctrl+C to shutdown");

    // Wait for shutdown
    shutdown_signal().await;
    info!("Shutdown signal received...");

    api_task.abort();

    info!("Staffdesk Admin Server shutdown complete");
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
