use std::sync::Arc;

use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use welfare_api::database::models::Rules;
use welfare_api::handlers::{self, AppState};
use welfare_api::middleware::auth::authenticate_request;
use welfare_api::validation::{config as attribute_config, messages};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = welfare_api::config::config();
    tracing::info!("Starting Welfare API in {:?} mode", config.environment);

    // Building every rule set up front is the misconfiguration check: a
    // validation document out of step with the code stops the deploy here.
    let rules = Rules::build(
        attribute_config::registry(),
        messages::catalog(),
        &config.validation.default_locale,
    )
    .unwrap_or_else(|e| panic!("validation configuration error: {}", e));

    let app = app(AppState {
        rules: Arc::new(rules),
    });

    // Allow tests or deployments to override port via env
    let port = std::env::var("WELFARE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Welfare API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes(state.clone()))
        .merge(protected_routes(state))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes(state: AppState) -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/signup", post(auth::signup))
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router {
    use handlers::{auth, customers, departments, users, work_records};

    Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route(
            "/api/v1/customers",
            get(customers::index).post(customers::create),
        )
        .route(
            "/api/v1/customers/:id",
            get(customers::show)
                .put(customers::update)
                .patch(customers::update)
                .delete(customers::destroy),
        )
        .route(
            "/api/v1/departments",
            get(departments::index).post(departments::create),
        )
        .route("/api/v1/users", get(users::index))
        .route("/api/v1/users/:id", get(users::show))
        .route(
            "/api/v1/work_records",
            get(work_records::index).post(work_records::create),
        )
        .route("/api/v1/work_records/:id", get(work_records::show))
        .route_layer(axum::middleware::from_fn(authenticate_request))
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Welfare API",
        "version": version,
        "description": "Staff, customer, and work record tracking for welfare offices",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/api/v1/auth/login, /api/v1/auth/signup (public), /api/v1/auth/me (bearer)",
            "customers": "/api/v1/customers[/:id] (bearer)",
            "departments": "/api/v1/departments (bearer)",
            "users": "/api/v1/users[/:id] (bearer)",
            "work_records": "/api/v1/work_records[/:id] (bearer)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match welfare_api::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
