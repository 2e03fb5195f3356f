use axum::http::{Method, StatusCode};
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use location_api_rust::database::manager::DatabaseManager;
use location_api_rust::config;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Location API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("LOCATION_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Location API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Resources
        .merge(location_routes())
        .merge(country_routes())
        .fallback(fallback)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn location_routes() -> Router {
    use location_api_rust::handlers::locations;

    Router::new()
        .route(
            "/api/v1/locations",
            get(locations::list).post(locations::post),
        )
        .route(
            "/api/v1/locations/:id",
            get(locations::get)
                .patch(locations::patch)
                .delete(locations::delete),
        )
}

fn country_routes() -> Router {
    use location_api_rust::handlers::countries;

    Router::new()
        .route("/api/v1/countries", get(countries::list))
        .route("/api/v1/countries/:iso3", get(countries::get))
}

/// Any OPTIONS probe answers 204; everything else unmatched is a 404
async fn fallback(method: Method) -> StatusCode {
    if method == Method::OPTIONS {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Location API (Rust)",
        "version": version,
        "description": "Location and country management API built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "locations": "/api/v1/locations[/:id] (GET public; POST/PATCH/DELETE restricted)",
            "countries": "/api/v1/countries[/:iso3] (GET public)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
