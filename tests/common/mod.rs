use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use location_api_rust::auth::Claims;

/// Shared secret between the spawned server and the token helper below
pub const TEST_JWT_SECRET: &str = "location-api-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Integration tests need a live Postgres; without one they skip.
pub fn database_configured() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/location-api-rust");
        cmd.env("LOCATION_API_PORT", port.to_string())
            .env("JWT_SECRET", TEST_JWT_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Consider server ready on any non-404 response
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Direct database handle for seeding and cleanup
pub async fn pool() -> Result<PgPool> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .context("failed to connect to test database")
}

pub async fn seed_countries(pool: &PgPool) -> Result<()> {
    for (iso3, name) in [("DNK", "Denmark"), ("FRA", "France"), ("DEU", "Germany")] {
        sqlx::query("INSERT INTO countries (iso3, name) VALUES ($1, $2) ON CONFLICT (iso3) DO NOTHING")
            .bind(iso3)
            .bind(name)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Bearer token carrying the elevated role
pub fn super_token() -> String {
    let claims = Claims {
        sub: "integration-tests".to_string(),
        roles: vec!["super".to_string()],
        exp: 4102444800, // 2100-01-01
        iat: 0,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode test token")
}

/// Location names carry a uuid so runs never collide on the unique index
pub fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4())
}

pub fn location_body(name: &str, country: &str) -> Value {
    json!({
        "name": name,
        "point": {"latitude": 55.6761, "longitude": 12.5683},
        "metadata": {"phone": "+45 11 22 33 44"},
        "street": "Main Street",
        "number": "42B",
        "zipcode": "2100",
        "city": "Copenhagen",
        "country": country
    })
}
