use std::time::Instant;

use async_trait::async_trait;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use bookstore_kernel::settings::Environment;
use bookstore_kernel::{InitCtx, Module};

// Process start reference for the uptime field; forced during init so the
// clock starts at bootstrap rather than on the first request.
static STARTED: Lazy<Instant> = Lazy::new(Instant::now);

/// Liveness and readiness probes
pub struct HealthModule {
    environment: Environment,
}

impl HealthModule {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }
}

#[async_trait]
impl Module for HealthModule {
    fn name(&self) -> &'static str {
        "health"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Lazy::force(&STARTED);
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(health_check))
            .route("/ready", get(readiness_check))
            .with_state(self.environment.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(json!({
            "paths": {
                "": {
                    "get": {
                        "summary": "Liveness check",
                        "tags": ["Health"],
                        "responses": {
                            "200": {"description": "Service is healthy"}
                        }
                    }
                },
                "/ready": {
                    "get": {
                        "summary": "Readiness check",
                        "tags": ["Health"],
                        "responses": {
                            "200": {"description": "Service is ready to serve requests"}
                        }
                    }
                }
            }
        }))
    }
}

/// GET /api/health
async fn health_check(State(environment): State<Environment>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is healthy",
        "timestamp": timestamp(),
        "uptime": STARTED.elapsed().as_secs_f64(),
        "environment": environment.as_str(),
    }))
}

/// GET /api/health/ready
async fn readiness_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is ready to serve requests",
        "timestamp": timestamp(),
    }))
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Create a new instance of the health module
pub fn create_module(environment: Environment) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(HealthModule::new(environment))
}
