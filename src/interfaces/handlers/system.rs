use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use humantime::format_duration;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Duration;

use crate::{use_cases::extractors::AdminUser, AppState};

/// Process start, forced by `main` before the server binds.
pub static SERVER_STARTED_AT: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: &'static str,
    redis_status: &'static str,
    version: &'static str,
}

#[get("/health")]
pub async fn admin_health_check(_admin: AdminUser, state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime_seconds = now_utc.signed_duration_since(*SERVER_STARTED_AT).num_seconds().max(0) as u64;

    let database = match state.auth_handler.user_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!("Health check: database unavailable: {}", e);
            "Unavailable"
        }
    };

    let redis_status = match &state.auth_handler.revocations {
        Some(store) => match store.ping().await {
            Ok(()) => "OK",
            Err(e) => {
                tracing::warn!("Health check: redis unavailable: {}", e);
                "Unavailable"
            }
        },
        None => "Not configured",
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        status: if database == "OK" { "healthy" } else { "degraded" },
        uptime: format_duration(Duration::from_secs(uptime_seconds)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: SERVER_STARTED_AT.to_rfc3339(),
        database,
        redis_status,
        version: env!("CARGO_PKG_VERSION"),
    })
}
