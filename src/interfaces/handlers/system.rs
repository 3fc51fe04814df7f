use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use humantime::format_duration;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::{sync::RwLock, time::Duration};
use sysinfo::System;

use crate::{entities::envelope::ApiResponse, AppState};

const CACHE_TTL_SECS: i64 = 5;

/// Process start, forced from `main` so uptime is measured from boot.
pub static STARTED_AT: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

static CACHE: Lazy<RwLock<Option<(i64, HealthReport)>>> = Lazy::new(|| RwLock::new(None));

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct HostInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
    process_memory: String,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    status: &'static str,
    store: &'static str,
    store_status: &'static str,
    version: &'static str,
    uptime: String,
    started_at: String,
    checked_at: String,
    host: HostInfo,
}

fn megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

fn host_info() -> HostInfo {
    let mut sys = System::new_all();
    sys.refresh_all();

    let process_memory = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or_else(|| "Unknown".to_string(), |p| megabytes(p.memory()));

    HostInfo {
        os: System::name().unwrap_or_else(|| "Unknown".into()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".into()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".into()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
        process_memory,
    }
}

async fn build_report(state: &AppState) -> HealthReport {
    let now = Utc::now();
    let uptime = now.signed_duration_since(*STARTED_AT).num_seconds().max(0) as u64;

    let store_ok = match state.user_handler.user_repo.check_connection().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Health check could not reach the store: {}", e);
            false
        }
    };

    HealthReport {
        status: if store_ok { "healthy" } else { "degraded" },
        store: state.store_backend,
        store_status: if store_ok { "OK" } else { "Unavailable" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: format_duration(Duration::from_secs(uptime)).to_string(),
        started_at: STARTED_AT.to_rfc3339(),
        checked_at: now.to_rfc3339(),
        host: host_info(),
    }
}

fn cached(now: i64) -> Option<HealthReport> {
    match CACHE.read() {
        Ok(guard) => guard
            .as_ref()
            .filter(|(at, _)| now - at <= CACHE_TTL_SECS)
            .map(|(_, report)| report.clone()),
        Err(e) => {
            tracing::warn!("Health cache lock poisoned: {}", e);
            None
        }
    }
}

/// Store status plus process and host details, recomputed at most every few seconds.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();

    let report = match cached(now) {
        Some(report) => report,
        None => {
            let report = build_report(&state).await;
            if let Ok(mut guard) = CACHE.write() {
                *guard = Some((now, report.clone()));
            }
            report
        }
    };

    respond(report)
}

/// 503 with `success: false` when the store is unreachable; the report is still attached.
fn respond(report: HealthReport) -> HttpResponse {
    if report.store_status == "OK" {
        return HttpResponse::Ok().json(ApiResponse::ok(report));
    }

    let mut body = ApiResponse::ok(report);
    body.success = false;
    body.error = Some("Store unavailable".into());
    HttpResponse::ServiceUnavailable().json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};
    use serde_json::Value;

    fn report(store_ok: bool) -> HealthReport {
        HealthReport {
            status: if store_ok { "healthy" } else { "degraded" },
            store: "postgres",
            store_status: if store_ok { "OK" } else { "Unavailable" },
            version: env!("CARGO_PKG_VERSION"),
            uptime: "1s".into(),
            started_at: STARTED_AT.to_rfc3339(),
            checked_at: Utc::now().to_rfc3339(),
            host: host_info(),
        }
    }

    async fn body_of(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn degraded_store_is_reported_as_a_failure() {
        let response = respond(report(false));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_of(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Store unavailable");
        assert_eq!(body["data"]["status"], "degraded");
    }

    #[actix_rt::test]
    async fn healthy_store_is_a_plain_success() {
        let response = respond(report(true));
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_of(response).await;
        assert_eq!(body["success"], true);
        assert!(body.get("error").is_none());
    }
}
