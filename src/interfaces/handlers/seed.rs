use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{envelope::ApiResponse, seed::SeedOutcome},
    errors::AppError,
    use_cases::extractors::AdminIdentity,
    AppState,
};

/// Destructive reseed. 201 when every fixture landed, 207 on partial failure, 500 when none did.
#[instrument(skip(admin, state), fields(admin = %admin.0.email))]
pub async fn run_seed(
    admin: AdminIdentity,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let report = state.seed_handler.reseed().await?;

    let outcome = report.outcome();
    let mut body = ApiResponse::ok(report);

    let status = match outcome {
        SeedOutcome::AllInserted => StatusCode::CREATED,
        SeedOutcome::Partial => StatusCode::MULTI_STATUS,
        SeedOutcome::AllFailed => {
            body.success = false;
            body.error = Some("No fixtures could be inserted".into());
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    Ok(HttpResponse::build(status).json(body))
}

#[instrument(skip(state))]
pub async fn seed_status(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let status = state.seed_handler.status().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(status)))
}
