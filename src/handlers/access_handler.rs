use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;

use crate::{
    access::PreflightData,
    app_state::AppState,
    auth::Requester,
    errors::AppError,
    models::dto::request::StartAttemptRequest,
};

/// The entry page view: rules, blocks, preflight needs and any open attempt.
#[get("/quizzes/{id}/access")]
async fn get_access(
    state: web::Data<AppState>,
    id: web::Path<String>,
    requester: Requester,
) -> Result<HttpResponse, AppError> {
    let summary = state
        .access_service
        .evaluate(&id, &requester, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[post("/quizzes/{id}/preflight")]
async fn submit_preflight(
    state: web::Data<AppState>,
    id: web::Path<String>,
    data: web::Json<PreflightData>,
    requester: Requester,
) -> Result<HttpResponse, AppError> {
    state
        .access_service
        .submit_preflight(&id, &requester, &data, Utc::now())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/quizzes/{id}/attempts")]
async fn start_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Bytes,
    requester: Requester,
) -> Result<HttpResponse, AppError> {
    let request = parse_start_request(&body)?;
    let attempt = state
        .access_service
        .start_attempt(&id, &requester, request.preflight.as_ref(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}

#[post("/quizzes/{id}/attempts/{attempt_id}/finish")]
async fn finish_attempt(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    requester: Requester,
) -> Result<HttpResponse, AppError> {
    let (quiz_id, attempt_id) = path.into_inner();
    let attempt = state
        .access_service
        .finish_attempt(&quiz_id, &attempt_id, &requester, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(attempt))
}

/// An empty body starts without preflight data; anything else must be valid JSON.
fn parse_start_request(body: &[u8]) -> Result<StartAttemptRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartAttemptRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("Invalid attempt request: {}", e)))
}
