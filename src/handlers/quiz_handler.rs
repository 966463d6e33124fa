use actix_web::{get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::Requester,
    errors::AppError,
    models::dto::{request::UpsertQuizRequest, response::ApiResponse},
};

#[get("/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    requester: Requester,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id, &requester.claims).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[put("/quizzes/{id}")]
async fn upsert_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpsertQuizRequest>,
    requester: Requester,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .upsert_quiz(&id, request.into_inner(), &requester.claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse {
        data: quiz,
        message: "Quiz saved".to_string(),
    }))
}
