pub mod access_handler;
pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub use access_handler::{finish_attempt, get_access, start_attempt, submit_preflight};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_handler::{get_quiz, upsert_quiz};

/// Registers every route. Everything under `/api` requires a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(health_check_live)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(get_quiz)
                .service(upsert_quiz)
                .service(get_access)
                .service(submit_preflight)
                .service(start_attempt)
                .service(finish_attempt),
        );
}
