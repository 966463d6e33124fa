pub mod access_service;
pub mod quiz_service;

pub use access_service::AccessService;
pub use quiz_service::QuizService;
