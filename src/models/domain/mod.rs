pub mod quiz;
pub mod quiz_attempt;
pub use quiz::{OverdueHandling, Quiz};
pub use quiz_attempt::{AttemptState, QuizAttempt};
