//! Quiz access rules and the manager that combines them.
//!
//! Rules are pure functions of the quiz settings, the attempt history and an
//! explicit `now`. The only state they touch is the [`AccessSession`] the
//! caller passes in.

pub mod manager;
pub mod messages;
pub mod rule;
pub mod rules;
pub mod session;
pub mod subnet;

pub use manager::{AccessManager, OverdueOutcome};
pub use messages::{AccessMessage, EnglishMessages, MessageProvider};
pub use rule::{AccessRule, FieldError, PreflightData, SHOW_TIME_BEFORE_DEADLINE_SECS};
pub use session::AccessSession;
