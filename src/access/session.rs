use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Per-session access state that outlives a single request.
///
/// Passed explicitly into the rules that need it and persisted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSession {
    password_verified: BTreeSet<String>,
}

impl AccessSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_password_verified(&self, quiz_id: &str) -> bool {
        self.password_verified.contains(quiz_id)
    }

    pub fn mark_password_verified(&mut self, quiz_id: &str) {
        self.password_verified.insert(quiz_id.to_string());
    }

    pub fn clear_password_verified(&mut self, quiz_id: &str) {
        self.password_verified.remove(quiz_id);
    }
}
