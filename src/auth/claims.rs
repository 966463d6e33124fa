use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub username: String,
    pub role: UserRole,
    pub sid: String, // Session id, keys the per-session access state
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(user_id: &str, username: &str, role: UserRole, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            sid: Uuid::new_v4().to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }

    /// When the token, and with it the access session, expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.exp)
            .ok()
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Teachers and admins are not held to quiz time limits.
    pub fn can_ignore_time_limits(&self) -> bool {
        matches!(self.role, UserRole::Teacher | UserRole::Admin)
    }

    /// Attempts by teachers and admins are previews.
    pub fn is_preview_user(&self) -> bool {
        matches!(self.role, UserRole::Teacher | UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("user-1", "johndoe", UserRole::Student, 24);

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "johndoe");
        assert!(!claims.sid.is_empty());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expires_at_matches_exp() {
        let claims = Claims::new("user-1", "johndoe", UserRole::Student, 2);
        assert_eq!(claims.expires_at().timestamp(), claims.exp as i64);
        assert!(claims.expires_at() > Utc::now());
    }

    #[test]
    fn test_each_token_gets_its_own_session() {
        let a = Claims::new("user-1", "johndoe", UserRole::Student, 1);
        let b = Claims::new("user-1", "johndoe", UserRole::Student, 1);
        assert_ne!(a.sid, b.sid);
    }

    #[test]
    fn test_role_capabilities() {
        let student = Claims::new("s", "s", UserRole::Student, 1);
        let teacher = Claims::new("t", "t", UserRole::Teacher, 1);
        let admin = Claims::new("a", "a", UserRole::Admin, 1);

        assert!(!student.can_ignore_time_limits());
        assert!(!student.is_preview_user());
        assert!(teacher.can_ignore_time_limits());
        assert!(teacher.is_preview_user());
        assert!(admin.can_ignore_time_limits());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Teacher).unwrap(), "\"teacher\"");
    }
}
