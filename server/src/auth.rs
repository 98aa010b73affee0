use crate::error::ApiError;
use actix_web::{http::header, HttpRequest};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Hash a password with a fresh random salt. The result is `salt$digest`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-process session store. Tokens are opaque and live until the server
/// restarts.
#[derive(Default)]
pub struct Sessions {
    tokens: Mutex<HashMap<String, i64>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.lock().await.insert(token.clone(), user_id);
        token
    }

    pub async fn user_id(&self, token: &str) -> Option<i64> {
        self.tokens.lock().await.get(token).copied()
    }

    /// Drop a token, signing its user out. Revoking an unknown token is not
    /// an error.
    pub async fn revoke(&self, token: &str) {
        self.tokens.lock().await.remove(token);
    }
}

/// The `Authorization: Bearer` token of a request.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, ApiError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)
}

/// Resolve the `Authorization: Bearer` token of a request to a user id.
pub async fn require_user(req: &HttpRequest, sessions: &Sessions) -> Result<i64, ApiError> {
    let token = bearer_token(req)?;
    sessions.user_id(token).await.ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verify_accepts_matching_password() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let stored = hash_password("hunter2");
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("hunter2", "not-a-salted-hash"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[actix_rt::test]
    async fn sessions_resolve_their_user() {
        let sessions = Sessions::new();
        let token = sessions.create(42).await;
        assert_eq!(sessions.user_id(&token).await, Some(42));
        assert_eq!(sessions.user_id("missing").await, None);
    }

    #[actix_rt::test]
    async fn revoked_tokens_no_longer_resolve() {
        let sessions = Sessions::new();
        let token = sessions.create(42).await;
        sessions.revoke(&token).await;
        assert_eq!(sessions.user_id(&token).await, None);

        // idempotent
        sessions.revoke(&token).await;
    }
}
