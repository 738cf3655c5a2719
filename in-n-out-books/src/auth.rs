//! Login and security-question verification for the users store.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use mockdoc::{backend::CollectionBackend, memory::InMemoryCollection, query::Query};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    config::AuthConfig,
    error::{ApiError, Reply, OK},
    users::UserStore,
};

/// Number of security answers a verification request must carry.
pub const SECURITY_ANSWER_COUNT: usize = 3;

/// Password hashing with configurable Argon2id cost.
#[derive(Clone)]
pub struct Credentials {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(cfg: &AuthConfig) -> Result<Self, ApiError> {
        let params = Params::new(cfg.argon2_memory_kib, cfg.argon2_iterations, 1, None)
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        Ok(Self { argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) })
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);

        Ok(self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::Unexpected(e.to_string()))?
            .to_string())
    }

    /// `Ok(false)` on mismatch; errors only for a malformed stored hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed = PasswordHash::new(hash).map_err(|e| ApiError::Unexpected(e.to_string()))?;

        Ok(self.argon2.verify_password(password.as_bytes(), &parsed).is_ok())
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    uid: i64,
    exp: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SecurityAnswer {
    answer: String,
}

/// Handlers for `/api/login` and `/api/users/:email/verify-security-question`.
#[derive(Debug, Clone)]
pub struct AuthService<B: CollectionBackend = InMemoryCollection> {
    users: UserStore<B>,
    credentials: Credentials,
    cfg: AuthConfig,
}

impl<B: CollectionBackend> AuthService<B> {
    pub fn new(users: UserStore<B>, credentials: Credentials, cfg: AuthConfig) -> Self {
        Self { users, credentials, cfg }
    }

    pub fn users(&self) -> &UserStore<B> {
        &self.users
    }

    /// `POST /api/login`
    ///
    /// Replies with a bearer token alongside the message when a signing key is configured.
    #[instrument(skip(self, body))]
    pub async fn login(&self, body: &Value) -> Result<Reply, ApiError> {
        let email = body.get("email").and_then(Value::as_str).filter(|s| !s.is_empty());
        let password = body.get("password").and_then(Value::as_str).filter(|s| !s.is_empty());

        let (Some(email), Some(password)) = (email, password) else {
            return Err(ApiError::BadRequest("Bad Request".into()));
        };

        let user = self.users
            .find_one_where(&Query::builder().eq("email", email).build())
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if !self.credentials.verify_password(password, &user.password)? {
            warn!(email, "incorrect password");
            return Err(ApiError::Unauthorized);
        }

        info!(email, user_id = user.id, "authentication successful");

        let mut body = json!({ "message": "Authentication successful" });
        if let Some(token) = self.issue_token(&user.email, user.id)? {
            body["token"] = Value::String(token);
        }

        Ok(Reply { status: OK, body: Some(body) })
    }

    /// `POST /api/users/:email/verify-security-question`
    ///
    /// The body must be exactly three `{ "answer": string }` objects, compared in order.
    #[instrument(skip(self, body))]
    pub async fn verify_security_questions(&self, email: &str, body: &Value) -> Result<Reply, ApiError> {
        let answers = serde_json::from_value::<Vec<SecurityAnswer>>(body.clone())
            .ok()
            .filter(|answers| answers.len() == SECURITY_ANSWER_COUNT)
            .ok_or_else(|| ApiError::BadRequest("Invalid security question answers".into()))?;

        let user = self.users
            .find_one_where(&Query::builder().eq("email", email).build())
            .await?
            .ok_or(ApiError::Unauthorized)?;

        let saved = &user.security_questions;
        let all_match = answers.len() == saved.len()
            && answers
                .iter()
                .zip(saved)
                .all(|(given, stored)| given.answer == stored.answer);

        if !all_match {
            warn!(email, "security answers do not match");
            return Err(ApiError::Unauthorized);
        }

        info!(email, "security questions verified");
        Ok(Reply::message(OK, "Security questions successfully answered"))
    }

    fn issue_token(&self, email: &str, user_id: i64) -> Result<Option<String>, ApiError> {
        let Some(secret) = &self.cfg.jwt_secret else {
            return Ok(None);
        };

        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: email, uid: user_id, exp };

        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map(Some)
            .map_err(|e| ApiError::Unexpected(e.to_string()))
    }
}
