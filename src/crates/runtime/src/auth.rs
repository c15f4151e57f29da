//! Request-scoped identity.
//!
//! Token verification mechanics are an external collaborator (local HS256
//! vs. remote GoTrue) — the core only depends on an [`AuthUser`] being
//! present per request. This module implements the local HS256 path and
//! the axum extractor that produces it; a remote-JWKS verifier would live
//! alongside it behind the same trait without touching callers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request-scoped caller identity. Never persisted; flows into the
/// scheduler and namespace resolution to compute owner scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub identity: String,
    pub email: Option<String>,
    pub org_id: String,
}

impl AuthUser {
    /// Owner string used for DB row scoping — distinct from `org_id`,
    /// which namespaces cross-thread memory.
    pub fn owner(&self) -> &str {
        &self.identity
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    email: Option<String>,
    org_id: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let body = serde_json::json!({
            "error": "unauthorized",
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Verifies HS256-signed bearer tokens against a shared secret (e.g.
/// `SUPABASE_JWT_SECRET`).
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(AuthUser {
            identity: data.claims.sub,
            email: data.claims.email,
            org_id: data.claims.org_id.unwrap_or_else(|| "default".to_string()),
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)
}

impl<S> FromRequestParts<S> for AuthUser
where
    JwtVerifier: axum::extract::FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = JwtVerifier::from_ref(state);
        let token = bearer_token(parts)?;
        verifier.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(sub: &str, org_id: &str, secret: &str, exp_offset_secs: i64) -> String {
        #[derive(Serialize)]
        struct TestClaims {
            sub: String,
            org_id: String,
            exp: i64,
        }
        let claims = TestClaims {
            sub: sub.to_string(),
            org_id: org_id.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn verifies_well_formed_token() {
        let secret = "test-secret-at-least-this-long";
        let verifier = JwtVerifier::new(secret);
        let token = token_for("user-1", "org-1", secret, 3600);
        let user = verifier.verify(&token).unwrap();
        assert_eq!(user.identity, "user-1");
        assert_eq!(user.org_id, "org-1");
    }

    #[test]
    fn rejects_expired_token() {
        let secret = "test-secret-at-least-this-long";
        let verifier = JwtVerifier::new(secret);
        let token = token_for("user-1", "org-1", secret, -3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_token_signed_with_wrong_secret() {
        let verifier = JwtVerifier::new("correct-secret-long-enough");
        let token = token_for("user-1", "org-1", "wrong-secret-long-enough", 3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn owner_is_the_caller_identity_not_the_org() {
        let user = AuthUser { identity: "user-1".into(), email: None, org_id: "org-1".into() };
        assert_eq!(user.owner(), "user-1");
    }
}
