//! Session token issuing and verification.
//!
//! The session payload is an explicit, versioned record carrying only the
//! sanitized profile fields downstream handlers need. It is never the raw
//! persisted user entity, and it is restored on each request without a store
//! round trip.

use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::User;

/// Bumped whenever the session record shape changes; older tokens are
/// rejected and the client must log in again.
pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub version: u32,
    pub email: String,
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub current_workspace_id: Option<String>,
}

/// A verified session as seen by request handlers.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub current_workspace_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("token verification failed: {0}")]
    Verification(String),
    #[error("unsupported session version {0}")]
    UnsupportedVersion(u32),
    #[error("malformed subject in session token")]
    MalformedSubject,
}

#[derive(Clone)]
pub struct SessionKeys {
    key_pair: Arc<Ed25519KeyPair>,
    public_key: Arc<Ed25519PublicKey>,
    pub expiry_secs: i64,
    pub issuer: Option<String>,
}

impl SessionKeys {
    /// Expects SESSION_PRIVATE_KEY env var (base64-encoded Ed25519 key).
    pub fn from_env(expiry_secs: i64, issuer: Option<String>) -> Self {
        use base64::Engine;

        let private_key_b64 =
            std::env::var("SESSION_PRIVATE_KEY").expect("SESSION_PRIVATE_KEY must be set");

        let key_bytes = base64::engine::general_purpose::STANDARD
            .decode(&private_key_b64)
            .expect("SESSION_PRIVATE_KEY must be valid base64");

        let key_pair = Ed25519KeyPair::from_bytes(&key_bytes)
            .expect("SESSION_PRIVATE_KEY must be a valid Ed25519 key");

        Self::from_key_pair(key_pair, expiry_secs, issuer)
    }

    pub fn from_key_pair(
        key_pair: Ed25519KeyPair,
        expiry_secs: i64,
        issuer: Option<String>,
    ) -> Self {
        let public_key = key_pair.public_key();
        Self {
            key_pair: Arc::new(key_pair),
            public_key: Arc::new(public_key),
            expiry_secs,
            issuer,
        }
    }

    pub fn generate_key_pair() -> (String, String) {
        use base64::Engine;

        let key_pair = Ed25519KeyPair::generate();
        let private_b64 = base64::engine::general_purpose::STANDARD.encode(key_pair.to_bytes());
        let public_b64 =
            base64::engine::general_purpose::STANDARD.encode(key_pair.public_key().to_bytes());
        (private_b64, public_b64)
    }

    /// Serializes the sanitized profile fields of `user` into a signed
    /// session token. The password hash is never part of the payload.
    pub fn issue(&self, user: &User) -> Result<String, jwt_simple::Error> {
        let custom_claims = SessionClaims {
            version: SESSION_VERSION,
            email: user.email.clone(),
            name: user.name.clone(),
            profile_picture: user.profile_picture.clone(),
            current_workspace_id: user.current_workspace_id.map(|id| id.to_string()),
        };

        let mut claims = jwt_simple::claims::Claims::with_custom_claims(
            custom_claims,
            Duration::from_secs(self.expiry_secs as u64),
        )
        .with_subject(user.id.to_string());

        if let Some(issuer) = &self.issuer {
            claims = claims.with_issuer(issuer);
        }

        self.key_pair.sign(claims)
    }

    pub fn verify(&self, token: &str) -> Result<Session, SessionError> {
        let mut options = VerificationOptions::default();
        if let Some(issuer) = &self.issuer {
            options.allowed_issuers = Some(std::collections::HashSet::from([issuer.clone()]));
        }

        let token_data = self
            .public_key
            .verify_token::<SessionClaims>(token, Some(options))
            .map_err(|e| SessionError::Verification(e.to_string()))?;

        if token_data.custom.version != SESSION_VERSION {
            return Err(SessionError::UnsupportedVersion(token_data.custom.version));
        }

        let user_id = token_data
            .subject
            .as_deref()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or(SessionError::MalformedSubject)?;

        Ok(Session {
            user_id,
            email: token_data.custom.email,
            name: token_data.custom.name,
            profile_picture: token_data.custom.profile_picture,
            current_workspace_id: token_data
                .custom
                .current_workspace_id
                .as_deref()
                .and_then(|s| Uuid::parse_str(s).ok()),
            exp: token_data
                .expires_at
                .map(|t| t.as_secs() as i64)
                .unwrap_or(0),
            iat: token_data
                .issued_at
                .map(|t| t.as_secs() as i64)
                .unwrap_or(0),
        })
    }
}
