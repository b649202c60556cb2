//! Authentication strategies.
//!
//! Strategies are plain values constructed once at process start and carried
//! in [`AppState`](crate::AppState), not process-wide mutable configuration.
//! Each strategy validates its own input shape and delegates to the auth
//! services.

use diesel::PgConnection;

use crate::{
    error::ServiceError,
    models::{AuthProvider, User},
    services::auth::{login_or_create_account, verify_user, OAuthProfile},
};

/// Raw profile fields as delivered by the upstream Google token verifier.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    /// The `sub` claim of the verified identity token.
    pub subject: Option<String>,
    pub display_name: String,
    pub email: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GoogleStrategy;

impl GoogleStrategy {
    /// Fails fast before touching the store when the subject id or the email
    /// is absent. Provisioning keys identity on email, so an email-less
    /// profile has nothing to provision against.
    pub fn authenticate(
        &self,
        conn: &mut PgConnection,
        profile: GoogleProfile,
    ) -> Result<User, ServiceError> {
        let subject = profile
            .subject
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::NotFound("Google ID (sub) is missing".to_string()))?;

        let email = profile
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ServiceError::NotFound("Google profile email is missing".to_string()))?;

        login_or_create_account(
            conn,
            &OAuthProfile {
                provider: AuthProvider::Google,
                provider_id: subject,
                display_name: profile.display_name,
                picture: profile.picture,
                email,
            },
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocalStrategy;

impl LocalStrategy {
    pub fn authenticate(
        &self,
        conn: &mut PgConnection,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        verify_user(conn, email, password)
    }
}

/// All strategies the process knows about, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    pub google: GoogleStrategy,
    pub local: LocalStrategy,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}
