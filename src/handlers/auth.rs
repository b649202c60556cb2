//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{session::Session, strategies::GoogleProfile},
    error::{get_db_conn, ApiError, ApiResult},
    models::User,
    services::auth::{register_user, touch_last_login, RegisterInput},
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "securepassword123", min_length = 8)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    #[schema(example = "660e8400-e29b-41d4-a716-446655440000")]
    pub workspace_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "securepassword123")]
    pub password: String,
}

/// Profile fields of an upstream-verified Google identity token.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GoogleAuthRequest {
    /// The `sub` claim. Absence fails the request before any store access.
    #[schema(example = "g-109876543210987654321")]
    pub subject: Option<String>,
    #[schema(example = "John Doe")]
    pub display_name: String,
    #[schema(example = "user@example.com")]
    pub email: Option<String>,
    #[schema(example = "https://lh3.googleusercontent.com/a/photo.jpg")]
    pub picture: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    #[schema(example = "eyJhbGciOiJFZERTQSIsInR5cCI6IkpXVCJ9...")]
    pub session_token: String,
}

/// Sanitized user representation; the password hash never appears here.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    #[schema(example = true)]
    pub is_active: bool,
    pub current_workspace_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            profile_picture: user.profile_picture,
            is_active: user.is_active,
            current_workspace_id: user.current_workspace_id,
            created_at: user.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 409, description = "Email already exists", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    if let Err(e) = payload.validate() {
        return Err(ApiError::bad_request(
            format!("Validation error: {}", e),
            "VALIDATION_ERROR",
        ));
    }

    if let Err(e) = state.password_policy.validate(&payload.password) {
        return Err(ApiError::bad_request(
            e.to_string(),
            "PASSWORD_POLICY_VIOLATION",
        ));
    }

    let mut conn = get_db_conn(&state.db_pool)?;

    let ids = register_user(
        &mut conn,
        &RegisterInput {
            email: payload.email,
            name: payload.name,
            password: payload.password,
        },
        state.password_hash_cost,
    )
    .map_err(|e| {
        warn!(error = %e, "Registration failed");
        e.into_api()
    })?;

    info!(user_id = %ids.user_id, workspace_id = %ids.workspace_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: ids.user_id,
            workspace_id: ids.workspace_id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Invalid email or password", body = ApiError),
        (status = 404, description = "Invalid email or password", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if let Err(e) = payload.validate() {
        return Err(ApiError::bad_request(
            format!("Validation error: {}", e),
            "VALIDATION_ERROR",
        ));
    }

    let mut conn = get_db_conn(&state.db_pool)?;

    let user = state
        .strategies
        .local
        .authenticate(&mut conn, &payload.email, &payload.password)
        .map_err(|e| {
            warn!(email = %payload.email, "Login failed");
            e.into_api()
        })?;

    touch_last_login(&mut conn, user.id).map_err(|e| e.into_api())?;

    let session_token = state.session_keys.issue(&user).map_err(|e| {
        error!(error = %e, "Session token issuing failed");
        ApiError::internal("Session establishment failed", "SESSION_ERROR")
    })?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user.into(),
        session_token,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/oauth/google",
    tag = "Authentication",
    request_body = GoogleAuthRequest,
    responses(
        (status = 200, description = "Login or provisioning successful", body = AuthResponse),
        (status = 404, description = "Missing subject id or missing seeded role", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn google_auth(
    State(state): State<AppState>,
    Json(payload): Json<GoogleAuthRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let user = state
        .strategies
        .google
        .authenticate(
            &mut conn,
            GoogleProfile {
                subject: payload.subject,
                display_name: payload.display_name,
                email: payload.email,
                picture: payload.picture,
            },
        )
        .map_err(|e| {
            warn!(error = %e, "Google authentication failed");
            e.into_api()
        })?;

    touch_last_login(&mut conn, user.id).map_err(|e| e.into_api())?;

    let session_token = state.session_keys.issue(&user).map_err(|e| {
        error!(error = %e, "Session token issuing failed");
        ApiError::internal("Session establishment failed", "SESSION_ERROR")
    })?;

    info!(user_id = %user.id, "User logged in via Google");

    Ok(Json(AuthResponse {
        user: user.into(),
        session_token,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub current_workspace_id: Option<Uuid>,
    pub expires_at: i64,
}

/// Returns the identity restored from the session record.
/// Served straight from the token; no store round trip, so profile edits made
/// after login are not reflected until the session is refreshed.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current session identity", body = MeResponse),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(Extension(session): Extension<Session>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: session.user_id,
        email: session.email,
        name: session.name,
        profile_picture: session.profile_picture,
        current_workspace_id: session.current_workspace_id,
        expires_at: session.exp,
    })
}

/// Sessions are token-backed; logout is the client discarding its token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses(
        (status = 204, description = "Logged out")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(Extension(session): Extension<Session>) -> StatusCode {
    info!(user_id = %session.user_id, "User logged out");
    StatusCode::NO_CONTENT
}
