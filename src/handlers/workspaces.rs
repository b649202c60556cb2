//! Workspace handlers.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::session::Session,
    error::{get_db_conn, ApiError, ApiResult},
    models::Workspace,
    services::workspace::{
        get_workspace, list_members, switch_current_workspace, WorkspaceMember,
    },
    AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkspaceResponse {
    #[schema(example = "660e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "My Workspace")]
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
}

impl From<Workspace> for WorkspaceResponse {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id,
            name: ws.name,
            description: ws.description,
            owner_id: ws.owner_id,
            created_at: ws.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub user_id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub name: Option<String>,
    #[schema(example = "OWNER")]
    pub role: String,
    pub joined_at: chrono::NaiveDateTime,
}

impl From<WorkspaceMember> for MemberResponse {
    fn from(m: WorkspaceMember) -> Self {
        Self {
            user_id: m.user_id,
            email: m.email,
            name: m.name,
            role: m.role,
            joined_at: m.joined_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentWorkspaceResponse {
    pub workspace: WorkspaceResponse,
    pub members: Vec<MemberResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SwitchWorkspaceResponse {
    pub workspace: WorkspaceResponse,
    /// Fresh session token carrying the new current workspace.
    #[schema(example = "eyJhbGciOiJFZERTQSIsInR5cCI6IkpXVCJ9...")]
    pub session_token: String,
}

#[utoipa::path(
    get,
    path = "/workspaces/current",
    tag = "Workspaces",
    responses(
        (status = 200, description = "Current workspace with members", body = CurrentWorkspaceResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ApiError),
        (status = 404, description = "No current workspace", body = crate::error::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_workspace(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<CurrentWorkspaceResponse>> {
    let workspace_id = session.current_workspace_id.ok_or_else(|| {
        ApiError::not_found("No current workspace is set", "NO_CURRENT_WORKSPACE")
    })?;

    let mut conn = get_db_conn(&state.db_pool)?;

    let workspace = get_workspace(&mut conn, workspace_id).map_err(|e| e.into_api())?;
    let members = list_members(&mut conn, workspace_id).map_err(|e| e.into_api())?;

    Ok(Json(CurrentWorkspaceResponse {
        workspace: workspace.into(),
        members: members.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/workspaces/{workspace_id}/switch",
    tag = "Workspaces",
    params(
        ("workspace_id" = Uuid, Path, description = "Workspace to switch to")
    ),
    responses(
        (status = 200, description = "Switched current workspace", body = SwitchWorkspaceResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ApiError),
        (status = 404, description = "Not a member of the workspace", body = crate::error::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn switch_workspace(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(workspace_id): Path<Uuid>,
) -> ApiResult<Json<SwitchWorkspaceResponse>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let (user, workspace) =
        switch_current_workspace(&mut conn, session.user_id, workspace_id)
            .map_err(|e| e.into_api())?;

    // The old token still names the previous workspace, so hand back a fresh one.
    let session_token = state.session_keys.issue(&user).map_err(|e| {
        error!(error = %e, "Session token issuing failed");
        ApiError::internal("Session establishment failed", "SESSION_ERROR")
    })?;

    Ok(Json(SwitchWorkspaceResponse {
        workspace: workspace.into(),
        session_token,
    }))
}
