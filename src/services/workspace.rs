//! Workspace queries and the current-workspace switch.

use diesel::prelude::*;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::{User, Workspace},
    schema::{members, roles, users, workspaces},
};

/// A member row joined with its user profile and role name.
#[derive(Debug, Clone)]
pub struct WorkspaceMember {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub joined_at: chrono::NaiveDateTime,
}

pub fn get_workspace(
    conn: &mut PgConnection,
    workspace_id: Uuid,
) -> Result<Workspace, ServiceError> {
    workspaces::table
        .filter(workspaces::id.eq(workspace_id))
        .select(Workspace::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ServiceError::NotFound("Workspace not found".to_string()))
}

pub fn list_members(
    conn: &mut PgConnection,
    workspace_id: Uuid,
) -> Result<Vec<WorkspaceMember>, ServiceError> {
    let rows: Vec<(Uuid, String, Option<String>, String, chrono::NaiveDateTime)> = members::table
        .inner_join(users::table.on(users::id.eq(members::user_id)))
        .inner_join(roles::table.on(roles::id.eq(members::role_id)))
        .filter(members::workspace_id.eq(workspace_id))
        .order(members::joined_at.asc())
        .select((
            users::id,
            users::email,
            users::name,
            roles::name,
            members::joined_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(user_id, email, name, role, joined_at)| WorkspaceMember {
            user_id,
            email,
            name,
            role,
            joined_at,
        })
        .collect())
}

/// Switches the user's current workspace after verifying membership.
///
/// Returns the updated user; callers should issue a fresh session token since
/// the session record carries the current workspace id.
pub fn switch_current_workspace(
    conn: &mut PgConnection,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<(User, Workspace), ServiceError> {
    let workspace = get_workspace(conn, workspace_id)?;

    let membership: Option<Uuid> = members::table
        .filter(members::user_id.eq(user_id))
        .filter(members::workspace_id.eq(workspace_id))
        .select(members::id)
        .first(conn)
        .optional()?;

    if membership.is_none() {
        return Err(ServiceError::NotFound(
            "You are not a member of this workspace".to_string(),
        ));
    }

    let user: User = diesel::update(users::table.filter(users::id.eq(user_id)))
        .set(users::current_workspace_id.eq(workspace_id))
        .get_result(conn)?;

    info!(user_id = %user_id, workspace_id = %workspace_id, "Switched current workspace");

    Ok((user, workspace))
}
