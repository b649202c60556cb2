//! Account provisioning, registration, and credential verification.
//!
//! The two write flows (OAuth provisioning and email registration) share one
//! transactional sequence: create the user, link an account record, create a
//! default workspace, look up the pre-seeded OWNER role, join the user to the
//! workspace as its owner, and point the user at the new workspace. Every
//! write happens inside a single diesel transaction; any failure rolls the
//! whole graph back and no partial records survive.

use chrono::Utc;
use diesel::prelude::*;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::password::PasswordService,
    error::{ServiceError, INVALID_CREDENTIALS_MSG},
    models::{
        Account, AuthProvider, NewAccount, NewMember, NewUser, NewWorkspace, RoleName, User,
        Workspace,
    },
    schema::{accounts, members, roles, users, workspaces},
};

/// Profile fields extracted from a verified third-party identity token.
/// The email is required here; strategies reject email-less profiles before
/// this type is ever built, since provisioning keys identity on email.
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    pub provider: AuthProvider,
    pub provider_id: String,
    pub display_name: String,
    pub picture: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Identifiers handed back to the signup endpoint. Deliberately not the full
/// entities, so the password hash can never leak through this path.
#[derive(Debug, Clone, Copy)]
pub struct RegisteredIds {
    pub user_id: Uuid,
    pub workspace_id: Uuid,
}

/// Gets or creates the user graph for an OAuth identity.
///
/// Idempotent per email: a repeated OAuth login for a known email returns the
/// existing user and creates nothing. Duplicate-email races between two
/// first-time logins are arbitrated by the unique index on `users.email`,
/// which surfaces here as a database error and rolls the loser back.
pub fn login_or_create_account(
    conn: &mut PgConnection,
    profile: &OAuthProfile,
) -> Result<User, ServiceError> {
    let email = profile.email.to_lowercase();

    conn.transaction(|conn| {
        let existing: Option<User> = users::table
            .filter(users::email.eq(&email))
            .select(User::as_select())
            .first(conn)
            .optional()?;

        if let Some(user) = existing {
            info!(user_id = %user.id, provider = profile.provider.as_str(), "OAuth login for existing user");
            return Ok(user);
        }

        let new_user = NewUser {
            email: email.clone(),
            name: Some(profile.display_name.clone()),
            password_hash: None,
            profile_picture: profile.picture.clone(),
        };

        let (user, workspace) =
            provision_user_graph(conn, new_user, profile.provider, &profile.provider_id)?;

        info!(
            user_id = %user.id,
            workspace_id = %workspace.id,
            provider = profile.provider.as_str(),
            "Provisioned new user from OAuth identity"
        );

        Ok(user)
    })
}

/// Registers a new user with email and password.
///
/// The password is hashed by an explicit call to the credential hasher inside
/// this write path; nothing between here and the insert ever persists the
/// plaintext.
pub fn register_user(
    conn: &mut PgConnection,
    input: &RegisterInput,
    hash_cost: u32,
) -> Result<RegisteredIds, ServiceError> {
    let email = input.email.to_lowercase();

    conn.transaction(|conn| {
        let existing: Option<Uuid> = users::table
            .filter(users::email.eq(&email))
            .select(users::id)
            .first(conn)
            .optional()?;

        if existing.is_some() {
            return Err(ServiceError::Conflict("Email already exists".to_string()));
        }

        let password_hash = PasswordService::hash_password_with_cost(&input.password, hash_cost)
            .map_err(|e| ServiceError::Hash(e.to_string()))?;

        let new_user = NewUser {
            email: email.clone(),
            name: Some(input.name.clone()),
            password_hash: Some(password_hash),
            profile_picture: None,
        };

        let (user, workspace) =
            provision_user_graph(conn, new_user, AuthProvider::Email, &email)?;

        info!(user_id = %user.id, workspace_id = %workspace.id, "Registered new user");

        Ok(RegisteredIds {
            user_id: user.id,
            workspace_id: workspace.id,
        })
    })
}

/// Verifies email/password credentials and returns the owning user.
///
/// Read-only; the narrow race where the account disappears between the two
/// lookups surfaces as the distinct "user not found" error. Both the unknown
/// account and the wrong password use the same generic message.
pub fn verify_user(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
) -> Result<User, ServiceError> {
    let account: Account = accounts::table
        .filter(accounts::provider.eq(AuthProvider::Email.as_str()))
        .filter(accounts::provider_id.eq(email.to_lowercase()))
        .select(Account::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ServiceError::NotFound(INVALID_CREDENTIALS_MSG.to_string()))?;

    let user: User = users::table
        .filter(users::id.eq(account.user_id))
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            error!(account_id = %account.id, "Account references a missing user");
            ServiceError::NotFound("User not found for the given account".to_string())
        })?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS_MSG.to_string()))?;

    let matches = PasswordService::verify_password(password, stored_hash)
        .map_err(|e| ServiceError::Hash(e.to_string()))?;

    if !matches {
        return Err(ServiceError::Unauthorized(
            INVALID_CREDENTIALS_MSG.to_string(),
        ));
    }

    Ok(user)
}

/// Records a successful login on the user row.
pub fn touch_last_login(conn: &mut PgConnection, user_id: Uuid) -> Result<(), ServiceError> {
    diesel::update(users::table.filter(users::id.eq(user_id)))
        .set(users::last_login.eq(Utc::now().naive_utc()))
        .execute(conn)?;
    Ok(())
}

/// The shared create-user/account/workspace/member sequence.
///
/// Must run inside an open transaction; callers own commit and rollback.
fn provision_user_graph(
    conn: &mut PgConnection,
    new_user: NewUser,
    provider: AuthProvider,
    provider_id: &str,
) -> Result<(User, Workspace), ServiceError> {
    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result(conn)?;

    diesel::insert_into(accounts::table)
        .values(&NewAccount {
            user_id: user.id,
            provider: provider.as_str().to_string(),
            provider_id: provider_id.to_string(),
        })
        .execute(conn)?;

    let workspace: Workspace = diesel::insert_into(workspaces::table)
        .values(&NewWorkspace {
            name: "My Workspace".to_string(),
            description: Some(format!(
                "Workspace created for {}",
                user.name.as_deref().unwrap_or(&user.email)
            )),
            owner_id: user.id,
        })
        .get_result(conn)?;

    let owner_role_id: Uuid = roles::table
        .filter(roles::name.eq(RoleName::Owner.as_str()))
        .select(roles::id)
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            // Missing seed data is a deployment defect, not a user error.
            error!("Owner role not found; role seeding has not been run");
            ServiceError::NotFound("Owner role not found".to_string())
        })?;

    diesel::insert_into(members::table)
        .values(&NewMember {
            user_id: user.id,
            workspace_id: workspace.id,
            role_id: owner_role_id,
            joined_at: Utc::now().naive_utc(),
        })
        .execute(conn)?;

    let user: User = diesel::update(users::table.filter(users::id.eq(user.id)))
        .set(users::current_workspace_id.eq(workspace.id))
        .get_result(conn)?;

    Ok((user, workspace))
}
