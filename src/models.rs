use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity provider linked to an [`Account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AuthProvider {
    Google,
    Github,
    Facebook,
    Email,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Github => "GITHUB",
            AuthProvider::Facebook => "FACEBOOK",
            AuthProvider::Email => "EMAIL",
        }
    }

}

/// Pre-seeded role names. Provisioning requires `Owner` to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleName {
    Owner,
    Admin,
    Member,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Owner => "OWNER",
            RoleName::Admin => "ADMIN",
            RoleName::Member => "MEMBER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    Backlog,
    #[default]
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "BACKLOG",
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::InReview => "IN_REVIEW",
            TaskStatus::Done => "DONE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "BACKLOG" => Some(TaskStatus::Backlog),
            "TODO" => Some(TaskStatus::Todo),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "IN_REVIEW" => Some(TaskStatus::InReview),
            "DONE" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(TaskPriority::Low),
            "MEDIUM" => Some(TaskPriority::Medium),
            "HIGH" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub last_login: Option<NaiveDateTime>,
    pub current_workspace_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::accounts)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub provider_id: String,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount {
    pub user_id: Uuid,
    pub provider: String,
    pub provider_id: String,
}

#[derive(Debug, Queryable, Selectable, Serialize, Clone, ToSchema)]
#[diesel(table_name = crate::schema::workspaces)]
pub struct Workspace {
    pub id: Uuid,
    #[schema(example = "My Workspace")]
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::workspaces)]
pub struct NewWorkspace {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::members)]
pub struct Member {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role_id: Uuid,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::members)]
pub struct NewMember {
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role_id: Uuid,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Queryable, Selectable, Serialize, Clone, ToSchema)]
#[diesel(table_name = crate::schema::roles)]
pub struct Role {
    pub id: Uuid,
    #[schema(example = "OWNER")]
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::roles)]
pub struct NewRole {
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Queryable, Selectable, Serialize, Clone, ToSchema)]
#[diesel(table_name = crate::schema::projects)]
pub struct Project {
    pub id: Uuid,
    pub workspace_id: Uuid,
    #[schema(example = "Website Redesign")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "🚀")]
    pub emoji: String,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject {
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub emoji: String,
    pub created_by: Uuid,
}

#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = crate::schema::tasks)]
pub struct Task {
    pub id: Uuid,
    pub task_code: String,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub workspace_id: Uuid,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::tasks)]
pub struct NewTask {
    pub task_code: String,
    pub title: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub workspace_id: Uuid,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub due_date: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_tags_match_stored_values() {
        assert_eq!(AuthProvider::Google.as_str(), "GOOGLE");
        assert_eq!(AuthProvider::Github.as_str(), "GITHUB");
        assert_eq!(AuthProvider::Facebook.as_str(), "FACEBOOK");
        assert_eq!(AuthProvider::Email.as_str(), "EMAIL");
    }

    #[test]
    fn test_task_status_defaults_to_todo() {
        assert_eq!(TaskStatus::default().as_str(), "TODO");
        assert_eq!(TaskPriority::default().as_str(), "MEDIUM");
    }

    #[test]
    fn test_task_enum_parsing() {
        assert_eq!(TaskStatus::parse("IN_PROGRESS"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("in_progress"), None);
        assert_eq!(TaskPriority::parse("HIGH"), Some(TaskPriority::High));
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            name: Some("User".to_string()),
            password_hash: Some("$argon2id$secret".to_string()),
            profile_picture: None,
            is_active: true,
            last_login: None,
            current_workspace_id: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
