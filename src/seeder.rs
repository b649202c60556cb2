//! Role seeding.
//!
//! The OWNER role must exist before any provisioning flow runs; deployments
//! run this once during bootstrap (see the `seed_roles` binary).

use diesel::prelude::*;
use tracing::info;

use crate::models::{NewRole, RoleName};
use crate::schema::roles;

fn permissions_for(role: RoleName) -> Vec<String> {
    let tags: &[&str] = match role {
        RoleName::Owner => &[
            "CREATE_WORKSPACE",
            "EDIT_WORKSPACE",
            "DELETE_WORKSPACE",
            "MANAGE_WORKSPACE_SETTINGS",
            "ADD_MEMBER",
            "CHANGE_MEMBER_ROLE",
            "REMOVE_MEMBER",
            "CREATE_PROJECT",
            "EDIT_PROJECT",
            "DELETE_PROJECT",
            "CREATE_TASK",
            "EDIT_TASK",
            "DELETE_TASK",
            "VIEW_ONLY",
        ],
        RoleName::Admin => &[
            "ADD_MEMBER",
            "CREATE_PROJECT",
            "EDIT_PROJECT",
            "DELETE_PROJECT",
            "CREATE_TASK",
            "EDIT_TASK",
            "DELETE_TASK",
            "MANAGE_WORKSPACE_SETTINGS",
            "VIEW_ONLY",
        ],
        RoleName::Member => &["CREATE_TASK", "EDIT_TASK", "VIEW_ONLY"],
    };
    tags.iter().map(|t| t.to_string()).collect()
}

/// Inserts the built-in roles, skipping any that already exist.
/// Idempotent and transactional; returns the number of roles created.
pub fn seed_roles(conn: &mut PgConnection) -> QueryResult<usize> {
    conn.transaction(|conn| {
        let mut created = 0;

        for role in [RoleName::Owner, RoleName::Admin, RoleName::Member] {
            let inserted = diesel::insert_into(roles::table)
                .values(&NewRole {
                    name: role.as_str().to_string(),
                    permissions: permissions_for(role),
                })
                .on_conflict(roles::name)
                .do_nothing()
                .execute(conn)?;

            if inserted > 0 {
                info!(role = role.as_str(), "Seeded role");
                created += inserted;
            }
        }

        Ok(created)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_has_full_permission_set() {
        let owner = permissions_for(RoleName::Owner);
        let admin = permissions_for(RoleName::Admin);
        let member = permissions_for(RoleName::Member);

        assert!(owner.contains(&"DELETE_WORKSPACE".to_string()));
        assert!(!admin.contains(&"DELETE_WORKSPACE".to_string()));
        assert!(!member.contains(&"ADD_MEMBER".to_string()));
        assert!(member.len() < admin.len());
        assert!(admin.len() < owner.len());
    }
}
