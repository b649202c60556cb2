//! Shared helper functions.

use uuid::Uuid;

/// Generates a short human-readable task code, e.g. `task-8f3k2a`.
/// Uniqueness is enforced by the store's unique index on `tasks.task_code`.
pub fn generate_task_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("task-{}", &id[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_code_format() {
        let code = generate_task_code();
        assert!(code.starts_with("task-"));
        assert_eq!(code.len(), "task-".len() + 6);
    }

    #[test]
    fn test_task_codes_vary() {
        let a = generate_task_code();
        let b = generate_task_code();
        assert_ne!(a, b);
    }
}
