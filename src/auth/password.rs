//! Credential hashing with Argon2id.
//!
//! Stateless: hashing and verification hold no shared state and are safe to
//! call from any number of concurrent requests.

use argon2::{
    password_hash::{
        PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2, Params,
};
use rand::rngs::OsRng;

/// Default work factor: memory cost of 2^10 KiB per hash.
pub const DEFAULT_HASH_COST: u32 = 10;

#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

impl PasswordPolicy {
    pub fn complex(min_length: usize) -> Self {
        Self {
            min_length,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }

    pub fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.len() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }

        if self.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(PasswordPolicyError::MissingSpecial);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min_length} characters")]
    TooShort { min_length: usize },
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
    #[error("Password must contain at least one digit")]
    MissingDigit,
    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        Self::hash_password_with_cost(password, DEFAULT_HASH_COST)
    }

    /// Hashes a password using Argon2id with a random per-hash salt.
    ///
    /// `memory_cost_log2` controls the memory usage (KiB = 2^cost):
    /// - 10: ~1MB memory, the default
    /// - 16: ~64MB memory, hardened production deployments
    /// - 4: fast, test-only
    pub fn hash_password_with_cost(
        password: &str,
        memory_cost_log2: u32,
    ) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);

        let m_cost = 1u32 << memory_cost_log2.min(22); // Cap at 4GB

        let params =
            Params::new(m_cost, 3, 1, None).map_err(|_| argon2::password_hash::Error::Algorithm)?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Recomputes the hash from `password` and compares against the stored
    /// value; the mismatch case is `Ok(false)`, not an error.
    pub fn verify_password(
        password: &str,
        password_hash: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(password_hash)?;
        let argon2 = Argon2::default();
        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let password = "secret123";
        let hash = PasswordService::hash_password_with_cost(password, 4)
            .expect("Hashing should succeed");

        assert!(PasswordService::verify_password(password, &hash)
            .expect("Verification should succeed"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = PasswordService::hash_password_with_cost("correct_password", 4)
            .expect("Hashing should succeed");

        assert!(!PasswordService::verify_password("wrong_password", &hash)
            .expect("Verification should succeed"));
    }

    #[test]
    fn test_salts_are_unique_per_hash() {
        let password = "same_password";
        let hash1 = PasswordService::hash_password_with_cost(password, 4).unwrap();
        let hash2 = PasswordService::hash_password_with_cost(password, 4).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_format() {
        let hash = PasswordService::hash_password_with_cost("test", 4).unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_garbage_hash_is_an_error_not_a_mismatch() {
        assert!(PasswordService::verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_password_policy_default() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("password").is_ok());
        assert!(policy.validate("short").is_err());
    }

    #[test]
    fn test_password_policy_complex() {
        let policy = PasswordPolicy::complex(8);

        assert!(policy.validate("password1!").is_err());
        assert!(policy.validate("PASSWORD1!").is_err());
        assert!(policy.validate("Password!").is_err());
        assert!(policy.validate("Password1").is_err());
        assert!(policy.validate("Password1!").is_ok());
    }

    #[test]
    fn test_password_policy_error_messages() {
        let policy = PasswordPolicy::complex(10);

        let err = policy.validate("short").unwrap_err();
        assert!(err.to_string().contains("10 characters"));

        let policy = PasswordPolicy::complex(8);
        let err = policy.validate("password1!").unwrap_err();
        assert!(err.to_string().contains("uppercase"));
    }
}
