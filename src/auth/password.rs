use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::error;

use crate::error::AppError;

/// Symbols a password may (and must at least once) contain.
pub const ALLOWED_SYMBOLS: &str = "@$!%*?&";

pub const PASSWORD_POLICY_MESSAGE: &str = "Password must be at least 8 characters, contain an uppercase letter, a lowercase letter, a number, and a special character";

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            AppError::Internal(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        AppError::Internal(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// At least 8 characters drawn from letters, digits and [`ALLOWED_SYMBOLS`],
/// with one of each class present.
pub fn meets_policy(password: &str) -> bool {
    lazy_static! {
        static ref CHARSET_RE: Regex = Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,}$").unwrap();
    }
    CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| ALLOWED_SYMBOLS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("Abcdef1!").expect("hashing should succeed");
        assert!(!verify_password("Abcdef1?", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn policy_accepts_compliant_passwords() {
        assert!(meets_policy("Abcdef1!"));
        assert!(meets_policy("zZ9@zZ9@zZ9@"));
    }

    #[test]
    fn policy_rejects_short_passwords() {
        assert!(!meets_policy("Abcde1!"));
        assert!(!meets_policy(""));
    }

    #[test]
    fn policy_rejects_missing_classes() {
        assert!(!meets_policy("Abcdefg!"), "no digit");
        assert!(!meets_policy("abcdef1!"), "no uppercase");
        assert!(!meets_policy("ABCDEF1!"), "no lowercase");
        assert!(!meets_policy("Abcdefg1"), "no symbol");
    }

    #[test]
    fn policy_rejects_characters_outside_allowed_set() {
        assert!(!meets_policy("Abcdef1!#"));
        assert!(!meets_policy("Abcd ef1!"));
        assert!(!meets_policy("Äbcdef1!"));
        assert!(!meets_policy("Abcdef1!\u{0663}"), "non-ASCII digit");
        assert!(!meets_policy("Abcdef!\u{0663}\u{0663}"), "only non-ASCII digits");
    }
}
