use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user as user_repo;
use argon2::{
    Argon2, ParamsBuilder,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use sqlx::PgPool;
use uuid::Uuid;
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// Hashes a password using Argon2id.
fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let argon2 = Argon2::default();
    let result = argon2.verify_password(&password_bytes, &parsed_hash).is_ok();

    password_bytes.zeroize();
    Ok(result)
}

/// Creates a new, unconfirmed user.
///
/// A duplicate email surfaces as a session error carrying the backend's
/// message, the same way the sign-up form expects it.
pub async fn create_user(
    db: &PgPool,
    name: Option<String>,
    email: String,
    password: String,
) -> Result<User> {
    tracing::debug!("Creating user: {}", email);
    let hashed_password = hash_password(&password)?;

    let user = user_repo::create_user(db, Uuid::new_v4(), name, email, hashed_password)
        .await
        .map_err(|e| match e {
            AppError::Database(ref db_err)
                if db_err
                    .as_database_error()
                    .is_some_and(|d| d.is_unique_violation()) =>
            {
                AppError::Session("User already registered".to_string())
            }
            other => other,
        })?;

    tracing::info!("User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by email and password.
///
/// Unknown emails and wrong passwords fail with the same message. An
/// account that never confirmed its email cannot sign in.
pub async fn authenticate_user(db: &PgPool, email: &str, password: &str) -> Result<User> {
    tracing::debug!("Authenticating user: {}", email);

    let user = user_repo::find_by_email(db, email)
        .await?
        .ok_or_else(|| AppError::Session("Invalid email or password".to_string()))?;

    if !verify_password(password, &user.password)? {
        return Err(AppError::Session("Invalid email or password".to_string()));
    }

    if !user.is_confirmed() {
        return Err(AppError::Session("Email not confirmed".to_string()));
    }

    tracing::info!("User authenticated: {}", user.id);

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("a strong enough password").unwrap();
        assert!(verify_password("a strong enough password", &hash).unwrap());
        assert!(!verify_password("the wrong password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }
}
