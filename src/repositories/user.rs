use sqlx::PgPool;
use uuid::Uuid;
use crate::{error::Result, models::user::User};

/// Creates a new, unconfirmed user in the database.
///
/// # Arguments
///
/// * `pool` - The database connection pool.
/// * `id` - The unique identifier for the user.
/// * `name` - The user's display name.
/// * `email` - The user's email address.
/// * `password_hash` - The user's hashed password.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn create_user(
    pool: &PgPool,
    id: Uuid,
    name: Option<String>,
    email: String,
    password_hash: String,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password, confirmed_at, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Finds a user by their email address.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, confirmed_at, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Marks a user's email address as confirmed.
pub async fn confirm_user(pool: &PgPool, user_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET confirmed_at = NOW()
        WHERE id = $1 AND confirmed_at IS NULL
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
