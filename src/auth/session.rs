/// Refresh-token session store
///
/// Exactly one refresh token is active per user at any time. The value
/// and its expiry live on the `users` row, so overwriting the token is
/// the same single-statement write as the rest of the profile update,
/// and any previously issued value simply stops matching.
///
/// Known narrow race: two concurrent refreshes presenting the same token
/// can both pass the lookup before either write lands. The last write
/// wins and the other caller's freshly returned tokens stop matching on
/// their next use. There is no compare-and-swap on the stored value.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::User;

/// Overwrite the user's refresh token and expiry, invalidating whatever
/// value was stored before.
pub async fn store_refresh_token(
    pool: &PgPool,
    user_id: i32,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET refresh_token = $1, refresh_token_expiry = $2, updated_at = $3
        WHERE id = $4
        "#,
    )
    .bind(token)
    .bind(expires_at)
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Exact-match lookup by stored refresh-token value. A rotated, unknown,
/// or forged token finds nothing.
pub async fn find_user_by_refresh_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, refresh_token,
               refresh_token_expiry, role, created_at, updated_at
        FROM users
        WHERE refresh_token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Drop the user's stored refresh token, ending the session server-side.
pub async fn clear_refresh_token(pool: &PgPool, user_id: i32) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE users
        SET refresh_token = NULL, refresh_token_expiry = NULL, updated_at = $1
        WHERE id = $2
        "#,
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a user by email, for the login lookup.
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, refresh_token,
               refresh_token_expiry, role, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Fetch a user by id, for claims-based lookups on protected routes.
pub async fn find_user_by_id(pool: &PgPool, user_id: i32) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, refresh_token,
               refresh_token_expiry, role, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
