/// Database row models
///
/// These mirror the `users` and `task_items` tables. `User` is never
/// serialized to clients directly; response DTOs in the route modules
/// expose only the safe subset of its fields.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// The single active refresh token, stored by value. Overwritten on
    /// every login/refresh; any previously issued value stops matching.
    pub refresh_token: Option<String>,
    pub refresh_token_expiry: Option<DateTime<Utc>>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: i32,
}
