/// JWT claim set
///
/// A fixed struct rather than a dynamic claim map: every token carries
/// exactly these fields, serialized through serde by `jsonwebtoken`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::configuration::JwtSettings;
use crate::models::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's display name
    pub sub: String,
    pub email: String,
    /// Empty string when the user has no role assigned
    pub role: String,
    /// Numeric user id
    pub id: i32,
    /// Not valid before (Unix timestamp, equals the issue time)
    pub nbf: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    /// Unique per issuance; two tokens for the same user never collide,
    /// even when minted within the same clock second.
    pub jti: String,
}

impl Claims {
    pub fn new(user: &User, settings: &JwtSettings, lifetime: Duration) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone().unwrap_or_default(),
            id: user.id,
            nbf: now,
            exp: now + lifetime.num_seconds(),
            iss: settings.issuer.clone(),
            aud: settings.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp < chrono::Utc::now().timestamp()
    }
}
