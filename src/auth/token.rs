/// Token issuance and validation
///
/// Both access and refresh tokens are HS256-signed JWTs carrying the
/// fixed claim set from `claims.rs`. They differ only in lifetime:
/// minutes for access tokens, days for refresh tokens.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ConfigError};
use crate::models::User;

#[derive(Debug, Clone, Copy)]
pub enum TokenLifetime {
    Minutes(i64),
    Days(i64),
}

impl TokenLifetime {
    pub fn duration(&self) -> Duration {
        match self {
            TokenLifetime::Minutes(minutes) => Duration::minutes(*minutes),
            TokenLifetime::Days(days) => Duration::days(*days),
        }
    }
}

/// Sign a token for `user` valid from now until now + `lifetime`.
///
/// # Errors
/// Returns an error when the signing key is empty or encoding fails.
pub fn issue_token(
    user: &User,
    settings: &JwtSettings,
    lifetime: TokenLifetime,
) -> Result<String, AppError> {
    if settings.key.is_empty() {
        return Err(AppError::Config(ConfigError::MissingRequired(
            "jwt.key".to_string(),
        )));
    }

    let claims = Claims::new(user, settings, lifetime.duration());

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.key.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Short-lived token presented as a bearer credential on every protected
/// request.
pub fn issue_access_token(user: &User, settings: &JwtSettings) -> Result<String, AppError> {
    issue_token(
        user,
        settings,
        TokenLifetime::Minutes(settings.access_token_expire_minutes),
    )
}

/// Long-lived token stored on the user row and exchanged through the
/// refresh endpoint.
pub fn issue_refresh_token(user: &User, settings: &JwtSettings) -> Result<String, AppError> {
    issue_token(
        user,
        settings,
        TokenLifetime::Days(settings.refresh_token_expire_days),
    )
}

/// Validate a bearer token: signature, issuer, audience, and the
/// `[nbf, exp]` window with zero leeway. The library default of 60
/// seconds of clock-skew tolerance is disabled; a token one second past
/// its expiry is rejected.
pub fn validate_access_token(token: &str, settings: &JwtSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_nbf = true;
    validation.set_issuer(&[&settings.issuer]);
    validation.set_audience(&[&settings.audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Auth(AuthError::TokenExpired)
            }
            _ => AppError::Auth(AuthError::TokenInvalid),
        }
    })
}
