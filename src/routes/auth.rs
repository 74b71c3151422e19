/// Authentication routes
///
/// Register, login, token refresh, logout, and current-user lookup.
/// These handlers are the orchestrator: they compose the password
/// hasher, the token issuer, and the refresh-token session store. The
/// access token travels in the response body; the refresh token only
/// ever travels in an HttpOnly cookie.

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    web, HttpRequest, HttpResponse,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth;
use crate::auth::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::models::User;
use crate::validators::{is_valid_email, is_valid_name};

pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Accepted for wire compatibility; two-factor login is not implemented.
    #[serde(default)]
    pub two_factor_code: Option<String>,
    #[serde(default)]
    pub two_factor_recovery_code: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

fn refresh_cookie(value: String, settings: &JwtSettings) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, value)
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(CookieDuration::days(settings.refresh_token_expire_days))
        .finish()
}

/// Issue a fresh access/refresh pair and persist the refresh token on
/// the user row, overwriting (and thereby revoking) any previous one.
async fn start_session(
    user: &User,
    pool: &PgPool,
    settings: &JwtSettings,
) -> Result<(String, Cookie<'static>), AppError> {
    let access_token = auth::issue_access_token(user, settings)?;
    let refresh_token = auth::issue_refresh_token(user, settings)?;

    let expiry = Utc::now() + Duration::days(settings.refresh_token_expire_days);
    auth::store_refresh_token(pool, user.id, &refresh_token, expiry).await?;

    Ok((access_token, refresh_cookie(refresh_token, settings)))
}

/// POST /auth/register
///
/// Creates a user; does not log them in.
///
/// # Errors
/// - 400: missing/blank fields, invalid email, weak password
/// - 409: email already registered
pub async fn register(
    form: web::Json<RegisterRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    let name = is_valid_name(&form.name)?;
    let password_hash = auth::hash_password(&form.password)?;

    if auth::find_user_by_email(pool.get_ref(), &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "user with this email already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, name, email, password_hash, refresh_token,
                  refresh_token_expiry, role, created_at, updated_at
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(now)
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user.id,
        "User registered"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// POST /auth/login
///
/// Verifies credentials, issues an access token (response body) and a
/// refresh token (HttpOnly cookie), and overwrites any existing session
/// for the user.
///
/// # Errors
/// - 401: unknown email or wrong password, with the identical response
///   in both cases
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let user = auth::find_user_by_email(pool.get_ref(), &form.email)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    if !auth::verify_password(&form.password, &user.password_hash)? {
        tracing::warn!(request_id = %context.request_id, user_id = user.id, "Login failed");
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    let (access_token, cookie) =
        start_session(&user, pool.get_ref(), jwt_settings.get_ref()).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user.id,
        "Login successful"
    );

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AccessTokenResponse { access_token }))
}

/// POST /auth/refresh
///
/// Exchanges the refresh cookie for a new access/refresh pair. Rotation:
/// the stored value is overwritten, so the presented token can never be
/// used a second time.
///
/// # Errors
/// - 401: cookie absent, value unmatched (unknown, already rotated, or
///   forged), or the stored session expired
pub async fn refresh(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let presented = req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    let user = auth::find_user_by_refresh_token(pool.get_ref(), &presented)
        .await?
        .ok_or(AppError::Auth(AuthError::TokenInvalid))?;

    // The stored expiry wins even while the value still matches.
    match user.refresh_token_expiry {
        Some(expiry) if Utc::now() < expiry => {}
        _ => {
            tracing::warn!(
                request_id = %context.request_id,
                user_id = user.id,
                "Stored refresh token expired"
            );
            return Err(AppError::Auth(AuthError::TokenExpired));
        }
    }

    let (access_token, cookie) =
        start_session(&user, pool.get_ref(), jwt_settings.get_ref()).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user.id,
        "Token refreshed"
    );

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AccessTokenResponse { access_token }))
}

/// POST /auth/logout
///
/// Clears the refresh cookie and, when the cookie still maps to a user,
/// drops the stored refresh token so the session also ends server-side.
/// Always 204; logging out twice is not an error.
pub async fn logout(req: HttpRequest, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    if let Some(cookie) = req.cookie(REFRESH_COOKIE) {
        if let Some(user) =
            auth::find_user_by_refresh_token(pool.get_ref(), cookie.value()).await?
        {
            auth::clear_refresh_token(pool.get_ref(), user.id).await?;
            tracing::info!(user_id = user.id, "User logged out");
        }
    }

    let mut removal = Cookie::build(REFRESH_COOKIE, "")
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .finish();
    removal.make_removal();

    Ok(HttpResponse::NoContent().cookie(removal).finish())
}

/// GET /auth/me
///
/// Current user from the validated bearer token's claims.
pub async fn me(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user = auth::find_user_by_id(pool.get_ref(), claims.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
