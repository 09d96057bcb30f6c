use crate::{
    auth::{
        hash_password, verify_password, AuthData, CurrentUser, LoginRequest, RefreshRequest,
        RegisterRequest, TokenService,
    },
    error::AppError,
    models::UserResponse,
    response::ApiResponse,
    store,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a user account and returns the public user record together with a
/// fresh access/refresh token pair. A duplicate email fails with 409.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    if store::users::find_by_email(&pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = store::users::insert(&pool, &payload.email, &password_hash, &payload.name).await?;

    let pair = tokens.issue_pair(user.id, &user.email)?;

    Ok(HttpResponse::Created().json(ApiResponse::new(
        AuthData {
            user: user.into(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        },
        "User registered successfully",
    )))
}

/// Login user
///
/// The rejection message is identical for an unknown email and a wrong
/// password so the response does not disclose which field was wrong.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let user = store::users::find_by_email(&pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let pair = tokens.issue_pair(user.id, &user.email)?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        AuthData {
            user: user.into(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        },
        "Login successful",
    )))
}

/// Exchange a refresh token for a fresh token pair.
///
/// The referenced user is re-fetched before reissuing: a deleted user
/// invalidates all outstanding tokens even without a revocation store.
#[post("/refresh")]
pub async fn refresh(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    payload: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let claims = tokens
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".into()))?;

    let user = store::users::find_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    let pair = tokens.issue_pair(user.id, &user.email)?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(pair, "Token refreshed successfully")))
}

/// Logout user
///
/// Tokens are stateless, so there is nothing to revoke server-side before
/// natural expiry; the client discards its copies.
#[post("/logout")]
pub async fn logout(_user: CurrentUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(ApiResponse::new(serde_json::Value::Null, "Logout successful")))
}

/// Get the authenticated user's own record.
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let record = store::users::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        json!({ "user": UserResponse::from(record) }),
        "User retrieved successfully",
    )))
}
