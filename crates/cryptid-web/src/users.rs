//! REST endpoint handlers for user accounts and sessions.
//!
//! Reading, replacing, and deleting a single user needs a session. Only
//! the user literally named `admin` may do it. Any other signed-in user
//! gets a 200 carrying a refusal message rather than an error status.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/user` | List all users |
//! | `GET` | `/user/{name}` | Get single user (admin) |
//! | `POST` | `/user` | Create a user (201) |
//! | `PATCH` | `/user/{name}` | Replace a user (admin) |
//! | `DELETE` | `/user/{name}` | Delete a user (admin) |
//! | `POST` | `/user/login` | Form login; sets the session cookie |
//! | `POST` | `/user/logout` | Clears the session cookie |
//! | `GET` | `/user/get/me` | Echo the caller's name and hash |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cryptid_service::ADMIN_NAME;
use cryptid_types::{NewUser, User};

use crate::error::ApiError;
use crate::extract::{FormBody, JsonBody};
use crate::handlers::validated;
use crate::session::{clear_token_cookie, token_cookie, CurrentUser};
use crate::state::AppState;

/// Message returned to signed-in users who are not the admin.
pub const NOT_ADMIN_MESSAGE: &str = "You are not admin to access this resource";

/// Form body of `POST /user/login` (OAuth2 password grant).
#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    /// Account name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// OAuth2 grant type; accepted and ignored.
    #[serde(default)]
    pub grant_type: Option<String>,
    /// OAuth2 scopes; accepted and ignored.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Response body of a successful login.
#[derive(Debug, serde::Serialize)]
pub struct TokenResponse {
    /// The signed session token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
}

/// Response body of `GET /user/get/me`.
#[derive(Debug, serde::Serialize)]
pub struct MeResponse {
    /// The caller's name.
    pub username: String,
    /// The caller's stored password hash.
    pub password: String,
}

fn not_admin() -> Response {
    Json(serde_json::json!({ "message": NOT_ADMIN_MESSAGE })).into_response()
}

fn is_admin(user: &User) -> bool {
    user.name == ADMIN_NAME
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// List every user.
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.get_all().await?))
}

/// Fetch one user. Admin only.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let current = current.require()?;
    if !is_admin(&current) {
        return Ok(not_admin());
    }
    Ok(Json(state.users.get_one(&name).await?).into_response())
}

/// Create a user from a name and plaintext password.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(new_user): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let new_user = validated(new_user)?;
    let created = state.users.create(&new_user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a user's name and password. Admin only.
pub async fn modify_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(name): Path<String>,
    JsonBody(new_user): JsonBody<NewUser>,
) -> Result<Response, ApiError> {
    let current = current.require()?;
    if !is_admin(&current) {
        return Ok(not_admin());
    }
    let new_user = validated(new_user)?;
    Ok(Json(state.users.modify(&name, &new_user).await?).into_response())
}

/// Delete a user, leaving a tombstone. Admin only.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let current = current.require()?;
    if !is_admin(&current) {
        return Ok(not_admin());
    }
    state.users.delete(&name).await?;
    Ok(Json(()).into_response())
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Check credentials, issue a token, and store it in the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    FormBody(form): FormBody<LoginForm>,
) -> Result<Response, ApiError> {
    let token = state
        .users
        .login(&form.username, &form.password)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let cookie = token_cookie(&token)?;
    let body = TokenResponse {
        access_token: token,
        token_type: "bearer",
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Clear the session cookie.
pub async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_token_cookie())],
        Json(serde_json::json!({ "msg": "Logged out successfully" })),
    )
}

/// Echo the caller's name and stored password hash.
pub async fn me(current: CurrentUser) -> Result<Json<MeResponse>, ApiError> {
    let user = current.require()?;
    Ok(Json(MeResponse {
        username: user.name,
        password: user.hash,
    }))
}
