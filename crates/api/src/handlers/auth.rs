//! Login and logout.
//!
//! There are no passwords: accounts are provisioned on first login from the
//! submitted email, with the username taken from the email's local part.
//! Each login also upserts the user's artist tag so their uploads can be
//! found by author.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::models::user::{CreateUser, User};
use vitrine_db::repositories::{TagRepo, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();
    let username = email
        .split_once('@')
        .map(|(local, _)| local)
        .filter(|local| !local.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "email must be a valid address".into(),
            ))
        })?;

    let user = match UserRepo::find_by_username(&state.pool, username).await? {
        Some(existing) => UserRepo::update_profile(
            &state.pool,
            existing.id,
            &email,
            input.first_name.as_deref(),
            input.last_name.as_deref(),
        )
        .await?
        .unwrap_or(existing),
        None => {
            let user = UserRepo::create(
                &state.pool,
                &CreateUser {
                    username: username.to_string(),
                    email: email.clone(),
                    first_name: input.first_name.clone(),
                    last_name: input.last_name.clone(),
                },
            )
            .await?;
            tracing::info!(user_id = user.id, username = %user.username, "User provisioned");
            user
        }
    };

    let artist = TagRepo::create_or_get(&state.pool, &user.display_name(), true).await?;

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|err| AppError::InternalError(format!("Failed to sign token: {err}")))?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        artist_tag_id = artist.id,
        "User logged in"
    );

    Ok(Json(AuthResponse {
        access_token: token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user_info(user),
    }))
}

/// POST /auth/logout
///
/// Stateless tokens cannot be revoked; logging out clears the session's
/// browse cursors so the next browse starts from the top of the feed.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    state.sessions.clear(auth.user_id).await;
    tracing::info!(user_id = auth.user_id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
    }
}
