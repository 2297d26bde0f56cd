//! Signup, login and logout handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use basket_core::{Email, Role, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated identity returned to the client. Never includes the
/// password hash or cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserResponse {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

impl From<&User> for AuthUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `POST /api/auth/signup` - create an account and open a session.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthUserResponse>)> {
    let user = AuthService::new(state.pool())
        .signup(&body.email, &body.password)
        .await?;

    persist_identity(&session, &user).await?;

    tracing::info!(user_id = %user.id, "user signed up");

    Ok((StatusCode::CREATED, Json(AuthUserResponse::from(&user))))
}

/// `POST /api/auth/login` - open a session for an existing account.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<AuthUserResponse>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    // Rotate the session id so a pre-login session cannot be replayed
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    persist_identity(&session, &user).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthUserResponse::from(&user)))
}

/// `POST /api/auth/logout` - drop the session.
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

async fn persist_identity(session: &Session, user: &User) -> Result<()> {
    let identity = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(session, &identity)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(())
}
