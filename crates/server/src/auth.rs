//! Account API endpoints

use api_types::{
    Message,
    auth::{Login, LoginResponse, MeResponse, ProfileUpdate, ProfileUpdated, Register, UserView},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{ProfileUpdateCmd, RegisterCmd, User};

use crate::{
    ServerError,
    extract::Payload,
    server::{Identity, ServerState},
};

fn user_view(user: User) -> UserView {
    UserView {
        user_id: user.id,
        name: user.name,
        email: user.email,
    }
}

/// Handle account registration
pub async fn register(
    State(state): State<ServerState>,
    Payload(payload): Payload<Register>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    state
        .engine
        .register(RegisterCmd {
            name: payload.name.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            password: payload.password.unwrap_or_default(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Message::new("User registered successfully")),
    ))
}

/// Handle login, answering with a bearer token
pub async fn login(
    State(state): State<ServerState>,
    Payload(payload): Payload<Login>,
) -> Result<Json<LoginResponse>, ServerError> {
    let user = state
        .engine
        .login(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;
    let token = state
        .tokens
        .issue(user.id)
        .map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        user: user_view(user),
    }))
}

pub async fn me(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<MeResponse>, ServerError> {
    let user = state.engine.user(identity.user_id).await?;
    Ok(Json(MeResponse {
        user: user_view(user),
    }))
}

pub async fn update_profile(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Payload(payload): Payload<ProfileUpdate>,
) -> Result<Json<ProfileUpdated>, ServerError> {
    let user = state
        .engine
        .update_profile(ProfileUpdateCmd {
            user_id: identity.user_id,
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(ProfileUpdated {
        message: "Profile updated successfully".to_string(),
        user: user_view(user),
    }))
}
