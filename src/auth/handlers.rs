use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        claims::Claims,
        dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest},
        middleware::require_auth,
        services,
    },
    error::{not_found, AppError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).fallback(not_found))
        .route("/login", post(login).fallback(not_found))
}

/// The gate wraps only the GET endpoint; other methods reach `not_found`.
pub fn me_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/me",
        get(get_me)
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .fallback(not_found),
    )
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(v)| v).map_err(|e| {
        warn!(error = %e, "rejected request body");
        AppError::Validation(e.body_text())
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let session = services::register(state.users.as_ref(), &state.keys, body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully",
            user: session.user,
            token: session.token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = services::login(state.users.as_ref(), &state.keys, body(payload)?).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful",
        user: session.user,
        token: session.token,
    }))
}

#[instrument(skip(state, claims), fields(user_id = claims.id))]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MeResponse>, AppError> {
    let user = services::current_user(state.users.as_ref(), &claims).await?;
    Ok(Json(MeResponse {
        success: true,
        user,
    }))
}
