use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{Credentials, LoginResponse, MessageResponse},
        services::{AccountError, AccountService},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let creds = Credentials::from_body(&body);
    run_blocking(state, move |accounts| {
        accounts.register(&creds.email, &creds.password)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Account created successfully")),
    ))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let creds = Credentials::from_body(&body);
    let user = run_blocking(state, move |accounts| {
        accounts.login(&creds.email, &creds.password)
    })
    .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        user,
    }))
}

/// File I/O and argon2 both block, so account calls run off the async workers.
async fn run_blocking<T, F>(state: AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AccountService) -> Result<T, AccountError> + Send + 'static,
{
    let accounts = state.accounts.clone();
    match tokio::task::spawn_blocking(move || f(&accounts)).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!(error = %e, "account task failed");
            Err(ApiError::internal())
        }
    }
}
