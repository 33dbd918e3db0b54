use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rusqlite::{named_params, OptionalExtension};
use serde::Deserialize;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::access_cookie;
use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub inputs: Credentials,
    pub user_image: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// POST /register: create an account unless the username or email is taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<&'static str>> {
    let conn = state.db.get()?;

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE email = :email OR username = :username",
            named_params! {
                ":email": req.inputs.email,
                ":username": req.inputs.username,
            },
            |row| row.get(0),
        )
        .optional()?;

    if existing.is_some() {
        return Err(AppError::Conflict("User already exist !".into()));
    }

    let hash = hash_password(&req.inputs.password, state.config.auth.bcrypt_cost)?;

    conn.execute(
        "INSERT INTO users (userImage, username, email, password) \
         VALUES (:user_image, :username, :email, :password)",
        named_params! {
            ":user_image": req.user_image,
            ":username": req.inputs.username,
            ":email": req.inputs.email,
            ":password": hash,
        },
    )?;

    tracing::info!("Registered user {}", req.inputs.username);
    Ok(Json("user has been created"))
}

/// POST /login: verify credentials and hand out the access-token cookie
///
/// Both an unknown username and a wrong password answer 404.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let found = conn
        .query_row(
            "SELECT id, username, email, userImage, password FROM users WHERE username = :username",
            named_params! { ":username": req.username },
            |row| {
                Ok((
                    User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        user_image: row.get(3)?,
                    },
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((user, hash)) = found else {
        return Err(AppError::NotFound("User not found !".into()));
    };

    if !verify_password(&req.password, &hash) {
        return Err(AppError::NotFound("Incorrect username or password !".into()));
    }

    let token = state.keys.issue(user.id)?;
    let cookie = access_cookie(&state.config.auth.cookie_name, &token);

    tracing::debug!("User {} logged in", user.id);
    Ok(([(header::SET_COOKIE, cookie)], Json(user)).into_response())
}
