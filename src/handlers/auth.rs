//! Auth handler: `register`, `login`, and profile lookup by `userId`.
//!
//! The issued token is opaque: it is returned to the client and never
//! persisted or checked by any handler.

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::info;

use super::{Handler, HandlerError};
use crate::event::{Event, Method, Preflight, Reply, STATUS_BAD_REQUEST, STATUS_CREATED, STATUS_NOT_FOUND, STATUS_OK, STATUS_UNAUTHORIZED};
use crate::services::auth as accounts;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST` body, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuthAction {
    Register(RegisterBody),
    Login(LoginBody),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Action(AuthAction),
    Profile { user_id: i32 },
}

/// `{"user": ..., "token": ...}` payload for register and login.
#[derive(Debug, Serialize)]
struct SessionPayload<U> {
    user: U,
    token: String,
}

fn invalid_request() -> Reply {
    Reply::error(STATUS_BAD_REQUEST, "Invalid request")
}

pub struct AuthHandler;

#[async_trait::async_trait]
impl Handler for AuthHandler {
    type Request = AuthRequest;

    const NAME: &'static str = "auth";
    const PREFLIGHT: Preflight =
        Preflight { allow_methods: "GET, POST, OPTIONS", allow_headers: "Content-Type, X-User-Id, X-Auth-Token" };

    fn decode(&self, event: &Event) -> Result<AuthRequest, Reply> {
        match event.method() {
            Method::Post => event
                .decode_body::<AuthAction>()
                .map(AuthRequest::Action)
                .map_err(|_| invalid_request()),
            Method::Get => match event.query_id("userId") {
                Ok(Some(user_id)) => Ok(AuthRequest::Profile { user_id }),
                _ => Err(invalid_request()),
            },
            _ => Err(invalid_request()),
        }
    }

    async fn execute(&self, conn: &mut PgConnection, request: AuthRequest) -> Result<Reply, HandlerError> {
        match request {
            AuthRequest::Action(AuthAction::Register(body)) => register(conn, body).await,
            AuthRequest::Action(AuthAction::Login(body)) => login(conn, body).await,
            AuthRequest::Profile { user_id } => profile(conn, user_id).await,
        }
    }
}

async fn register(conn: &mut PgConnection, body: RegisterBody) -> Result<Reply, HandlerError> {
    let password_hash = accounts::hash_password(&body.password);
    let user = accounts::create_user(conn, &body.email, &password_hash, &body.username).await?;
    info!(user_id = user.id, "user registered");

    let payload = SessionPayload { user, token: accounts::generate_token() };
    Ok(Reply::json(STATUS_CREATED, &payload)?)
}

async fn login(conn: &mut PgConnection, body: LoginBody) -> Result<Reply, HandlerError> {
    let password_hash = accounts::hash_password(&body.password);
    let Some(user) = accounts::find_by_credentials(conn, &body.email, &password_hash).await? else {
        return Ok(Reply::error(STATUS_UNAUTHORIZED, "Invalid credentials"));
    };

    let payload = SessionPayload { user, token: accounts::generate_token() };
    Ok(Reply::json(STATUS_OK, &payload)?)
}

async fn profile(conn: &mut PgConnection, user_id: i32) -> Result<Reply, HandlerError> {
    match accounts::find_profile(conn, user_id).await? {
        Some(user) => Ok(Reply::json(STATUS_OK, &user)?),
        None => Ok(Reply::error(STATUS_NOT_FOUND, "User not found")),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
