//! Account service: password hashing, token issuance, user rows.
//!
//! TRADE-OFFS
//! ==========
//! Passwords are stored as an unsalted SHA-256 hex digest so existing
//! `password_hash` values keep matching. Tokens are random and returned to
//! the client only; nothing stores or validates them.

use std::fmt::Write;

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgConnection;
use time::OffsetDateTime;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Lowercase hex SHA-256 of the plaintext password.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Row returned by registration.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NewUser {
    pub id: i32,
    pub email: String,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Public profile fields. Never includes the password hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Insert a user. A duplicate email surfaces as a unique violation.
pub async fn create_user(
    conn: &mut PgConnection,
    email: &str,
    password_hash: &str,
    username: &str,
) -> Result<NewUser, sqlx::Error> {
    sqlx::query_as::<_, NewUser>(
        r"INSERT INTO users (email, password_hash, username)
          VALUES ($1, $2, $3)
          RETURNING id, email, username, created_at",
    )
    .bind(email)
    .bind(password_hash)
    .bind(username)
    .fetch_one(&mut *conn)
    .await
}

/// Look up a user by exact email and password hash.
pub async fn find_by_credentials(
    conn: &mut PgConnection,
    email: &str,
    password_hash: &str,
) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r"SELECT id, email, username, avatar_url, bio, role, created_at
          FROM users
          WHERE email = $1 AND password_hash = $2",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn find_profile(conn: &mut PgConnection, user_id: i32) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r"SELECT id, email, username, avatar_url, bio, role, created_at
          FROM users
          WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
