//! Interaction service: artwork likes and comments, user follows.
//!
//! DESIGN
//! ======
//! Likes and follows are `ON CONFLICT DO NOTHING ... RETURNING id`. A
//! returned row means this call created the pair; no row means it already
//! existed. The unique constraint settles concurrent duplicates.

use serde::Serialize;
use sqlx::PgConnection;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ArtworkComment {
    pub id: i32,
    pub artwork_id: i32,
    pub user_id: i32,
    pub comment_text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Comment joined with the commenter's identity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub comment: ArtworkComment,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Like an artwork. Returns `true` only if this call inserted the like.
pub async fn like_artwork(conn: &mut PgConnection, artwork_id: i32, user_id: i32) -> Result<bool, sqlx::Error> {
    let inserted: Option<i32> = sqlx::query_scalar(
        r"INSERT INTO artwork_likes (artwork_id, user_id)
          VALUES ($1, $2)
          ON CONFLICT (artwork_id, user_id) DO NOTHING
          RETURNING id",
    )
    .bind(artwork_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(inserted.is_some())
}

pub async fn like_count(conn: &mut PgConnection, artwork_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM artwork_likes WHERE artwork_id = $1")
        .bind(artwork_id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn add_comment(
    conn: &mut PgConnection,
    artwork_id: i32,
    user_id: i32,
    comment_text: &str,
) -> Result<ArtworkComment, sqlx::Error> {
    sqlx::query_as::<_, ArtworkComment>(
        r"INSERT INTO artwork_comments (artwork_id, user_id, comment_text)
          VALUES ($1, $2, $3)
          RETURNING id, artwork_id, user_id, comment_text, created_at",
    )
    .bind(artwork_id)
    .bind(user_id)
    .bind(comment_text)
    .fetch_one(&mut *conn)
    .await
}

/// Comments on an artwork, newest first.
pub async fn list_comments(conn: &mut PgConnection, artwork_id: i32) -> Result<Vec<CommentListing>, sqlx::Error> {
    sqlx::query_as::<_, CommentListing>(
        r"SELECT c.id, c.artwork_id, c.user_id, c.comment_text, c.created_at,
                 u.username, u.avatar_url
          FROM artwork_comments c
          JOIN users u ON c.user_id = u.id
          WHERE c.artwork_id = $1
          ORDER BY c.created_at DESC, c.id DESC",
    )
    .bind(artwork_id)
    .fetch_all(&mut *conn)
    .await
}

/// Follow a user. Returns `true` only on the first follow of the pair.
pub async fn follow_user(conn: &mut PgConnection, follower_id: i32, following_id: i32) -> Result<bool, sqlx::Error> {
    let inserted: Option<i32> = sqlx::query_scalar(
        r"INSERT INTO user_follows (follower_id, following_id)
          VALUES ($1, $2)
          ON CONFLICT (follower_id, following_id) DO NOTHING
          RETURNING id",
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(inserted.is_some())
}

#[cfg(test)]
#[path = "interactions_test.rs"]
mod tests;
