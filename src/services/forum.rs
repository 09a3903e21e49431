//! Forum service: threads, thread comments and per-voter vote upserts.

use serde::Serialize;
use sqlx::PgConnection;
use time::OffsetDateTime;

/// Newest-first cap for the thread index.
pub const THREAD_LIMIT: i64 = 50;

pub const DEFAULT_THREAD_TYPE: &str = "discussion";

const LISTING_SELECT: &str = r"
    SELECT t.id, t.user_id, t.title, t.content, t.thread_type, t.tags, t.created_at,
           t.is_active, t.views,
           u.username,
           u.avatar_url,
           (SELECT COUNT(*) FROM thread_comments c WHERE c.thread_id = t.id) AS replies,
           (SELECT COALESCE(SUM(v.vote_value), 0) FROM thread_votes v WHERE v.thread_id = t.id) AS votes
    FROM forum_threads t
    JOIN users u ON t.user_id = u.id";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Thread {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub thread_type: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Thread joined with its author, reply count and vote total.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ThreadListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub thread: Thread,
    pub is_active: bool,
    pub views: i32,
    pub username: String,
    pub avatar_url: Option<String>,
    pub replies: i64,
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ThreadComment {
    pub id: i32,
    pub thread_id: i32,
    pub user_id: i32,
    pub comment_text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewThread<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub content: &'a str,
    pub thread_type: &'a str,
    pub tags: &'a [String],
}

pub async fn create_thread(conn: &mut PgConnection, new: &NewThread<'_>) -> Result<Thread, sqlx::Error> {
    sqlx::query_as::<_, Thread>(
        r"INSERT INTO forum_threads (user_id, title, content, thread_type, tags)
          VALUES ($1, $2, $3, $4, $5)
          RETURNING id, user_id, title, content, thread_type, tags, created_at",
    )
    .bind(new.user_id)
    .bind(new.title)
    .bind(new.content)
    .bind(new.thread_type)
    .bind(new.tags)
    .fetch_one(&mut *conn)
    .await
}

pub async fn get_thread(conn: &mut PgConnection, thread_id: i32) -> Result<Option<ThreadListing>, sqlx::Error> {
    let sql = format!("{LISTING_SELECT} WHERE t.id = $1");
    sqlx::query_as::<_, ThreadListing>(&sql)
        .bind(thread_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn list_recent(conn: &mut PgConnection) -> Result<Vec<ThreadListing>, sqlx::Error> {
    let sql = format!("{LISTING_SELECT} ORDER BY t.created_at DESC, t.id DESC LIMIT $1");
    sqlx::query_as::<_, ThreadListing>(&sql)
        .bind(THREAD_LIMIT)
        .fetch_all(&mut *conn)
        .await
}

pub async fn add_comment(
    conn: &mut PgConnection,
    thread_id: i32,
    user_id: i32,
    comment_text: &str,
) -> Result<ThreadComment, sqlx::Error> {
    sqlx::query_as::<_, ThreadComment>(
        r"INSERT INTO thread_comments (thread_id, user_id, comment_text)
          VALUES ($1, $2, $3)
          RETURNING id, thread_id, user_id, comment_text, created_at",
    )
    .bind(thread_id)
    .bind(user_id)
    .bind(comment_text)
    .fetch_one(&mut *conn)
    .await
}

/// Record a vote. A repeat vote by the same user replaces the earlier value.
pub async fn cast_vote(conn: &mut PgConnection, thread_id: i32, user_id: i32, vote_value: i32) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"INSERT INTO thread_votes (thread_id, user_id, vote_value)
          VALUES ($1, $2, $3)
          ON CONFLICT (thread_id, user_id)
          DO UPDATE SET vote_value = EXCLUDED.vote_value",
    )
    .bind(thread_id)
    .bind(user_id)
    .bind(vote_value)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Sum of vote values for a thread, 0 when nobody voted.
pub async fn vote_total(conn: &mut PgConnection, thread_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COALESCE(SUM(vote_value), 0) FROM thread_votes WHERE thread_id = $1")
        .bind(thread_id)
        .fetch_one(&mut *conn)
        .await
}

#[cfg(test)]
#[path = "forum_test.rs"]
mod tests;
