//! Artwork service: inserts and author-joined listings with like/comment
//! aggregates.
//!
//! DESIGN
//! ======
//! Like and comment totals are correlated subqueries over the interaction
//! tables. Nothing is stored denormalized on the artwork row.

use serde::Serialize;
use sqlx::PgConnection;
use time::OffsetDateTime;

/// Newest-first cap for the global gallery listing.
pub const GALLERY_LIMIT: i64 = 50;

const LISTING_SELECT: &str = r"
    SELECT a.id, a.user_id, a.title, a.description, a.image_url, a.tags, a.created_at,
           a.views,
           u.username,
           u.avatar_url AS artist_avatar,
           (SELECT COUNT(*) FROM artwork_likes l WHERE l.artwork_id = a.id) AS likes,
           (SELECT COUNT(*) FROM artwork_comments c WHERE c.artwork_id = a.id) AS comments
    FROM artworks a
    JOIN users u ON a.user_id = u.id";

/// Artwork columns as written on submit.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Artwork {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Artwork joined with its author and aggregate counts.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ArtworkListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub artwork: Artwork,
    pub views: i32,
    pub username: String,
    pub artist_avatar: Option<String>,
    pub likes: i64,
    pub comments: i64,
}

/// Fields accepted for a new artwork.
#[derive(Debug, Clone)]
pub struct NewArtwork<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: &'a str,
    pub tags: &'a [String],
}

pub async fn create_artwork(conn: &mut PgConnection, new: &NewArtwork<'_>) -> Result<Artwork, sqlx::Error> {
    sqlx::query_as::<_, Artwork>(
        r"INSERT INTO artworks (user_id, title, description, image_url, tags)
          VALUES ($1, $2, $3, $4, $5)
          RETURNING id, user_id, title, description, image_url, tags, created_at",
    )
    .bind(new.user_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.image_url)
    .bind(new.tags)
    .fetch_one(&mut *conn)
    .await
}

pub async fn get_artwork(conn: &mut PgConnection, artwork_id: i32) -> Result<Option<ArtworkListing>, sqlx::Error> {
    let sql = format!("{LISTING_SELECT} WHERE a.id = $1");
    sqlx::query_as::<_, ArtworkListing>(&sql)
        .bind(artwork_id)
        .fetch_optional(&mut *conn)
        .await
}

/// All artworks by one owner, newest first.
pub async fn list_by_user(conn: &mut PgConnection, user_id: i32) -> Result<Vec<ArtworkListing>, sqlx::Error> {
    let sql = format!("{LISTING_SELECT} WHERE a.user_id = $1 ORDER BY a.created_at DESC, a.id DESC");
    sqlx::query_as::<_, ArtworkListing>(&sql)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
}

/// Newest artworks across all users, capped at [`GALLERY_LIMIT`].
pub async fn list_recent(conn: &mut PgConnection) -> Result<Vec<ArtworkListing>, sqlx::Error> {
    let sql = format!("{LISTING_SELECT} ORDER BY a.created_at DESC, a.id DESC LIMIT $1");
    sqlx::query_as::<_, ArtworkListing>(&sql)
        .bind(GALLERY_LIMIT)
        .fetch_all(&mut *conn)
        .await
}

#[cfg(test)]
#[path = "artworks_test.rs"]
mod tests;
