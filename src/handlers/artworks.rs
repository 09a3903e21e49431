//! Artwork handler: gallery reads by `id`, by `userId`, or newest overall,
//! and artwork submission on `POST`.

use std::num::ParseIntError;

use serde::Deserialize;
use sqlx::PgConnection;
use tracing::info;

use super::{Handler, HandlerError};
use crate::event::{Event, Method, Preflight, Reply, STATUS_BAD_REQUEST, STATUS_CREATED, STATUS_METHOD_NOT_ALLOWED, STATUS_NOT_FOUND, STATUS_OK};
use crate::services::artworks::{self as gallery, NewArtwork};

/// `POST` body for a new artwork.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDraft {
    pub user_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworksRequest {
    One { artwork_id: i32 },
    ByUser { user_id: i32 },
    Recent,
    Create(ArtworkDraft),
}

pub struct ArtworksHandler;

#[async_trait::async_trait]
impl Handler for ArtworksHandler {
    type Request = ArtworksRequest;

    const NAME: &'static str = "artworks";
    const PREFLIGHT: Preflight =
        Preflight { allow_methods: "GET, POST, PUT, OPTIONS", allow_headers: "Content-Type, X-User-Id" };

    fn decode(&self, event: &Event) -> Result<ArtworksRequest, Reply> {
        let invalid = |_: ParseIntError| Reply::error(STATUS_BAD_REQUEST, "Invalid request");
        match event.method() {
            Method::Get => {
                if let Some(artwork_id) = event.query_id("id").map_err(invalid)? {
                    return Ok(ArtworksRequest::One { artwork_id });
                }
                if let Some(user_id) = event.query_id("userId").map_err(invalid)? {
                    return Ok(ArtworksRequest::ByUser { user_id });
                }
                Ok(ArtworksRequest::Recent)
            }
            Method::Post => event
                .decode_body::<ArtworkDraft>()
                .map(ArtworksRequest::Create)
                .map_err(|_| Reply::error(STATUS_BAD_REQUEST, "Invalid request")),
            _ => Err(Reply::error(STATUS_METHOD_NOT_ALLOWED, "Method not allowed")),
        }
    }

    async fn execute(&self, conn: &mut PgConnection, request: ArtworksRequest) -> Result<Reply, HandlerError> {
        match request {
            ArtworksRequest::One { artwork_id } => match gallery::get_artwork(conn, artwork_id).await? {
                Some(artwork) => Ok(Reply::json(STATUS_OK, &artwork)?),
                None => Ok(Reply::error(STATUS_NOT_FOUND, "Artwork not found")),
            },
            ArtworksRequest::ByUser { user_id } => {
                let artworks = gallery::list_by_user(conn, user_id).await?;
                Ok(Reply::json(STATUS_OK, &artworks)?)
            }
            ArtworksRequest::Recent => {
                let artworks = gallery::list_recent(conn).await?;
                Ok(Reply::json(STATUS_OK, &artworks)?)
            }
            ArtworksRequest::Create(draft) => {
                let tags = draft.tags.unwrap_or_default();
                let new = NewArtwork {
                    user_id: draft.user_id,
                    title: &draft.title,
                    description: draft.description.as_deref().unwrap_or(""),
                    image_url: &draft.image_url,
                    tags: &tags,
                };
                let artwork = gallery::create_artwork(conn, &new).await?;
                info!(artwork_id = artwork.id, user_id = artwork.user_id, "artwork created");
                Ok(Reply::json(STATUS_CREATED, &artwork)?)
            }
        }
    }
}

#[cfg(test)]
#[path = "artworks_test.rs"]
mod tests;
