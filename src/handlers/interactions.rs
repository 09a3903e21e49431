//! Interaction handler: `like`, `comment`, `get_comments` and `follow`.
//!
//! Dispatches on the body's `action` alone; the HTTP method is not
//! consulted beyond the `OPTIONS` preflight.

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::info;

use super::{Handler, HandlerError};
use crate::event::{Event, Preflight, Reply, STATUS_BAD_REQUEST, STATUS_CREATED, STATUS_OK};
use crate::services::interactions as social;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeBody {
    pub artwork_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub artwork_id: i32,
    pub user_id: i32,
    pub comment_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCommentsBody {
    pub artwork_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowBody {
    pub follower_id: i32,
    pub following_id: i32,
}

/// Request body, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InteractionAction {
    Like(LikeBody),
    Comment(CommentBody),
    GetComments(GetCommentsBody),
    Follow(FollowBody),
}

#[derive(Debug, Serialize)]
struct LikeOutcome {
    likes: i64,
    liked: bool,
}

#[derive(Debug, Serialize)]
struct FollowOutcome {
    followed: bool,
}

pub struct InteractionsHandler;

#[async_trait::async_trait]
impl Handler for InteractionsHandler {
    type Request = InteractionAction;

    const NAME: &'static str = "interactions";
    const PREFLIGHT: Preflight =
        Preflight { allow_methods: "GET, POST, DELETE, OPTIONS", allow_headers: "Content-Type, X-User-Id" };

    fn decode(&self, event: &Event) -> Result<InteractionAction, Reply> {
        event
            .decode_body::<InteractionAction>()
            .map_err(|_| Reply::error(STATUS_BAD_REQUEST, "Invalid action"))
    }

    async fn execute(&self, conn: &mut PgConnection, request: InteractionAction) -> Result<Reply, HandlerError> {
        match request {
            InteractionAction::Like(body) => {
                let liked = social::like_artwork(conn, body.artwork_id, body.user_id).await?;
                let likes = social::like_count(conn, body.artwork_id).await?;
                Ok(Reply::json(STATUS_OK, &LikeOutcome { likes, liked })?)
            }
            InteractionAction::Comment(body) => {
                let comment = social::add_comment(conn, body.artwork_id, body.user_id, &body.comment_text).await?;
                info!(comment_id = comment.id, artwork_id = comment.artwork_id, "artwork comment added");
                Ok(Reply::json(STATUS_CREATED, &comment)?)
            }
            InteractionAction::GetComments(body) => {
                let comments = social::list_comments(conn, body.artwork_id).await?;
                Ok(Reply::json(STATUS_OK, &comments)?)
            }
            InteractionAction::Follow(body) => {
                let followed = social::follow_user(conn, body.follower_id, body.following_id).await?;
                Ok(Reply::json(STATUS_OK, &FollowOutcome { followed })?)
            }
        }
    }
}

#[cfg(test)]
#[path = "interactions_test.rs"]
mod tests;
