//! Forum handler: thread index and detail on `GET`; `create_thread`,
//! `add_comment` and `vote` actions on `POST`.

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::info;

use super::{Handler, HandlerError};
use crate::event::{Event, Method, Preflight, Reply, STATUS_BAD_REQUEST, STATUS_CREATED, STATUS_NOT_FOUND, STATUS_OK};
use crate::services::forum::{self as threads, DEFAULT_THREAD_TYPE, NewThread};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadBody {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub thread_type: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentBody {
    pub thread_id: i32,
    pub user_id: i32,
    pub comment_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
    pub thread_id: i32,
    pub user_id: i32,
    pub vote_value: i32,
}

/// `POST` body, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ForumAction {
    CreateThread(CreateThreadBody),
    AddComment(AddCommentBody),
    Vote(VoteBody),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForumRequest {
    Thread { thread_id: i32 },
    Recent,
    Action(ForumAction),
}

#[derive(Debug, Serialize)]
struct VoteTally {
    votes: i64,
}

fn invalid_request() -> Reply {
    Reply::error(STATUS_BAD_REQUEST, "Invalid request")
}

pub struct ForumHandler;

#[async_trait::async_trait]
impl Handler for ForumHandler {
    type Request = ForumRequest;

    const NAME: &'static str = "forum";
    const PREFLIGHT: Preflight =
        Preflight { allow_methods: "GET, POST, OPTIONS", allow_headers: "Content-Type, X-User-Id" };

    fn decode(&self, event: &Event) -> Result<ForumRequest, Reply> {
        match event.method() {
            Method::Get => match event.query_id("id") {
                Ok(Some(thread_id)) => Ok(ForumRequest::Thread { thread_id }),
                Ok(None) => Ok(ForumRequest::Recent),
                Err(_) => Err(invalid_request()),
            },
            Method::Post => event
                .decode_body::<ForumAction>()
                .map(ForumRequest::Action)
                .map_err(|_| invalid_request()),
            _ => Err(invalid_request()),
        }
    }

    async fn execute(&self, conn: &mut PgConnection, request: ForumRequest) -> Result<Reply, HandlerError> {
        match request {
            ForumRequest::Thread { thread_id } => match threads::get_thread(conn, thread_id).await? {
                Some(thread) => Ok(Reply::json(STATUS_OK, &thread)?),
                None => Ok(Reply::error(STATUS_NOT_FOUND, "Thread not found")),
            },
            ForumRequest::Recent => {
                let recent = threads::list_recent(conn).await?;
                Ok(Reply::json(STATUS_OK, &recent)?)
            }
            ForumRequest::Action(ForumAction::CreateThread(body)) => create_thread(conn, body).await,
            ForumRequest::Action(ForumAction::AddComment(body)) => {
                let comment = threads::add_comment(conn, body.thread_id, body.user_id, &body.comment_text).await?;
                Ok(Reply::json(STATUS_CREATED, &comment)?)
            }
            ForumRequest::Action(ForumAction::Vote(body)) => {
                threads::cast_vote(conn, body.thread_id, body.user_id, body.vote_value).await?;
                let votes = threads::vote_total(conn, body.thread_id).await?;
                Ok(Reply::json(STATUS_OK, &VoteTally { votes })?)
            }
        }
    }
}

async fn create_thread(conn: &mut PgConnection, body: CreateThreadBody) -> Result<Reply, HandlerError> {
    let tags = body.tags.unwrap_or_default();
    let new = NewThread {
        user_id: body.user_id,
        title: &body.title,
        content: &body.content,
        thread_type: body.thread_type.as_deref().unwrap_or(DEFAULT_THREAD_TYPE),
        tags: &tags,
    };
    let thread = threads::create_thread(conn, &new).await?;
    info!(thread_id = thread.id, user_id = thread.user_id, "thread created");
    Ok(Reply::json(STATUS_CREATED, &thread)?)
}

#[cfg(test)]
#[path = "forum_test.rs"]
mod tests;
