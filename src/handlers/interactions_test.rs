use super::*;
use serde_json::json;

fn post(body: &serde_json::Value) -> Event {
    Event::new("POST").with_json(body)
}

// =============================================================================
// decode
// =============================================================================

#[test]
fn decode_like() {
    let event = post(&json!({"action": "like", "artworkId": 4, "userId": 2}));
    assert_eq!(
        InteractionsHandler.decode(&event).unwrap(),
        InteractionAction::Like(LikeBody { artwork_id: 4, user_id: 2 })
    );
}

#[test]
fn decode_comment() {
    let event = post(&json!({"action": "comment", "artworkId": 4, "userId": 2, "commentText": "love the palette"}));
    assert_eq!(
        InteractionsHandler.decode(&event).unwrap(),
        InteractionAction::Comment(CommentBody { artwork_id: 4, user_id: 2, comment_text: "love the palette".into() })
    );
}

#[test]
fn decode_get_comments() {
    let event = post(&json!({"action": "get_comments", "artworkId": 4}));
    assert_eq!(
        InteractionsHandler.decode(&event).unwrap(),
        InteractionAction::GetComments(GetCommentsBody { artwork_id: 4 })
    );
}

#[test]
fn decode_follow() {
    let event = post(&json!({"action": "follow", "followerId": 1, "followingId": 2}));
    assert_eq!(
        InteractionsHandler.decode(&event).unwrap(),
        InteractionAction::Follow(FollowBody { follower_id: 1, following_id: 2 })
    );
}

#[test]
fn decode_ignores_http_method() {
    let event = Event::new("DELETE").with_json(&json!({"action": "follow", "followerId": 1, "followingId": 2}));
    assert!(matches!(InteractionsHandler.decode(&event), Ok(InteractionAction::Follow(_))));
}

#[test]
fn decode_unknown_action_reports_invalid_action() {
    let reply = InteractionsHandler.decode(&post(&json!({"action": "unlike"}))).unwrap_err();
    assert_eq!(reply.status_code, 400);
    assert_eq!(reply.body_json().unwrap(), json!({"error": "Invalid action"}));
}

#[test]
fn decode_missing_body_reports_invalid_action() {
    let reply = InteractionsHandler.decode(&Event::new("GET")).unwrap_err();
    assert_eq!(reply.status_code, 400);
}

#[test]
fn decode_like_missing_user_is_invalid() {
    assert!(InteractionsHandler.decode(&post(&json!({"action": "like", "artworkId": 4}))).is_err());
}

#[test]
fn outcomes_serialize_expected_keys() {
    assert_eq!(serde_json::to_value(LikeOutcome { likes: 3, liked: false }).unwrap(), json!({"likes": 3, "liked": false}));
    assert_eq!(serde_json::to_value(FollowOutcome { followed: true }).unwrap(), json!({"followed": true}));
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::db::test_helpers::{live_database_url, seed_user};
    use crate::handlers::artworks::ArtworksHandler;
    use crate::handlers::invoke;

    async fn seed_artwork(url: &str, owner: i32) -> i64 {
        let event = Event::new("POST").with_json(&json!({
            "userId": owner,
            "title": "Night market",
            "imageUrl": "https://cdn.example.com/market.png"
        }));
        let reply = invoke(&ArtworksHandler, url, &event).await.unwrap();
        reply.body_json().unwrap()["id"].as_i64().unwrap()
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn repeat_like_reports_not_liked_with_same_count() {
        let url = live_database_url().await;
        let owner = seed_user(&url, "artist").await;
        let fan = seed_user(&url, "fan").await;
        let artwork_id = seed_artwork(&url, owner).await;
        let like = post(&json!({"action": "like", "artworkId": artwork_id, "userId": fan}));

        let first = invoke(&InteractionsHandler, &url, &like).await.unwrap();
        assert_eq!(first.status_code, 200);
        assert_eq!(first.body_json().unwrap(), json!({"likes": 1, "liked": true}));

        let second = invoke(&InteractionsHandler, &url, &like).await.unwrap();
        assert_eq!(second.body_json().unwrap(), json!({"likes": 1, "liked": false}));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn repeat_follow_reports_not_followed() {
        let url = live_database_url().await;
        let follower = seed_user(&url, "follower").await;
        let followed = seed_user(&url, "followed").await;
        let follow = post(&json!({"action": "follow", "followerId": follower, "followingId": followed}));

        let first = invoke(&InteractionsHandler, &url, &follow).await.unwrap();
        assert_eq!(first.body_json().unwrap(), json!({"followed": true}));

        let second = invoke(&InteractionsHandler, &url, &follow).await.unwrap();
        assert_eq!(second.body_json().unwrap(), json!({"followed": false}));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn comments_list_newest_first_with_commenter() {
        let url = live_database_url().await;
        let owner = seed_user(&url, "muralist").await;
        let critic = seed_user(&url, "critic").await;
        let artwork_id = seed_artwork(&url, owner).await;

        for text in ["first", "second"] {
            let comment = post(&json!({"action": "comment", "artworkId": artwork_id, "userId": critic, "commentText": text}));
            let reply = invoke(&InteractionsHandler, &url, &comment).await.unwrap();
            assert_eq!(reply.status_code, 201);
            assert_eq!(reply.body_json().unwrap()["comment_text"], text);
        }

        let list = post(&json!({"action": "get_comments", "artworkId": artwork_id}));
        let reply = invoke(&InteractionsHandler, &url, &list).await.unwrap();
        assert_eq!(reply.status_code, 200);
        let rows = reply.body_json().unwrap();
        let texts: Vec<_> = rows.as_array().unwrap().iter().map(|r| r["comment_text"].clone()).collect();
        assert_eq!(texts, vec![json!("second"), json!("first")]);
        assert_eq!(rows[0]["username"], "critic");
    }
}
