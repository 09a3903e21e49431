use super::*;
use serde_json::json;

// =============================================================================
// Method
// =============================================================================

#[test]
fn method_parse_is_case_insensitive() {
    assert_eq!(Method::parse("get"), Method::Get);
    assert_eq!(Method::parse("Post"), Method::Post);
    assert_eq!(Method::parse(" OPTIONS "), Method::Options);
}

#[test]
fn method_parse_unknown_is_other() {
    assert_eq!(Method::parse("BREW"), Method::Other);
    assert_eq!(Method::parse(""), Method::Other);
}

#[test]
fn method_display_matches_as_str() {
    assert_eq!(Method::Delete.to_string(), "DELETE");
}

// =============================================================================
// Event decoding
// =============================================================================

#[test]
fn event_deserializes_platform_shape() {
    let raw = r#"{"httpMethod":"GET","queryStringParameters":{"id":"7"}}"#;
    let event: Event = serde_json::from_str(raw).unwrap();
    assert_eq!(event.method(), Method::Get);
    assert_eq!(event.query("id"), Some("7"));
    assert!(event.body.is_none());
}

#[test]
fn event_defaults_method_to_get() {
    let event: Event = serde_json::from_str("{}").unwrap();
    assert_eq!(event.method(), Method::Get);
}

#[test]
fn event_accepts_null_query_parameters() {
    let raw = r#"{"httpMethod":"POST","body":"{}","queryStringParameters":null}"#;
    let event: Event = serde_json::from_str(raw).unwrap();
    assert!(event.query("anything").is_none());
}

#[test]
fn query_treats_blank_as_absent() {
    let event = Event::new("GET").with_query("userId", "  ");
    assert!(event.query("userId").is_none());
    assert_eq!(event.query_id("userId").unwrap(), None);
}

#[test]
fn query_id_parses_integers() {
    let event = Event::new("GET").with_query("id", "42");
    assert_eq!(event.query_id("id").unwrap(), Some(42));
}

#[test]
fn query_id_rejects_non_integers() {
    let event = Event::new("GET").with_query("id", "abc");
    assert!(event.query_id("id").is_err());
}

#[derive(Debug, serde::Deserialize)]
struct Probe {
    name: String,
}

#[test]
fn decode_body_reads_json() {
    let event = Event::new("POST").with_json(&json!({"name": "iris"}));
    let probe: Probe = event.decode_body().unwrap();
    assert_eq!(probe.name, "iris");
}

#[test]
fn decode_body_missing_body_reports_missing_field() {
    let event = Event::new("POST");
    assert!(event.decode_body::<Probe>().is_err());
}

#[test]
fn decode_body_malformed_json_is_error() {
    let event = Event::new("POST").with_body("{not json");
    assert!(event.decode_body::<Probe>().is_err());
}

// =============================================================================
// Reply
// =============================================================================

#[test]
fn json_reply_carries_common_headers() {
    let reply = Reply::json(STATUS_CREATED, &json!({"id": 1})).unwrap();
    assert_eq!(reply.status_code, 201);
    assert_eq!(reply.header(HEADER_CONTENT_TYPE), Some("application/json"));
    assert_eq!(reply.header(HEADER_ALLOW_ORIGIN), Some("*"));
    assert_eq!(reply.body_json().unwrap()["id"], 1);
}

#[test]
fn error_reply_wraps_message() {
    let reply = Reply::error(STATUS_NOT_FOUND, "User not found");
    assert_eq!(reply.status_code, 404);
    assert_eq!(reply.body_json().unwrap(), json!({"error": "User not found"}));
}

#[test]
fn preflight_reply_has_empty_body_and_no_content_type() {
    let reply = Reply::preflight(&Preflight { allow_methods: "GET, OPTIONS", allow_headers: "Content-Type" });
    assert_eq!(reply.status_code, 200);
    assert!(reply.body.is_empty());
    assert_eq!(reply.header(HEADER_ALLOW_METHODS), Some("GET, OPTIONS"));
    assert_eq!(reply.header(HEADER_ALLOW_HEADERS), Some("Content-Type"));
    assert_eq!(reply.header(HEADER_MAX_AGE), Some("86400"));
    assert!(reply.header(HEADER_CONTENT_TYPE).is_none());
}

#[test]
fn reply_serializes_with_camel_case_fields() {
    let reply = Reply::error(STATUS_BAD_REQUEST, "Invalid request");
    let value = serde_json::to_value(&reply).unwrap();
    assert_eq!(value["statusCode"], 400);
    assert_eq!(value["body"], r#"{"error":"Invalid request"}"#);
    assert_eq!(value["headers"]["Access-Control-Allow-Origin"], "*");
}
