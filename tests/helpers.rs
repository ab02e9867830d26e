use serde_json::{Value, json};
use tilfetch::reddit::RedditConfig;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{basic_auth, method, path},
};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const TOKEN: &str = "test-token";

pub fn reddit_config(server: &MockServer) -> RedditConfig {
    RedditConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        user_agent: "tilfetch-tests/0.1".to_string(),
        auth_url: server.uri(),
        api_url: server.uri(),
    }
}

/// Token endpoint that must be hit exactly `times` times.
pub async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(basic_auth(CLIENT_ID, CLIENT_SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "bearer",
            "expires_in": 86400,
            "scope": "*"
        })))
        .expect(times)
        .mount(server)
        .await;
}

pub fn link(title: &str, url: &str, score: i64, over_18: bool) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "title": title,
            "url": url,
            "score": score,
            "over_18": over_18,
            "permalink": "/r/todayilearned/comments/abc123/",
            "created_utc": 1700000000.0
        }
    })
}

pub fn listing(children: Vec<Value>) -> Value {
    json!({
        "kind": "Listing",
        "data": {
            "after": null,
            "dist": children.len(),
            "children": children
        }
    })
}
