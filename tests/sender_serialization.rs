//! Verifies that racing sends never interleave on the wire.
//!
//! The client serializes outbound calls through its own mutex, so two
//! simultaneous sends must arrive at the provider as two complete, separate
//! POST bodies.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wxpusher_bridge::sender::{PushSender, WxPusherClient};

#[tokio::test]
async fn racing_sends_produce_two_complete_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send/message"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 1000 }))
                // Keep the first request in flight long enough for the
                // second send to be waiting on the lock.
                .set_delay(Duration::from_millis(100)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = Arc::new(
        WxPusherClient::with_endpoint(
            format!("{}/api/send/message", server.uri()),
            "UID_x",
            "AT_y",
        )
        .unwrap(),
    );

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.send("first", "first body").await })
    };
    let second = {
        let client = client.clone();
        tokio::spawn(async move { client.send("second", "second body").await })
    };

    assert!(first.await.unwrap());
    assert!(second.await.unwrap());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let mut summaries = Vec::new();
    for request in &requests {
        // Each body must parse as one complete payload on its own.
        let body: serde_json::Value = serde_json::from_slice(&request.body)
            .expect("request body is not a single complete JSON document");
        assert_eq!(body["appToken"], "AT_y");
        assert_eq!(body["uids"], json!(["UID_x"]));
        assert_eq!(body["contentType"], 1);
        summaries.push(body["summary"].as_str().unwrap().to_string());
    }
    summaries.sort();
    assert_eq!(summaries, vec!["first", "second"]);
}
