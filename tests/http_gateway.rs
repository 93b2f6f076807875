//! HTTP submission gateway against a stub server.

use std::time::Duration;

use wiremock::matchers::{body_json_schema, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use freightdesk::core::booking::BookingDraft;
use freightdesk::core::gateway::{
    BookingConfirmation, HttpSubmissionGateway, SubmissionError, SubmissionGateway,
};

fn draft() -> BookingDraft {
    let mut draft = BookingDraft::new();
    draft.booking_name = "Lagos import run".to_string();
    draft.client = "client-7".to_string();
    draft.consignee = "Acme Traders".to_string();
    draft.driver_id = Some("drv-3".to_string());
    draft
}

#[tokio::test]
async fn submit_posts_draft_and_parses_confirmation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bookings"))
        .and(body_json_schema::<BookingDraft>)
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "booking_id": "bk-remote-42",
            "reference": "REF-2024-042"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpSubmissionGateway::new(
        &format!("{}/bookings", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();

    let confirmation: BookingConfirmation = gateway.submit(&draft()).await.unwrap();
    assert_eq!(confirmation.booking_id, "bk-remote-42");
    assert_eq!(confirmation.reference.as_deref(), Some("REF-2024-042"));
}

#[tokio::test]
async fn rejection_carries_status_and_body_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bookings"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string("consignee not recognized"),
        )
        .mount(&server)
        .await;

    let gateway = HttpSubmissionGateway::new(
        &format!("{}/bookings", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = gateway.submit(&draft()).await.unwrap_err();
    match err {
        SubmissionError::Rejected { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "consignee not recognized");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_confirmation_is_a_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let gateway = HttpSubmissionGateway::new(
        &format!("{}/bookings", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = gateway.submit(&draft()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Network(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    // Port 9 (discard) is closed in practice
    let gateway =
        HttpSubmissionGateway::new("http://127.0.0.1:9/bookings", Duration::from_secs(1)).unwrap();

    let err = gateway.submit(&draft()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Network(_)));
}
