//! Listing: ordering, pagination and the status filter.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rstest::rstest;
use serde_json::{json, Value};

fn ids(body: &Value) -> Vec<i64> {
    body["data"]["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect()
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::new().await;
    let first = app.open_request("Assembly").await;
    let second = app.open_request("Paint").await;
    let third = app.open_request("Shipping").await;

    let (status, body) = app
        .call(
            Method::GET,
            "/api/v1/maintenance-requests",
            None,
            Some(&app.maintenance.token),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![third, second, first]);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 20);
    assert_eq!(body["data"]["total_pages"], 1);
}

#[rstest]
#[case(1, vec![5, 4])]
#[case(2, vec![3, 2])]
#[case(3, vec![1])]
#[case(4, vec![])]
#[tokio::test]
async fn list_paginates(#[case] page: u64, #[case] expected_positions: Vec<usize>) {
    let app = TestApp::new().await;
    let mut created = Vec::new();
    for n in 0..5 {
        created.push(app.open_request(&format!("Dept {}", n)).await);
    }

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/v1/maintenance-requests?page={}&limit=2", page),
            None,
            Some(&app.requester.token),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let expected: Vec<i64> = expected_positions
        .iter()
        .map(|position| created[position - 1])
        .collect();
    assert_eq!(ids(&body), expected);
    assert_eq!(body["data"]["total"], 5);
    assert_eq!(body["data"]["total_pages"], 3);
}

#[tokio::test]
async fn oversized_limit_is_capped() {
    let app = TestApp::new().await;
    app.open_request("Assembly").await;

    let (_, body) = app
        .call(
            Method::GET,
            "/api/v1/maintenance-requests?limit=5000",
            None,
            Some(&app.admin.token),
        )
        .await;

    assert_eq!(body["data"]["limit"], 100);
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = TestApp::new().await;
    let open = app.open_request("Assembly").await;
    let started = app.open_request("Paint").await;
    let done = app.open_request("Shipping").await;
    app.start(started, None).await;
    app.start(done, None).await;
    app.finish(done, None).await;

    for (status_filter, expected) in [("open", open), ("in_progress", started), ("done", done)] {
        let (status, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/maintenance-requests?status={}", status_filter),
                None,
                Some(&app.requester.token),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![expected], "filter {}", status_filter);
        assert_eq!(body["data"]["total"], 1);
    }
}

#[tokio::test]
async fn page_far_beyond_the_end_is_empty() {
    let app = TestApp::new().await;
    app.open_request("Assembly").await;

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/v1/maintenance-requests?page={}&limit=100", u64::MAX),
            None,
            Some(&app.requester.token),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["page"], u64::MAX);
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/maintenance-requests?status=closed",
            None,
            Some(&app.requester.token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}
