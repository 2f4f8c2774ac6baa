use crate::domain::Page;
use crate::features::app_router;
use crate::services::FetchError;
use crate::tests::mocks::{MockPageSource, hidden_page, mock_state, sample_page};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use reqwest::StatusCode as UpstreamStatus;
use tower::ServiceExt;

async fn get(source: MockPageSource, uri: &str) -> (StatusCode, Option<String>, String) {
    let app = app_router(mock_state(source, "https://example.com"));

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_sitemap_success() {
    let home = Page {
        updated_at: Some("2024-01-02T03:04:05Z".to_string()),
        ..sample_page(1, "home", "en")
    };
    let source = MockPageSource::with_pages(vec![home, hidden_page(2, "draft", false, false)]);

    let (status, content_type, body) = get(source.clone(), "/sitemap").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/xml"));
    assert!(body.contains("<loc>https://example.com/en/home</loc>"));
    assert!(body.contains("<lastmod>2024-01-02T03:04:05Z</lastmod>"));
    assert!(body.contains("<changefreq>daily</changefreq>"));
    assert!(body.contains("<priority>1.0</priority>"));
    assert!(!body.contains("draft"));

    // exactly one upstream fetch per request
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_sitemap_fetches_fresh_every_request() {
    let source = MockPageSource::with_pages(vec![sample_page(1, "home", "en")]);

    get(source.clone(), "/sitemap").await;
    get(source.clone(), "/sitemap").await;

    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_sitemap_upstream_unauthorized_is_401() {
    let source = MockPageSource::failing(FetchError::Authentication);
    let (status, _, body) = get(source, "/sitemap").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json["detail"],
        "Authentication failed: WIKIJS_API_TOKEN is invalid"
    );
}

#[tokio::test]
async fn test_sitemap_upstream_failure_is_502() {
    let error = FetchError::UpstreamRequest {
        status: UpstreamStatus::INTERNAL_SERVER_ERROR,
        detail: "boom".into(),
    };
    let (status, _, body) = get(MockPageSource::failing(error), "/sitemap").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("GraphQL request failed"));
}

#[tokio::test]
async fn test_sitemap_configuration_and_internal_errors_are_500() {
    let (status, _, body) =
        get(MockPageSource::failing(FetchError::Configuration), "/sitemap").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("WIKIJS_API_URL format error"));

    let (status, _, body) = get(
        MockPageSource::failing(FetchError::Internal("connection reset".into())),
        "/sitemap",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Internal server error: connection reset"));
}

#[tokio::test]
async fn test_sitemap_bad_timestamp_is_500() {
    let page = Page {
        updated_at: Some("yesterday".to_string()),
        ..sample_page(1, "home", "en")
    };
    let (status, _, body) = get(MockPageSource::with_pages(vec![page]), "/sitemap").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Failed to render sitemap"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _, _) = get(MockPageSource::with_pages(vec![]), "/sitemap.xml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
