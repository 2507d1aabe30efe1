// tests/wechat_adapter.rs
//
// Drives the WeChat adapter against a local mock of the platform API to
// pin down the error taxonomy the dispatcher's retry policy depends on.
use pressrelay::application::ports::platform::{PlatformError, PlatformPublisher};
use pressrelay::domain::article::{Article, ArticleSlug, ArticleTitle, PlatformId};
use pressrelay::domain::syndication::CredentialBundle;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article() -> Article {
    Article {
        slug: ArticleSlug::new("field-report").unwrap(),
        title: ArticleTitle::new("Field report").unwrap(),
        body: "Body of the article.".into(),
        category: Some("tech".into()),
        platforms: vec![PlatformId::new("wechat").unwrap()],
        draft: false,
        date: None,
        lastmod: None,
    }
}

fn credentials() -> CredentialBundle {
    let mut bundle = CredentialBundle::new();
    bundle.insert("app_id", "wx-test");
    bundle.insert("app_secret", "s3cret");
    bundle
}

async fn mock_token_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .and(query_param("grant_type", "client_credential"))
        .and(query_param("appid", "wx-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "TOKEN",
            "expires_in": 7200
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn publish_creates_a_draft_and_returns_its_media_id() {
    let server = MockServer::start().await;
    mock_token_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/draft/add"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "media_id": "MEDIA_42"
        })))
        .mount(&server)
        .await;

    let publisher = pressrelay::infrastructure::platforms::WeChatPublisher::with_api_base(
        server.uri(),
    );
    let post_id = publisher.publish(&article(), &credentials()).await.unwrap();
    assert_eq!(post_id.as_str(), "MEDIA_42");
}

#[tokio::test]
async fn invalid_app_secret_is_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 40125,
            "errmsg": "invalid appsecret"
        })))
        .mount(&server)
        .await;

    let publisher = pressrelay::infrastructure::platforms::WeChatPublisher::with_api_base(
        server.uri(),
    );
    let err = publisher
        .publish(&article(), &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::AuthFailure(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn server_errors_are_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let publisher = pressrelay::infrastructure::platforms::WeChatPublisher::with_api_base(
        server.uri(),
    );
    let err = publisher
        .publish(&article(), &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::TransientNetwork(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn http_429_maps_to_rate_limited() {
    let server = MockServer::start().await;
    mock_token_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/draft/add"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let publisher = pressrelay::infrastructure::platforms::WeChatPublisher::with_api_base(
        server.uri(),
    );
    let err = publisher
        .publish(&article(), &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::RateLimited));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn draft_rejection_is_terminal() {
    let server = MockServer::start().await;
    mock_token_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/draft/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 45110,
            "errmsg": "content contains forbidden words"
        })))
        .mount(&server)
        .await;

    let publisher = pressrelay::infrastructure::platforms::WeChatPublisher::with_api_base(
        server.uri(),
    );
    let err = publisher
        .publish(&article(), &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::ContentRejected(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn missing_credential_fields_fail_without_a_request() {
    let server = MockServer::start().await;
    let publisher = pressrelay::infrastructure::platforms::WeChatPublisher::with_api_base(
        server.uri(),
    );

    let err = publisher
        .publish(&article(), &CredentialBundle::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::AuthFailure(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
