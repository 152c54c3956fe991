use serde_json::json;
use std::io::Write;
use threads_private_api::{ApiConfig, Credentials, ThreadsClient, ThreadsError};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PATH: &str =
    "/api/v1/bloks/apps/com.bloks.www.bloks.caa.login.async.send_login_request/";

fn config_for(server: &MockServer) -> ApiConfig {
    ApiConfig::with_base_urls(format!("{}/api/v1", server.uri()), server.uri())
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r"Bearer IGT:2:tok_999\\nmore"))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/zuck/usernameinfo/"))
        .and(header("authorization", "Bearer IGT:2:tok_999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"pk": "314"}})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_installs_token_and_user_id() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let anonymous = ThreadsClient::new(config_for(&server)).unwrap();
    let client = anonymous
        .login(&Credentials::new("zuck", "any-password"))
        .await
        .unwrap();

    let session = client.session().unwrap();
    assert_eq!(session.bearer_token, "tok_999");
    assert_eq!(session.user_id, 314);
    assert_eq!(session.device_id, anonymous.device_id());
    assert!(!anonymous.is_authenticated());
}

#[tokio::test]
async fn failed_user_lookup_leaves_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r"Bearer IGT:2:tok_999\\"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/zuck/usernameinfo/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "login_required"})))
        .mount(&server)
        .await;

    let anonymous = ThreadsClient::new(config_for(&server)).unwrap();
    let result = anonymous.login(&Credentials::new("zuck", "pw")).await;
    assert!(matches!(result, Err(ThreadsError::MalformedResponse(_))));
    assert!(anonymous.session().is_none());
}

#[tokio::test]
async fn empty_credentials_are_rejected_without_network() {
    let server = MockServer::start().await;
    Mock::given(path_regex(".*"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ThreadsClient::new(config_for(&server)).unwrap();
    let result = client.login(&Credentials::new("", "pw")).await;
    assert!(matches!(result, Err(ThreadsError::InvalidArgument(_))));
}

#[tokio::test]
async fn upload_failure_stops_thread_creation() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path_regex("^/rupload_igphoto/.*"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/media/configure_text_post_app_feed/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut image = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    image.write_all(b"\xFF\xD8\xFFjpeg").unwrap();

    let client = ThreadsClient::new(config_for(&server))
        .unwrap()
        .login(&Credentials::new("zuck", "pw"))
        .await
        .unwrap();

    let result = client
        .create_thread("caption", None, image.path().to_str(), None)
        .await;
    assert!(matches!(result, Err(ThreadsError::UploadFailed { .. })));
}
