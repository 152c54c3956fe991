use log::debug;
use reqwest::Method;
use serde_json::Value;

use crate::api::{DevicePayload, TextPostAppInfo, ThreadPayload};
use crate::client::ThreadsClient;
use crate::client::encoding::quote_payload;
use crate::client::session::Session;
use crate::client::upload::next_upload_id;
use crate::config::ApiConfig;
use crate::error::{Result, ThreadsError};

/// 帖子附件，链接和图片二选一
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadAttachment {
    Link(String),
    /// 远程 URL 或本地路径
    Image(String),
}

impl ThreadAttachment {
    pub fn from_options(url: Option<&str>, image: Option<&str>) -> Result<Self> {
        match (url, image) {
            (Some(url), None) => Ok(ThreadAttachment::Link(url.to_string())),
            (None, Some(image)) => Ok(ThreadAttachment::Image(image.to_string())),
            (None, None) => Err(ThreadsError::InvalidArgument(
                "发帖需要提供链接或图片".to_string(),
            )),
            (Some(_), Some(_)) => Err(ThreadsError::InvalidArgument(
                "链接和图片只能提供一个".to_string(),
            )),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ThreadAttachment::Link(_) => "/media/configure_text_only_post/",
            ThreadAttachment::Image(_) => "/media/configure_text_post_app_feed/",
        }
    }
}

/// 组装发帖请求体
///
/// 链接帖的 `upload_id` 是时间戳，图片帖的 `upload_id` 是上传接口返回的 ID。
pub fn build_thread_payload(
    config: &ApiConfig,
    session: &Session,
    caption: &str,
    attachment: &ThreadAttachment,
    reply_to: Option<u64>,
    upload_id: u64,
) -> ThreadPayload {
    let mut payload = ThreadPayload {
        text_post_app_info: TextPostAppInfo {
            reply_control: 0,
            reply_id: reply_to,
            link_attachment_url: None,
        },
        timezone_offset: session.timezone_offset.to_string(),
        source_type: "4".to_string(),
        caption: caption.to_string(),
        uid: session.user_id,
        device_id: session.device_id.clone(),
        upload_id,
        device: DevicePayload {
            manufacturer: config.device.manufacturer.clone(),
            model: config.device.model.clone(),
            android_version: config.device.android_version,
            android_release: config.device.android_release.clone(),
        },
        publish_mode: None,
        scene_capture_type: None,
    };

    match attachment {
        ThreadAttachment::Link(url) => {
            payload.publish_mode = Some("text_post".to_string());
            payload.text_post_app_info.link_attachment_url = Some(url.clone());
        }
        ThreadAttachment::Image(_) => {
            payload.scene_capture_type = Some(String::new());
        }
    }

    payload
}

/// `signed_body=SIGNATURE.<转义后的 JSON>`，服务端并不校验签名
pub fn signed_body(payload: &ThreadPayload) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    Ok(format!("signed_body=SIGNATURE.{}", quote_payload(&json)))
}

impl ThreadsClient {
    /// 发帖
    ///
    /// `url` 与 `image` 必须恰好提供一个；`image` 可以是 HTTP(S) 地址或本地路径，
    /// 会先走上传流程。上传失败时不会再发起发帖请求。
    pub async fn create_thread(
        &self,
        caption: &str,
        url: Option<&str>,
        image: Option<&str>,
        reply_to: Option<u64>,
    ) -> Result<Value> {
        let session = self.require_session()?;
        let attachment = ThreadAttachment::from_options(url, image)?;

        let upload_id = match &attachment {
            ThreadAttachment::Link(_) => next_upload_id(),
            ThreadAttachment::Image(source) => self.upload_image(source).await?,
        };

        let payload = build_thread_payload(
            &self.config,
            session,
            caption,
            &attachment,
            reply_to,
            upload_id,
        );
        let body = signed_body(&payload)?;

        debug!("发帖: {} (upload_id={})", attachment.endpoint(), upload_id);

        self.send_json(
            Method::POST,
            attachment.endpoint(),
            self.auth_headers()?,
            Some(body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::tests::{authed_client, test_session};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_attachment_requires_exactly_one() {
        assert!(matches!(
            ThreadAttachment::from_options(None, None),
            Err(ThreadsError::InvalidArgument(_))
        ));
        assert!(matches!(
            ThreadAttachment::from_options(Some("https://a.b"), Some("x.jpg")),
            Err(ThreadsError::InvalidArgument(_))
        ));
        assert_eq!(
            ThreadAttachment::from_options(Some("https://a.b"), None).unwrap().endpoint(),
            "/media/configure_text_only_post/"
        );
        assert_eq!(
            ThreadAttachment::from_options(None, Some("x.jpg")).unwrap().endpoint(),
            "/media/configure_text_post_app_feed/"
        );
    }

    #[test]
    fn test_link_payload() {
        let attachment = ThreadAttachment::Link("https://example.com".to_string());
        let payload = build_thread_payload(
            &ApiConfig::default(),
            &test_session(),
            "hello",
            &attachment,
            None,
            1689000000,
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["publish_mode"], "text_post");
        assert_eq!(value["text_post_app_info"]["link_attachment_url"], "https://example.com");
        assert_eq!(value["text_post_app_info"]["reply_control"], 0);
        assert!(value["text_post_app_info"].get("reply_id").is_none());
        assert!(value.get("scene_capture_type").is_none());
        assert_eq!(value["timezone_offset"], "-14400");
        assert_eq!(value["source_type"], "4");
        assert_eq!(value["_uid"], 314);
        assert_eq!(value["upload_id"], 1689000000u64);
        assert_eq!(value["device_id"], "android-00000000000000ff");
        assert_eq!(value["device"]["manufacturer"], "OnePlus");
        assert_eq!(value["device"]["android_version"], 25);
    }

    #[test]
    fn test_image_payload() {
        let attachment = ThreadAttachment::Image("cat.jpg".to_string());
        let payload = build_thread_payload(
            &ApiConfig::default(),
            &test_session(),
            "meow",
            &attachment,
            Some(555),
            99,
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["scene_capture_type"], "");
        assert_eq!(value["upload_id"], 99);
        assert_eq!(value["text_post_app_info"]["reply_id"], 555);
        assert!(value.get("publish_mode").is_none());
        assert!(value["text_post_app_info"].get("link_attachment_url").is_none());
    }

    #[test]
    fn test_signed_body_encoding() {
        let attachment = ThreadAttachment::Link("https://x.io/a?b=c".to_string());
        let payload = build_thread_payload(
            &ApiConfig::default(),
            &test_session(),
            "hi there (again)!",
            &attachment,
            None,
            1,
        );
        let body = signed_body(&payload).unwrap();

        assert!(body.starts_with("signed_body=SIGNATURE.%7B%22text_post_app_info%22"));
        assert!(body.contains("%22caption%22%3A%22hi%20there%20(again)!%22"));
        assert!(body.contains("https%3A%2F%2Fx.io%2Fa%3Fb%3Dc"));
        assert_eq!(body.matches('=').count(), 1);
    }

    #[tokio::test]
    async fn test_create_thread_without_attachment_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(path_regex(".*"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = authed_client(&server);
        let result = client.create_thread("hello", None, None, None).await;
        assert!(matches!(result, Err(ThreadsError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_create_link_thread() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/media/configure_text_only_post/"))
            .and(body_string_contains("signed_body=SIGNATURE."))
            .and(body_string_contains("link_attachment_url"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "media": {"pk": "1"}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = authed_client(&server);
        let result = client
            .create_thread("hello", Some("https://example.com"), None, None)
            .await
            .unwrap();
        assert_eq!(result["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_image_thread_uses_upload_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex("^/rupload_igphoto/.*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upload_id": "4242"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/media/configure_text_post_app_feed/"))
            .and(body_string_contains("%22upload_id%22%3A4242"))
            .and(body_string_contains("%22scene_capture_type%22%3A%22%22"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = authed_client(&server);
        let image = format!("{}/img.jpg", server.uri());
        let result = client.create_thread("pic", None, Some(&image), None).await.unwrap();
        assert_eq!(result["status"], "ok");
    }
}
