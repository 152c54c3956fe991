use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;

use crate::api::UsernameInfoResponse;
use crate::client::session::{Credentials, Session, generate_device_id};
use crate::config::ApiConfig;
use crate::error::{Result, ThreadsError};

/// HTTP客户端，封装了与 Threads 私有接口的所有交互
///
/// 通过 [`ThreadsClient::new`] 得到的是匿名客户端，只能查询用户 ID；
/// 调用 [`ThreadsClient::login`] 才会得到带会话的客户端。
#[derive(Clone)]
pub struct ThreadsClient {
    pub(crate) http: Client,
    pub(crate) config: Arc<ApiConfig>,
    pub(crate) device_id: String,
    pub(crate) session: Option<Arc<Session>>,
}

impl ThreadsClient {
    /// 创建匿名客户端，不发起任何网络请求
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            device_id: generate_device_id(),
            session: None,
        })
    }

    /// 登录并返回带会话的新客户端
    ///
    /// 先换取 token，再用新 token 解析数字用户 ID，两步都成功后才安装会话，
    /// 调用方不会看到只有一半的登录状态。
    pub async fn login(&self, credentials: &Credentials) -> Result<ThreadsClient> {
        credentials.validate()?;

        let bearer_token = self.fetch_bearer_token(credentials).await?;

        let mut pending = Session {
            username: credentials.username.clone(),
            device_id: self.device_id.clone(),
            bearer_token,
            user_id: 0,
            timezone_offset: self.config.timezone_offset,
        };

        let headers = self.headers_for(Some(&pending))?;
        pending.user_id = self
            .lookup_user_id(&credentials.username, headers)
            .await?;

        debug!("登录成功: {} (user_id={})", pending.username, pending.user_id);

        Ok(Self {
            http: self.http.clone(),
            config: Arc::clone(&self.config),
            device_id: self.device_id.clone(),
            session: Some(Arc::new(pending)),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// 当前会话，匿名客户端返回 None
    pub fn session(&self) -> Option<&Session> {
        self.session.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn require_session(&self) -> Result<&Session> {
        self.session.as_deref().ok_or(ThreadsError::NotAuthenticated)
    }

    /// 模拟设备的固定请求头，登录请求只带这些
    pub(crate) fn device_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&self.config.user_agent)?);
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            header_value(&self.config.sec_fetch_site)?,
        );
        headers.insert(CONTENT_TYPE, header_value(&self.config.form_content_type)?);
        Ok(headers)
    }

    /// 已登录时附带 `Authorization`
    pub(crate) fn headers_for(&self, session: Option<&Session>) -> Result<HeaderMap> {
        let mut headers = self.device_headers()?;
        if let Some(session) = session {
            headers.insert(AUTHORIZATION, header_value(&session.authorization())?);
        }
        Ok(headers)
    }

    pub(crate) fn auth_headers(&self) -> Result<HeaderMap> {
        let session = self.require_session()?;
        self.headers_for(Some(session))
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// 发送请求并把响应体原样解析为 JSON
    pub(crate) async fn send_json(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<Value> {
        let url = self.api_url(path);
        debug!("请求: {} {}", method, url);

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let body = response.text().await?;
        debug!("响应: {}", body);

        serde_json::from_str(&body)
            .map_err(|e| ThreadsError::MalformedResponse(format!("{}, body: {}", e, body)))
    }

    async fn authed_get(&self, path: &str) -> Result<Value> {
        let headers = self.auth_headers()?;
        self.send_json(Method::GET, path, headers, None).await
    }

    async fn authed_post(&self, path: &str) -> Result<Value> {
        let headers = self.auth_headers()?;
        self.send_json(Method::POST, path, headers, None).await
    }

    async fn lookup_user_id(&self, username: &str, headers: HeaderMap) -> Result<u64> {
        let path = format!("/users/{}/usernameinfo/", username);
        let body = self.send_json(Method::GET, &path, headers, None).await?;

        let parsed: UsernameInfoResponse = serde_json::from_value(body)
            .map_err(|e| ThreadsError::MalformedResponse(format!("缺少 user.pk: {}", e)))?;

        parsed
            .user
            .pk
            .as_u64()
            .ok_or_else(|| ThreadsError::MalformedResponse(format!("user.pk 不是数字: {:?}", parsed.user.pk)))
    }

    /// 获取用户的数字 ID，匿名客户端也可以调用
    pub async fn get_user_id(&self, username: &str) -> Result<u64> {
        let headers = self.headers_for(self.session())?;
        self.lookup_user_id(username, headers).await
    }

    /// 获取用户信息
    pub async fn get_user(&self, id: u64) -> Result<Value> {
        self.authed_get(&format!("/users/{}/info/", id)).await
    }

    /// 搜索用户，查询串原样拼进 URL
    pub async fn search_user(&self, query: &str) -> Result<Value> {
        self.authed_get(&format!("/users/search/?q={}", query)).await
    }

    pub async fn get_user_followers(&self, id: u64) -> Result<Value> {
        self.authed_get(&format!("/friendships/{}/followers/", id)).await
    }

    pub async fn get_user_following(&self, id: u64) -> Result<Value> {
        self.authed_get(&format!("/friendships/{}/following/", id)).await
    }

    pub async fn follow_user(&self, id: u64) -> Result<Value> {
        self.authed_post(&format!("/friendships/create/{}/", id)).await
    }

    pub async fn unfollow_user(&self, id: u64) -> Result<Value> {
        self.authed_post(&format!("/friendships/destroy/{}/", id)).await
    }

    /// 获取帖子及其回复
    pub async fn get_thread(&self, id: u64) -> Result<Value> {
        self.authed_get(&format!("/text_feed/{}/replies", id)).await
    }

    pub async fn get_thread_likers(&self, id: u64) -> Result<Value> {
        let user_id = self.require_session()?.user_id;
        self.authed_get(&format!("/media/{}_{}/likers/", id, user_id))
            .await
    }

    pub async fn delete_thread(&self, id: u64) -> Result<Value> {
        let user_id = self.require_session()?.user_id;
        self.authed_post(&format!(
            "/media/{}_{}/delete/?media_type=TEXT_POST",
            id, user_id
        ))
        .await
    }

    pub async fn like_thread(&self, id: u64) -> Result<Value> {
        let user_id = self.require_session()?.user_id;
        self.authed_post(&format!("/media/{}_{}/like/", id, user_id))
            .await
    }

    pub async fn unlike_thread(&self, id: u64) -> Result<Value> {
        let user_id = self.require_session()?.user_id;
        self.authed_post(&format!("/media/{}_{}/unlike/", id, user_id))
            .await
    }
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ThreadsError::InvalidHeader(format!("{}: {}", value, e)))
}
