use log::{debug, info};

use crate::api::{BloksClientContext, ClientInputParams, LoginParams, ServerParams};
use crate::client::encoding::quote_payload;
use crate::client::session::Credentials;
use crate::client::ThreadsClient;
use crate::config::ApiConfig;
use crate::error::{Result, ThreadsError};

const LOGIN_PATH: &str = "/bloks/apps/com.bloks.www.bloks.caa.login.async.send_login_request/";

/// 登录响应中 token 前面的固定标记
pub const BEARER_MARKER: &str = "Bearer IGT:2:";

/// token 之后紧跟的两个字面反斜杠
const TOKEN_TERMINATOR: &str = "\\\\";

/// 从登录响应文本中取出 bearer token
///
/// 响应不是合法 JSON，token 夹在 `Bearer IGT:2:` 和第一个 `\\` 之间。
/// 找不到标记或结束符时返回 None。
pub fn extract_bearer_token(text: &str) -> Option<&str> {
    let start = text.find(BEARER_MARKER)? + BEARER_MARKER.len();
    let rest = &text[start..];
    let end = rest.find(TOKEN_TERMINATOR)?;
    Some(&rest[..end])
}

/// 构造登录表单：`params`、`bk_client_context` 都经过 JSON 序列化和自定义转义
pub(crate) fn build_login_form(
    config: &ApiConfig,
    credentials: &Credentials,
    device_id: &str,
) -> Result<String> {
    let params = LoginParams {
        client_input_params: ClientInputParams {
            password: credentials.password.clone(),
            contact_point: credentials.username.clone(),
            device_id: device_id.to_string(),
        },
        server_params: ServerParams {
            credential_type: "password".to_string(),
            device_id: device_id.to_string(),
        },
    };
    let context = BloksClientContext {
        bloks_version: config.bloks_version.clone(),
        styles_id: config.styles_id.clone(),
    };

    Ok(format!(
        "params={}&bk_client_context={}&bloks_versioning_id={}",
        quote_payload(&serde_json::to_string(&params)?),
        quote_payload(&serde_json::to_string(&context)?),
        config.bloks_version
    ))
}

impl ThreadsClient {
    /// 用用户名密码换取 bearer token
    pub(crate) async fn fetch_bearer_token(&self, credentials: &Credentials) -> Result<String> {
        let url = self.api_url(LOGIN_PATH);
        let form = build_login_form(&self.config, credentials, &self.device_id)?;

        debug!("登录请求: {} (用户: {})", url, credentials.username);

        let response = self
            .http
            .post(&url)
            .headers(self.device_headers()?)
            .body(form)
            .send()
            .await?;

        let body = response.text().await?;

        let token = extract_bearer_token(&body).ok_or_else(|| {
            ThreadsError::MalformedResponse("登录响应中没有找到 bearer token".to_string())
        })?;

        info!("获取 token 成功: {}", credentials.username);
        Ok(token.to_string())
    }
}
