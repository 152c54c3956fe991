use serde::{Deserialize, Serialize};

/// 登录请求中的 `params` 字段
#[derive(Debug, Serialize, Clone)]
pub struct LoginParams {
    pub client_input_params: ClientInputParams,
    pub server_params: ServerParams,
}

#[derive(Debug, Serialize, Clone)]
pub struct ClientInputParams {
    pub password: String,
    pub contact_point: String,
    pub device_id: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ServerParams {
    pub credential_type: String,
    pub device_id: String,
}

/// 登录请求中的 `bk_client_context` 字段
#[derive(Debug, Serialize, Clone)]
pub struct BloksClientContext {
    pub bloks_version: String,
    pub styles_id: String,
}

/// 发帖请求体，序列化后放进 `signed_body`
#[derive(Debug, Serialize, Clone)]
pub struct ThreadPayload {
    pub text_post_app_info: TextPostAppInfo,
    pub timezone_offset: String,
    pub source_type: String,
    pub caption: String,
    #[serde(rename = "_uid")]
    pub uid: u64,
    pub device_id: String,
    pub upload_id: u64,
    pub device: DevicePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_capture_type: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct TextPostAppInfo {
    pub reply_control: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_attachment_url: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct DevicePayload {
    pub manufacturer: String,
    pub model: String,
    pub android_version: u32,
    pub android_release: String,
}

/// `X-Instagram-Rupload-Params` 请求头的内容
///
/// 嵌套的描述字段在服务端约定里是“JSON 里的 JSON 字符串”。
#[derive(Debug, Serialize, Clone)]
pub struct RuploadParams {
    pub media_type: u8,
    pub upload_id: String,
    pub sticker_burnin_params: String,
    pub image_compression: String,
    pub xsharing_user_ids: String,
    pub retry_context: String,
    #[serde(rename = "IG-FB-Xpost-entry-point-v2")]
    pub xpost_entry_point: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ImageCompression {
    pub lib_name: String,
    pub lib_version: String,
    pub quality: String,
}

impl Default for ImageCompression {
    fn default() -> Self {
        Self {
            lib_name: "moz".to_string(),
            lib_version: "3.1.m".to_string(),
            quality: "80".to_string(),
        }
    }
}

/// 固定的重试上下文，计数永远为 0，只是元数据
#[derive(Debug, Serialize, Clone)]
pub struct RetryContext {
    pub num_step_auto_retry: String,
    pub num_reupload: String,
    pub num_step_manual_retry: String,
}

impl Default for RetryContext {
    fn default() -> Self {
        Self {
            num_step_auto_retry: "0".to_string(),
            num_reupload: "0".to_string(),
            num_step_manual_retry: "0".to_string(),
        }
    }
}

/// 服务端有时把数字 ID 编码成字符串，有时编码成数字
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum NumericId {
    Number(u64),
    Text(String),
}

impl NumericId {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            NumericId::Number(n) => Some(*n),
            NumericId::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernameInfoResponse {
    pub user: UsernameInfoUser,
}

#[derive(Debug, Deserialize)]
pub struct UsernameInfoUser {
    pub pk: NumericId,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub upload_id: NumericId,
}
