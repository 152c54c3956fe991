use std::time::Duration;

/// 模拟的安卓设备信息，发帖时原样写入请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    pub manufacturer: String,
    pub model: String,
    pub android_version: u32,
    pub android_release: String,
}

impl Default for DeviceSpec {
    fn default() -> Self {
        Self {
            manufacturer: "OnePlus".to_string(),
            model: "ONEPLUS+A3010".to_string(),
            android_version: 25,
            android_release: "7.1.1".to_string(),
        }
    }
}

/// 客户端配置
///
/// 所有协议常量集中在这里，协议版本升级时只需要改这一处。
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_base_url: String,
    pub upload_base_url: String,
    pub user_agent: String,
    pub sec_fetch_site: String,
    pub form_content_type: String,
    pub bloks_version: String,
    pub styles_id: String,
    pub timezone_offset: i64,
    pub device: DeviceSpec,
    /// 远程图片下载超时
    pub image_fetch_timeout: Duration,
    /// 其它请求的超时，为 None 时使用 reqwest 默认行为
    pub request_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://i.instagram.com/api/v1".to_string(),
            upload_base_url: "https://www.instagram.com".to_string(),
            user_agent: "Barcelona 289.0.0.77.109 Android".to_string(),
            sec_fetch_site: "same-origin".to_string(),
            form_content_type: "application/x-www-form-urlencoded; charset=UTF-8".to_string(),
            bloks_version: "5f56efad68e1edec7801f630b5c122704ec5378adbee6609a448f105f34a9c73"
                .to_string(),
            styles_id: "instagram".to_string(),
            timezone_offset: -14400,
            device: DeviceSpec::default(),
            image_fetch_timeout: Duration::from_secs(2),
            request_timeout: None,
        }
    }
}

impl ApiConfig {
    /// 使用自定义的 API 与上传地址，其余保持默认
    pub fn with_base_urls(api_base_url: impl Into<String>, upload_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            upload_base_url: upload_base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}
