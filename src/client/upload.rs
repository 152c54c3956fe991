use chrono::Utc;
use futures::StreamExt;
use log::{debug, info};
use rand::Rng;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_TYPE, HeaderName};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::api::{ImageCompression, RetryContext, RuploadParams, UploadResponse};
use crate::client::ThreadsClient;
use crate::client::http::header_value;
use crate::error::{Result, ThreadsError};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

static LAST_UPLOAD_ID: AtomicU64 = AtomicU64::new(0);

/// 基于当前秒级时间戳生成 upload id，进程内不会回退
pub(crate) fn next_upload_id() -> u64 {
    let now = Utc::now().timestamp().max(0) as u64;
    let previous = LAST_UPLOAD_ID.fetch_max(now, Ordering::SeqCst);
    previous.max(now)
}

/// 图片来源：以 `http` 开头的视为远程地址，其余都视为本地路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    LocalPath(PathBuf),
}

impl ImageSource {
    pub fn classify(source: &str) -> Result<Self> {
        if source.is_empty() {
            return Err(ThreadsError::InvalidArgument("图片地址不能为空".to_string()));
        }
        if source.starts_with("http") {
            Ok(ImageSource::Remote(source.to_string()))
        } else {
            Ok(ImageSource::LocalPath(PathBuf::from(source)))
        }
    }
}

/// 单次上传用到的全部信息
#[derive(Debug, Clone)]
pub struct UploadDescriptor {
    pub upload_id: u64,
    pub upload_name: String,
    pub waterfall_id: String,
    pub mime_type: String,
    pub payload: Vec<u8>,
}

impl UploadDescriptor {
    pub fn new(upload_id: u64, mime_type: String, payload: Vec<u8>) -> Self {
        let suffix: u64 = rand::thread_rng().gen_range(1_000_000_000..=9_999_999_999);
        Self {
            upload_id,
            upload_name: upload_name(upload_id, suffix),
            waterfall_id: Uuid::new_v4().to_string(),
            mime_type,
            payload,
        }
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// `X-Instagram-Rupload-Params` 请求头内容
    pub fn rupload_params(&self) -> Result<String> {
        let params = RuploadParams {
            media_type: 1,
            upload_id: self.upload_id.to_string(),
            sticker_burnin_params: "[]".to_string(),
            image_compression: serde_json::to_string(&ImageCompression::default())?,
            xsharing_user_ids: "[]".to_string(),
            retry_context: serde_json::to_string(&RetryContext::default())?,
            xpost_entry_point: "feed".to_string(),
        };
        Ok(serde_json::to_string(&params)?)
    }
}

pub(crate) fn upload_name(upload_id: u64, suffix: u64) -> String {
    format!("{}_0_{}", upload_id, suffix)
}

fn guess_mime_type(path: &std::path::Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

impl ThreadsClient {
    /// 读取图片数据，返回 (数据, MIME 类型)
    pub(crate) async fn load_image(&self, source: &ImageSource) -> Result<(Vec<u8>, String)> {
        let (payload, mime_type) = match source {
            ImageSource::Remote(url) => {
                debug!("下载远程图片: {}", url);
                let response = self
                    .http
                    .get(url)
                    .timeout(self.config.image_fetch_timeout)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ThreadsError::InvalidImageSource {
                        source_path: url.clone(),
                        reason: format!("下载图片失败, 状态码: {}", status),
                    });
                }

                let mut stream = response.bytes_stream();
                let mut data = Vec::new();
                while let Some(chunk) = stream.next().await {
                    data.extend_from_slice(&chunk?);
                }
                (data, DEFAULT_MIME_TYPE.to_string())
            }
            ImageSource::LocalPath(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    ThreadsError::InvalidImageSource {
                        source_path: path.display().to_string(),
                        reason: e.to_string(),
                    }
                })?;
                (data, guess_mime_type(path))
            }
        };

        if payload.is_empty() {
            let source_path = match source {
                ImageSource::Remote(url) => url.clone(),
                ImageSource::LocalPath(path) => path.display().to_string(),
            };
            return Err(ThreadsError::InvalidImageSource {
                source_path,
                reason: "没有读到任何数据".to_string(),
            });
        }

        Ok((payload, mime_type))
    }

    /// 上传图片（远程 URL 或本地路径），返回可用于发帖的 upload id
    pub async fn upload_image(&self, source: &str) -> Result<u64> {
        let session_headers = self.auth_headers()?;
        let source = ImageSource::classify(source)?;
        let (payload, mime_type) = self.load_image(&source).await?;

        let descriptor = UploadDescriptor::new(next_upload_id(), mime_type, payload);
        self.send_upload(descriptor, session_headers).await
    }

    async fn send_upload(
        &self,
        descriptor: UploadDescriptor,
        mut headers: reqwest::header::HeaderMap,
    ) -> Result<u64> {
        let url = format!(
            "{}/rupload_igphoto/{}",
            self.config.upload_base_url, descriptor.upload_name
        );
        let length = descriptor.payload_len().to_string();

        headers.insert(ACCEPT_ENCODING, header_value("gzip")?);
        headers.insert(
            HeaderName::from_static("x-instagram-rupload-params"),
            header_value(&descriptor.rupload_params()?)?,
        );
        headers.insert(
            HeaderName::from_static("x_fb_photo_waterfall_id"),
            header_value(&descriptor.waterfall_id)?,
        );
        headers.insert(
            HeaderName::from_static("x-entity-type"),
            header_value(&descriptor.mime_type)?,
        );
        headers.insert(HeaderName::from_static("offset"), header_value("0")?);
        headers.insert(
            HeaderName::from_static("x-entity-name"),
            header_value(&descriptor.upload_name)?,
        );
        headers.insert(HeaderName::from_static("x-entity-length"), header_value(&length)?);
        headers.insert(CONTENT_TYPE, header_value("application/octet-stream")?);

        debug!("上传图片: {} ({} 字节)", url, length);

        let response = self
            .http
            .post(&url)
            .headers(headers)
            .body(descriptor.payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ThreadsError::UploadFailed { status });
        }

        let body = response.text().await?;
        debug!("上传响应: {}", body);

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ThreadsError::MalformedResponse(format!("{}, body: {}", e, body)))?;
        let upload_id = parsed.upload_id.as_u64().ok_or_else(|| {
            ThreadsError::MalformedResponse(format!("upload_id 不是数字: {:?}", parsed.upload_id))
        })?;

        info!("图片上传成功, upload_id={}", upload_id);
        Ok(upload_id)
    }
}
