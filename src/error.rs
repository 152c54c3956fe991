use thiserror::Error;

/// 库内所有操作的错误类型
#[derive(Error, Debug)]
pub enum ThreadsError {
    /// 调用方参数不合法，例如发帖时既没有链接也没有图片
    #[error("参数错误: {0}")]
    InvalidArgument(String),

    /// 图片来源无法读出数据
    #[error("无法读取图片: {source_path}: {reason}")]
    InvalidImageSource { source_path: String, reason: String },

    #[error("图片上传失败, 状态码: {status}")]
    UploadFailed { status: reqwest::StatusCode },

    #[error("网络请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("响应格式异常: {0}")]
    MalformedResponse(String),

    #[error("当前客户端尚未登录")]
    NotAuthenticated,

    #[error("JSON 处理失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("非法的请求头: {0}")]
    InvalidHeader(String),
}

pub type Result<T> = std::result::Result<T, ThreadsError>;
