//! # Threads Private API - Threads 私有接口客户端
//!
//! 通过模拟安卓客户端访问 Threads 的私有接口：登录、查询用户、关注、发帖、点赞等。
//!
//! ## 功能模块
//!
//! - `api`: 请求体与响应的数据结构定义
//! - `client`: HTTP客户端、登录、图片上传与发帖
//! - `config`: 设备与协议常量
//! - `error`: 错误类型
//!
//! ## 基本用法
//!
//! ```rust,no_run
//! use threads_private_api::{ApiConfig, Credentials, ThreadsClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ThreadsClient::new(ApiConfig::default())?;
//!     let client = client
//!         .login(&Credentials::new("your_username", "your_password"))
//!         .await?;
//!
//!     // 发一条带链接的帖子
//!     let created = client
//!         .create_thread("Hello from Rust", Some("https://www.rust-lang.org"), None, None)
//!         .await?;
//!     println!("{}", created);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 匿名查询用户 ID
//!
//! ```rust,no_run
//! use threads_private_api::{ApiConfig, ThreadsClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ThreadsClient::new(ApiConfig::default())?;
//!     let user_id = client.get_user_id("zuck").await?;
//!     println!("用户ID: {}", user_id);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;

// 重新导出常用的类型和结构体，方便使用
pub use client::{Credentials, Session, ThreadAttachment, ThreadsClient};
pub use config::{ApiConfig, DeviceSpec};
pub use error::{Result, ThreadsError};
