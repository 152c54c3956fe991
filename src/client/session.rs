use rand::Rng;
use std::fmt;

use crate::error::{Result, ThreadsError};

/// 登录凭据
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// 用户名和密码都不能为空
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(ThreadsError::InvalidArgument("用户名不能为空".to_string()));
        }
        if self.password.is_empty() {
            return Err(ThreadsError::InvalidArgument("密码不能为空".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 登录成功后的会话，token 和 user_id 总是同时存在
#[derive(Clone)]
pub struct Session {
    pub username: String,
    pub device_id: String,
    pub bearer_token: String,
    pub user_id: u64,
    pub timezone_offset: i64,
}

impl Session {
    /// `Authorization` 请求头的值
    pub fn authorization(&self) -> String {
        format!("Bearer IGT:2:{}", self.bearer_token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("device_id", &self.device_id)
            .field("bearer_token", &"***")
            .field("user_id", &self.user_id)
            .field("timezone_offset", &self.timezone_offset)
            .finish()
    }
}

/// 生成形如 `android-1a2b3c4d5e6f7a8b` 的设备 ID
pub fn generate_device_id() -> String {
    let value: u64 = rand::thread_rng().r#gen();
    format!("android-{:016x}", value)
}
