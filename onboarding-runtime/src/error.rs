//! # Error 模块
//!
//! 定义 onboarding-runtime 中使用的错误类型。

use thiserror::Error;

/// 内容错误（远端数据 → 描述符转换阶段）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    /// 接口返回 `success == false`
    #[error("接口返回失败状态")]
    ApiFailure,

    /// JSON 解码失败
    #[error("数据解码失败: {message}")]
    Decode { message: String },

    /// 无效的颜色字符串
    #[error("字段 '{field}' 的颜色值无效: '{value}'")]
    InvalidColor { field: String, value: String },
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode {
            message: e.to_string(),
        }
    }
}

/// 会话错误
///
/// 动画和延迟在运行中唯一可能产生的错误就是会话被宿主取消。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// 宿主已销毁会话，所有未完成的帧均被丢弃
    #[error("会话已取消")]
    Cancelled,
}

/// Result 类型别名
pub type SessionResult<T> = Result<T, SessionError>;
