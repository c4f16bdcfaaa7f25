// 统一错误类型定义

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 数据库连接层统一错误类型
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "error_type", content = "details")]
pub enum OmniservesError {
    /// 配置错误（解析阶段，启动时致命）
    #[error("配置错误: {message}")]
    Configuration { message: String },

    /// TLS 证书材料错误（base64 / PEM 无效）
    #[error("TLS 证书错误: {message}")]
    TlsMaterial { message: String },

    /// 连通性错误（DNS、TCP、TLS 握手、认证、超时）
    #[error("数据库连接错误: {message}")]
    Connectivity { message: String },

    /// 超时错误
    #[error("操作超时: {operation}")]
    Timeout { operation: String },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal { message: String },
}

impl OmniservesError {
    /// 获取错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::TlsMaterial { .. } => "TLS_MATERIAL_ERROR",
            Self::Connectivity { .. } => "CONNECTIVITY_ERROR",
            Self::Timeout { .. } => "TIMEOUT_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn tls_material(message: impl Into<String>) -> Self {
        Self::TlsMaterial {
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// 从 sea_orm::DbErr 转换
impl From<sea_orm::DbErr> for OmniservesError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::ConnectionAcquire(e) => {
                Self::connectivity(format!("无法获取数据库连接: {}", e))
            }
            sea_orm::DbErr::Conn(e) => Self::connectivity(format!("数据库连接失败: {}", e)),
            sea_orm::DbErr::Query(e) => Self::connectivity(format!("数据库查询失败: {}", e)),
            sea_orm::DbErr::Type(msg) => Self::connectivity(format!("结果类型不匹配: {}", msg)),
            other => Self::connectivity(other.to_string()),
        }
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for OmniservesError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(format!("配置加载错误: {}", err))
    }
}

/// 从 base64::DecodeError 转换
impl From<base64::DecodeError> for OmniservesError {
    fn from(err: base64::DecodeError) -> Self {
        Self::tls_material(format!("base64 解码失败: {}", err))
    }
}

/// 从 std::io::Error 转换
impl From<std::io::Error> for OmniservesError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => Self::timeout("IO 操作"),
            _ => Self::internal(format!("IO 错误: {}", err)),
        }
    }
}
