// 错误响应格式化

use crate::errors::OmniservesError;
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 对外暴露的通用错误消息
pub const GENERIC_HEALTH_ERROR: &str = "Error while checking service health";

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// 从 OmniservesError 创建错误响应，默认不包含错误详情
    pub fn from_error(error: &OmniservesError, message: impl Into<String>) -> Self {
        Self {
            status: "ERROR".to_string(),
            code: error.error_code().to_string(),
            message: message.into(),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// 附加错误详情（仅限非生产环境）
    pub fn with_detail(mut self, error: &OmniservesError, expose: bool) -> Self {
        if expose {
            self.error = Some(error.to_string());
        }
        self
    }

    /// 转换为 HTTP 响应
    pub fn into_http_response(self, status_code: u16) -> HttpResponse {
        let status = actix_web::http::StatusCode::from_u16(status_code)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        HttpResponse::build(status).json(self)
    }
}
