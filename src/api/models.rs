// API 数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 服务名称
pub const SERVICE_NAME: &str = "OMNISERVES EXPERT API";

/// 数据库类型
pub const DATABASE_TYPE: &str = "TiDB Cloud";

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 固定为 "OK"
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// "Connected" 或 "Disconnected"
    pub database: String,
    pub database_type: String,
    pub environment: String,
    pub service: String,
    pub version: String,
}

/// 根路径返回的服务信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub health: String,
    pub timestamp: DateTime<Utc>,
}
