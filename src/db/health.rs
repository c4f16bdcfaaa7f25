// 数据库健康检查结果
// 每次探测生成一次，不做持久化

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 探测语句：常量、服务器当前时间、当前选中的数据库
pub const PROBE_SQL: &str = "SELECT 1 AS test, NOW() AS time, DATABASE() AS `database`";

/// 探测查询返回的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRow {
    pub test: i64,
    pub server_time: Option<NaiveDateTime>,
    pub database: Option<String>,
}

/// 健康检查诊断信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthDiagnostic {
    Connected {
        test: i64,
        server_time: Option<NaiveDateTime>,
        database: Option<String>,
    },
    Failed {
        error: String,
        /// 是否附带了 CA 证书
        tls: bool,
    },
}

/// 健康检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResult {
    pub success: bool,
    pub diagnostic: HealthDiagnostic,
    pub response_time_ms: u64,
    pub checked_at: DateTime<Utc>,
}

impl HealthResult {
    pub fn connected(row: ProbeRow, elapsed: Duration) -> Self {
        Self {
            success: true,
            diagnostic: HealthDiagnostic::Connected {
                test: row.test,
                server_time: row.server_time,
                database: row.database,
            },
            response_time_ms: elapsed.as_millis() as u64,
            checked_at: Utc::now(),
        }
    }

    pub fn failed(error: impl Into<String>, tls: bool, elapsed: Duration) -> Self {
        Self {
            success: false,
            diagnostic: HealthDiagnostic::Failed {
                error: error.into(),
                tls,
            },
            response_time_ms: elapsed.as_millis() as u64,
            checked_at: Utc::now(),
        }
    }

    /// 成功时返回当前数据库名
    pub fn database(&self) -> Option<&str> {
        match &self.diagnostic {
            HealthDiagnostic::Connected { database, .. } => database.as_deref(),
            HealthDiagnostic::Failed { .. } => None,
        }
    }

    /// 失败时返回错误描述
    pub fn error(&self) -> Option<&str> {
        match &self.diagnostic {
            HealthDiagnostic::Failed { error, .. } => Some(error),
            HealthDiagnostic::Connected { .. } => None,
        }
    }

    /// 健康接口使用的连接状态文本
    pub fn connection_label(&self) -> &'static str {
        if self.success { "Connected" } else { "Disconnected" }
    }
}
