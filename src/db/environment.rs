// 运行环境
// 封闭的环境集合，每个环境携带自己的默认连接参数

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::errors::OmniservesError;

/// 开发环境默认端口（本地 MySQL）
pub const DEVELOPMENT_DEFAULT_PORT: u16 = 3306;

/// 生产环境默认端口（TiDB Cloud Serverless）
pub const PRODUCTION_DEFAULT_PORT: u16 = 4000;

/// 运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
}

/// 环境选择结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentSelection {
    pub environment: AppEnvironment,
    /// 环境名称未设置，使用了默认值
    pub defaulted: bool,
}

/// 连接池边界
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolBounds {
    pub min: u32,
    pub max: u32,
}

impl PoolBounds {
    /// 满足 0 <= min <= max 且 max >= 1
    pub fn is_valid(&self) -> bool {
        self.max >= 1 && self.min <= self.max
    }
}

impl AppEnvironment {
    pub const ALL: [AppEnvironment; 2] = [AppEnvironment::Development, AppEnvironment::Production];

    /// 未设置 APP_ENV 时使用的环境
    pub const DEFAULT: AppEnvironment = AppEnvironment::Production;

    /// 根据 APP_ENV 的值选择环境
    ///
    /// 未设置或为空时回退到生产环境，并记录警告。
    pub fn select(raw: Option<&str>) -> Result<EnvironmentSelection, OmniservesError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Ok(EnvironmentSelection {
                environment: value.parse()?,
                defaulted: false,
            }),
            None => {
                warn!(
                    environment = %Self::DEFAULT,
                    "APP_ENV 未设置，使用默认环境"
                );
                Ok(EnvironmentSelection {
                    environment: Self::DEFAULT,
                    defaulted: true,
                })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// 默认数据库端口
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Development => DEVELOPMENT_DEFAULT_PORT,
            Self::Production => PRODUCTION_DEFAULT_PORT,
        }
    }

    /// 连接池边界：开发环境保持热连接，生产环境不保留空闲连接
    pub fn pool_bounds(&self) -> PoolBounds {
        match self {
            Self::Development => PoolBounds { min: 2, max: 10 },
            Self::Production => PoolBounds { min: 0, max: 5 },
        }
    }

    /// 获取连接的默认超时
    pub fn default_connect_timeout(&self) -> Duration {
        Duration::from_secs(10)
    }

    /// 单次健康探测的默认超时
    pub fn default_probe_timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    /// 错误响应是否包含详细信息
    pub fn exposes_error_details(&self) -> bool {
        !self.is_production()
    }
}

impl FromStr for AppEnvironment {
    type Err = OmniservesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(OmniservesError::configuration(format!(
                "不支持的运行环境: {}，有效值: development, production",
                other
            ))),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
