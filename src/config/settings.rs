// 应用程序设置和配置
// 定义配置结构体和加载逻辑

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::OmniservesError;

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 运行环境名称（APP_ENV），未设置时由 AppEnvironment::select 决定默认值
    #[serde(default)]
    pub env: Option<String>,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl AppConfig {
    /// 从进程环境变量和配置文件加载配置
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// 从给定的变量快照加载配置（不读取进程环境）
    pub fn load_from(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load_with(Some(vars))
    }

    fn load_with(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut config = Config::builder();

        // 1. 加载默认配置
        config = config.add_source(Config::try_from(&AppConfig::default())?);

        // 2. 尝试加载配置文件
        if Path::new("config.toml").exists() {
            config = config.add_source(File::with_name("config"));
        }

        // 3. 加载环境变量（优先级最高）
        config = config.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .source(vars),
        );

        config.build()?.try_deserialize()
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), OmniservesError> {
        use crate::config::ConfigValidator;

        match ConfigValidator::validate_all(self) {
            Ok(()) => Ok(()),
            Err(errors) => {
                let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                Err(OmniservesError::configuration(format!(
                    "配置验证失败: {}",
                    error_messages.join("; ")
                )))
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: None,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
        }
    }
}
