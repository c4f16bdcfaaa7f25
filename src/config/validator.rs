// 配置验证器

use crate::config::{AppConfig, LoggingConfig, ServerConfig};
use crate::errors::OmniservesError;

/// 有效的日志级别
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 有效的日志格式
pub const VALID_LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证完整配置，收集所有错误
    pub fn validate_all(config: &AppConfig) -> Result<(), Vec<OmniservesError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&config.server) {
            errors.push(e);
        }

        if let Err(e) = Self::validate_logging(&config.logging) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 验证服务器配置
    pub fn validate_server(config: &ServerConfig) -> Result<(), OmniservesError> {
        if config.port == 0 {
            return Err(OmniservesError::configuration("服务器端口不能为 0"));
        }

        if config.host.trim().is_empty() {
            return Err(OmniservesError::configuration("服务器主机地址不能为空"));
        }

        if let Some(workers) = config.workers {
            if workers == 0 {
                return Err(OmniservesError::configuration("工作线程数不能为 0"));
            }
        }

        Ok(())
    }

    /// 验证日志配置
    pub fn validate_logging(config: &LoggingConfig) -> Result<(), OmniservesError> {
        if !VALID_LOG_LEVELS.contains(&config.level.as_str()) {
            return Err(OmniservesError::configuration(format!(
                "无效的日志级别: {}，有效值: {:?}",
                config.level, VALID_LOG_LEVELS
            )));
        }

        if !VALID_LOG_FORMATS.contains(&config.format.as_str()) {
            return Err(OmniservesError::configuration(format!(
                "无效的日志格式: {}，有效值: {:?}",
                config.format, VALID_LOG_FORMATS
            )));
        }

        Ok(())
    }
}
