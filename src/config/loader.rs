// 配置加载器
// 处理 .env 文件加载和配置解析

use crate::config::AppConfig;
use crate::errors::OmniservesError;
use config::ConfigError;
use dotenvy::dotenv;
use tracing::{debug, info};

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 加载 .env 文件并解析、验证应用配置
    ///
    /// 日志系统此时尚未初始化，.env 缺失只在 debug 级别记录。
    pub fn init() -> Result<AppConfig, OmniservesError> {
        match dotenv() {
            Ok(path) => debug!(path = %path.display(), "已加载 .env 文件"),
            Err(e) => debug!("未加载 .env 文件: {}", e),
        }

        let config = AppConfig::load().map_err(convert_config_error)?;
        config.validate()?;

        Ok(config)
    }

    /// 打印配置摘要
    pub fn log_summary(config: &AppConfig) {
        info!(
            env = config.env.as_deref().unwrap_or("<unset>"),
            host = %config.server.host,
            port = config.server.port,
            workers = ?config.server.workers,
            log_level = %config.logging.level,
            log_format = %config.logging.format,
            "配置加载成功"
        );
    }
}

/// 配置错误转换辅助函数
pub fn convert_config_error(err: ConfigError) -> OmniservesError {
    OmniservesError::configuration(format!("配置错误: {}", err))
}
