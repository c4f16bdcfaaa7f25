// 日志系统设置

use crate::config::LoggingConfig;
use anyhow::Result;

use tracing_subscriber::EnvFilter;

/// 日志系统初始化器
pub struct LoggingSetup;

impl LoggingSetup {
    /// 初始化日志系统
    ///
    /// `RUST_LOG` 优先于配置中的级别。
    pub fn init(config: &LoggingConfig) -> Result<()> {
        let env_filter = Self::build_filter(&config.level);

        match config.format.as_str() {
            "json" => {
                let subscriber = tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(env_filter)
                    .with_target(true)
                    .with_current_span(true)
                    .finish();
                tracing::subscriber::set_global_default(subscriber)?;
            }
            "pretty" => {
                let subscriber = tracing_subscriber::fmt()
                    .pretty()
                    .with_env_filter(env_filter)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .finish();
                tracing::subscriber::set_global_default(subscriber)?;
            }
            _ => {
                let subscriber = tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_target(true)
                    .finish();
                tracing::subscriber::set_global_default(subscriber)?;
            }
        }

        tracing::info!(level = %config.level, format = %config.format, "日志系统初始化完成");

        Ok(())
    }

    /// 构建过滤器：RUST_LOG > 配置级别 > info
    pub fn build_filter(level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// 命令行工具的日志配置：只输出警告及以上
    pub fn cli_config() -> LoggingConfig {
        LoggingConfig {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}
