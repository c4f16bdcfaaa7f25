// 数据库运维 CLI
// 提供连接参数查看和一次性连通性检查

use crate::db::{AppEnvironment, DatabaseManager, ResolveWarning, Resolved};
use crate::errors::OmniservesError;
use tracing::info;

/// CLI 命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// 执行一次健康探测
    Check,
    /// 打印解析后的连接参数
    Config,
}

/// 解析后的命令行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: CliCommand,
    /// --env 覆盖 APP_ENV
    pub environment: Option<AppEnvironment>,
}

/// CLI 执行器
pub struct CliExecutor {
    manager: DatabaseManager,
    warnings: Vec<ResolveWarning>,
}

impl CliExecutor {
    pub fn new(resolved: Resolved) -> Self {
        Self {
            manager: DatabaseManager::new(resolved.descriptor),
            warnings: resolved.warnings,
        }
    }

    pub fn with_manager(manager: DatabaseManager, warnings: Vec<ResolveWarning>) -> Self {
        Self { manager, warnings }
    }

    /// 执行 CLI 命令
    pub async fn execute(&self, command: CliCommand) -> Result<(), OmniservesError> {
        match command {
            CliCommand::Check => self.execute_check().await,
            CliCommand::Config => {
                self.print_config();
                Ok(())
            }
        }
    }

    async fn execute_check(&self) -> Result<(), OmniservesError> {
        info!("执行数据库连通性检查...");
        let result = self.manager.check_health().await;

        if result.success {
            println!("✅ 数据库连接正常 ({} ms)", result.response_time_ms);
            println!(
                "   数据库: {}",
                result.database().unwrap_or("<未选择>")
            );
            Ok(())
        } else {
            let error = result.error().unwrap_or("未知错误").to_string();
            println!("❌ 数据库连接失败 ({} ms)", result.response_time_ms);
            println!("   错误: {}", error);
            println!(
                "   SSL: {}",
                if self.manager.descriptor().tls.has_trust_bundle() { "OK" } else { "ABSENT" }
            );
            Err(OmniservesError::connectivity(error))
        }
    }

    fn print_config(&self) {
        let descriptor = self.manager.descriptor();
        let status = self.manager.pool_status();

        println!("=== OMNISERVES 数据库连接参数 ===");
        println!("环境: {}", descriptor.environment);
        println!("地址: {}", descriptor.display_url());
        println!("连接池: {}-{}", status.min_connections, status.max_connections);
        println!("TLS 模式: {:?}", status.tls_mode);
        match &descriptor.tls.trust_bundle {
            Some(bundle) => println!(
                "CA 证书: {} ({} 个证书)",
                bundle.source(),
                bundle.certificate_count()
            ),
            None => println!("CA 证书: 未配置"),
        }
        println!("连接超时: {}s", descriptor.connect_timeout.as_secs());
        println!("探测超时: {}s", descriptor.probe_timeout.as_secs());

        for warning in &self.warnings {
            println!("⚠️  {}", warning);
        }
        println!("================================");
    }
}

/// 解析命令行参数
pub fn parse_args(args: Vec<String>) -> Result<CliArgs, OmniservesError> {
    let mut command = None;
    let mut environment = None;
    let mut iter = args.into_iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--env" | "-e" => {
                let value = iter
                    .next()
                    .ok_or_else(|| OmniservesError::configuration("--env 需要一个环境名称"))?;
                environment = Some(value.parse()?);
            }
            "check" if command.is_none() => command = Some(CliCommand::Check),
            "config" if command.is_none() => command = Some(CliCommand::Config),
            other => {
                return Err(OmniservesError::configuration(format!("未知的参数: {}", other)));
            }
        }
    }

    let command = command.ok_or_else(|| OmniservesError::configuration("请提供命令"))?;
    Ok(CliArgs {
        command,
        environment,
    })
}

pub fn print_help() {
    println!("OMNISERVES 数据库工具");
    println!();
    println!("用法:");
    println!("  omniserves-db [--env <development|production>] <命令>");
    println!();
    println!("命令:");
    println!("  check     执行一次数据库健康探测，失败时退出码为 1");
    println!("  config    打印解析后的连接参数（密码已屏蔽）");
    println!();
    println!("环境变量:");
    println!("  APP_ENV, DB_HOST, DB_PORT, DB_USER, DB_PASSWORD, DB_NAME,");
    println!("  DB_SSL_CA, DB_SSL_CA_BASE64, DB_TLS_POLICY,");
    println!("  DB_CONNECT_TIMEOUT_SECS, DB_PROBE_TIMEOUT_SECS");
}
