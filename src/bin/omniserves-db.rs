// OMNISERVES 数据库运维 CLI

use omniserves::db::cli::{parse_args, print_help, CliExecutor};
use omniserves::db::{self, AppEnvironment};
use omniserves::logging::LoggingSetup;
use std::env;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // 初始化日志
    if let Err(e) = LoggingSetup::init(&LoggingSetup::cli_config()) {
        eprintln!("初始化日志失败: {}", e);
    }

    let args: Vec<String> = env::args().collect();

    // 检查是否请求帮助
    if args.len() < 2
        || args.iter().skip(1).any(|a| a == "--help" || a == "-h" || a == "help")
    {
        print_help();
        return;
    }

    // 解析命令
    let args = match parse_args(args) {
        Ok(args) => args,
        Err(e) => {
            error!("解析命令失败: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    // --env 优先于 APP_ENV
    let environment = match args.environment {
        Some(environment) => environment,
        None => match AppEnvironment::select(env::var("APP_ENV").ok().as_deref()) {
            Ok(selection) => selection.environment,
            Err(e) => {
                error!("选择运行环境失败: {}", e);
                std::process::exit(1);
            }
        },
    };

    let resolved = match db::resolve(environment) {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("解析数据库连接参数失败: {}", e);
            std::process::exit(1);
        }
    };

    let executor = CliExecutor::new(resolved);
    if let Err(e) = executor.execute(args.command).await {
        error!("执行命令失败: {}", e);
        std::process::exit(1);
    }

    info!("命令执行完成");
}
