use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use omniserves::api::routes::ApiRouteConfig;
use omniserves::config::ConfigLoader;
use omniserves::db::{self, AppEnvironment, DatabaseManager};
use omniserves::logging::LoggingSetup;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 初始化配置
    let config = ConfigLoader::init().context("加载应用配置失败")?;

    // 初始化结构化日志系统
    LoggingSetup::init(&config.logging)?;

    tracing::info!("🚀 启动 OMNISERVES EXPERT API v{}", env!("CARGO_PKG_VERSION"));
    ConfigLoader::log_summary(&config);

    // 解析数据库连接参数，配置错误直接终止启动
    let selection = AppEnvironment::select(config.env.as_deref())?;
    let resolved = db::resolve(selection.environment).context("解析数据库连接参数失败")?;
    let manager = Arc::new(DatabaseManager::new(resolved.descriptor));

    // 启动时探测一次，失败不阻止服务启动
    let startup = manager.check_health().await;
    if startup.success {
        tracing::info!(
            database = startup.database().unwrap_or("<none>"),
            "✅ 数据库连接正常"
        );
    } else {
        tracing::warn!(
            error = startup.error().unwrap_or("unknown"),
            "⚠️ 数据库暂不可用，服务继续启动"
        );
    }

    tracing::info!("🌐 服务器启动地址: http://{}:{}", config.server.host, config.server.port);
    tracing::info!("📋 健康检查: http://{}:{}/api/health", config.server.host, config.server.port);

    let data = web::Data::from(manager.clone());
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(data.clone())
            .configure(ApiRouteConfig::configure)
    });

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind((config.server.host.clone(), config.server.port))
        .with_context(|| format!("无法绑定 {}:{}", config.server.host, config.server.port))?
        .run()
        .await?;

    // 服务器停止后释放连接池
    match Arc::try_unwrap(manager) {
        Ok(manager) => {
            if let Err(e) = manager.close().await {
                tracing::warn!(error = %e, "关闭数据库连接失败");
            }
        }
        Err(_) => tracing::debug!("连接池仍被引用，跳过显式关闭"),
    }

    tracing::info!("服务器已停止");
    Ok(())
}
