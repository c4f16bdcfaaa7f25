// 健康检查处理器

use actix_web::{web, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::error;

use crate::api::models::{HealthResponse, ServiceInfo, DATABASE_TYPE, SERVICE_NAME};
use crate::db::DatabaseManager;
use crate::errors::{ErrorResponse, GENERIC_HEALTH_ERROR};

/// 服务健康检查
///
/// 数据库不可达时仍返回 200，`database` 字段为 "Disconnected"。
/// 只有连接池句柄本身无法创建时才返回 500。
pub async fn health_check(manager: web::Data<DatabaseManager>) -> ActixResult<HttpResponse> {
    let environment = manager.descriptor().environment;

    if let Err(e) = manager.get_handle().await {
        error!(error = %e, "健康检查失败：无法获取数据库连接池");
        let response = ErrorResponse::from_error(&e, GENERIC_HEALTH_ERROR)
            .with_detail(&e, environment.exposes_error_details());
        return Ok(response.into_http_response(500));
    }

    let result = manager.check_health().await;

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        database: result.connection_label().to_string(),
        database_type: DATABASE_TYPE.to_string(),
        environment: environment.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// 根路径处理器
pub async fn index(manager: web::Data<DatabaseManager>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: manager.descriptor().environment.to_string(),
        health: "/api/health".to_string(),
        timestamp: Utc::now(),
    }))
}
