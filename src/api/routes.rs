// API 路由定义

use actix_web::web;

use crate::api::handlers::health;

/// API 路由配置
pub struct ApiRouteConfig;

impl ApiRouteConfig {
    /// 配置所有路由，调用方需通过 `app_data` 注入 `web::Data<DatabaseManager>`
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/", web::get().to(health::index)).service(
            web::scope("/api").route("/health", web::get().to(health::health_check)),
        );
    }
}
