// API 模块
// 健康检查与服务信息端点

pub mod handlers;
pub mod models;
pub mod routes;


pub use handlers::*;
pub use models::*;
pub use routes::*;
