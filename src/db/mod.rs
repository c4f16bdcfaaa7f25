// 数据库模块
// 连接参数解析、TLS 信任材料、连接池管理与健康探测

pub mod cli;
pub mod descriptor;
pub mod environment;
pub mod health;
pub mod manager;
pub mod tls;


pub use descriptor::*;
pub use environment::*;
pub use health::*;
pub use manager::*;
pub use tls::*;
