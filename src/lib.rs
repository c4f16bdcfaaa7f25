// OMNISERVES 库
// 导出主要模块供二进制和测试使用

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
