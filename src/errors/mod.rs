// 错误处理模块
// 定义统一的错误类型和错误响应格式

pub mod types;
pub mod response;

#[cfg(test)]
mod tests;

pub use types::*;
pub use response::*;
