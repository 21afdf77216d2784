//! 共享库
//!
//! 包含配置加载与日志初始化等各组件共用的基础设施代码。

pub mod config;
pub mod observability;
