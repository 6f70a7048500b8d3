//! Poncho 统一配置层
//!
//! 所有环境变量读取集中在此模块，流水线各阶段通过显式传入的配置结构体访问，
//! 避免在业务代码中直接 `std::env::var`。
//!
//! - `loader`：env_or、env_optional、env_bool、load_dotenv
//! - `schema`：ObservabilityConfig、ToolsConfig
//! - `env_keys`：key 常量与别名

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_dotenv};
pub use schema::{ObservabilityConfig, ToolsConfig};
