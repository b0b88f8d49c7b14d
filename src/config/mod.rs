// ==========================================
// BoM 转 EPD - 配置层
// ==========================================
// 职责: 运行配置定义、加载、校验
// 存储: JSON 配置文件 + 环境变量（密钥）
// ==========================================

pub mod epd_config;
pub mod error;
pub mod loader;

pub use epd_config::{
    env_keys, ApiConfig, AuthSlot, ColumnRef, EpdConfig, EpdSettings, RepositoryConfig,
    SourceConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{default_config_path, ConfigLoader};
