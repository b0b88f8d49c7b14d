// ==========================================
// BoM 转 EPD - 配置加载
// ==========================================
// 职责: 配置文件定位 / 读取 / 环境变量覆写
// 优先级: 环境变量 > 配置文件 > 内置默认值
// ==========================================

use crate::config::epd_config::{env_keys, EpdConfig};
use crate::config::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "bom-to-epd";
const CONFIG_FILE: &str = "config.json";

/// 默认配置文件路径
///
/// # 规则
/// - 环境变量 BOM_TO_EPD_CONFIG 非空 → 使用该路径
/// - 否则 <用户配置目录>/bom-to-epd/config.json
/// - 无法获取用户配置目录 → ./bom-to-epd.json
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(env_keys::CONFIG_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR).join(CONFIG_FILE),
        None => PathBuf::from("./bom-to-epd.json"),
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// 读取指定配置文件（必须存在）
    pub fn load_from_file(path: &Path) -> ConfigResult<EpdConfig> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: EpdConfig = serde_json::from_str(&content)?;
        info!(path = %path.display(), "配置文件已加载");
        Ok(config)
    }

    /// 加载配置并应用环境变量覆写
    ///
    /// # 参数
    /// - path: 显式路径（必须存在）；None → 默认路径（不存在时使用内置默认值）
    pub fn load(path: Option<&Path>) -> ConfigResult<EpdConfig> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    debug!(path = %default_path.display(), "未找到配置文件，使用内置默认值");
                    EpdConfig::default()
                }
            }
        };

        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// 应用密钥 / 地址覆写
    ///
    /// # 参数
    /// - lookup: 按键名取值（生产环境为进程环境变量）
    pub fn apply_overrides<F>(config: &mut EpdConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(env_keys::API_KEY) {
            config.api.api_key = Some(key);
        }
        if let Some(url) = non_empty(env_keys::API_URL) {
            config.api.url = url;
        }

        for (idx, slot) in config.auth.iter_mut().enumerate() {
            if let Some(user) = non_empty(&env_keys::auth_user(idx)) {
                slot.user = Some(user);
            }
            if let Some(password) = non_empty(&env_keys::auth_password(idx)) {
                slot.password = Some(password);
            }
        }
    }

    /// 写出配置文件（不含未设置的密钥）
    pub fn save(config: &EpdConfig, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        info!(path = %path.display(), "配置文件已保存");
        Ok(())
    }
}
