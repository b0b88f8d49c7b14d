// ==========================================
// BoM 转 EPD - 运行配置
// ==========================================
// 职责: 一次运行所需的全部参数（显式传递，不使用全局状态）
// 存储: JSON 配置文件 + 环境变量密钥
// 红线: 凭据与 API Key 不写入默认值，只从环境变量 / 配置文件注入
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::{Credential, EpdUnit, MethodLib};
use crate::engine::missing_policy::MissingPolicyKind;
use crate::engine::resolver::DuplicateKeyPolicy;
use crate::importer::data_cleaner::{column_index_to_letter, parse_column_ref};
use crate::importer::row_extractor::{DEFAULT_AMOUNT_COLUMN, DEFAULT_MATERIAL_COLUMN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ===== 默认值 =====
pub const DEFAULT_MAPPING_FILE: &str = "Mapping_Materials_to_Processes.xlsx";
pub const DEFAULT_OUTPUT_DIR: &str = "results";
pub const DEFAULT_START_ROW: usize = 0;
pub const DEFAULT_AUTH_URL_PROD: &str = "https://lca.ditwin.cloud";
pub const DEFAULT_AUTH_URL_DEV: &str = "https://lca.dev.ditwin.cloud";
pub const DEFAULT_METHOD_LIB_URL: &str = "https://lca.ditwin.cloud";
pub const DEFAULT_METHOD_LIB_NAME: &str = "en15804_pef31_indata_lcia_method";
pub const DEFAULT_ROOT_REPOSITORY: &str =
    "https://lca.dev.ditwin.cloud/Playground/Ecoinvent_3_10_EN15804_results2";
pub const DEFAULT_TARGET_REPOSITORY: &str = "https://lca.dev.ditwin.cloud/Computed/HVDC_Repo";
pub const DEFAULT_API_URL: &str = "https://olca-epd.dev.ditwin.cloud/run-epd-tree";

// ==========================================
// ColumnRef - 列引用（序号或列字母）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Label(String),
}

impl ColumnRef {
    /// 解析为从 0 开始的列序号
    pub fn resolve(&self) -> ConfigResult<usize> {
        match self {
            ColumnRef::Index(index) => Ok(*index),
            ColumnRef::Label(label) => {
                parse_column_ref(label).ok_or_else(|| ConfigError::InvalidColumn(label.clone()))
            }
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Index(index) => write!(f, "{}", column_index_to_letter(*index)),
            ColumnRef::Label(label) => write!(f, "{label}"),
        }
    }
}

impl FromStr for ColumnRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_column_ref(s)
            .map(ColumnRef::Index)
            .ok_or_else(|| ConfigError::InvalidColumn(s.to_string()))
    }
}

// ==========================================
// 配置分节
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// BoM 表格路径
    pub bom_path: PathBuf,
    /// 工作表名（None = 第一个工作表）
    pub sheet_name: Option<String>,
    /// 跳过的前导行数
    pub start_row: usize,
    pub material_column: ColumnRef,
    pub amount_column: ColumnRef,
    /// 映射表路径
    pub mapping_path: PathBuf,
    /// CSV 分隔符（仅 .csv 输入）
    pub csv_delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            bom_path: PathBuf::new(),
            sheet_name: None,
            start_row: DEFAULT_START_ROW,
            material_column: ColumnRef::Index(DEFAULT_MATERIAL_COLUMN),
            amount_column: ColumnRef::Index(DEFAULT_AMOUNT_COLUMN),
            mapping_path: PathBuf::from(DEFAULT_MAPPING_FILE),
            csv_delimiter: ',',
        }
    }
}

impl SourceConfig {
    pub fn material_column_index(&self) -> ConfigResult<usize> {
        self.material_column.resolve()
    }

    pub fn amount_column_index(&self) -> ConfigResult<usize> {
        self.amount_column.resolve()
    }

    pub fn csv_delimiter_byte(&self) -> ConfigResult<u8> {
        if self.csv_delimiter.is_ascii() {
            Ok(self.csv_delimiter as u8)
        } else {
            Err(ConfigError::InvalidValue {
                field: "source.csv_delimiter".to_string(),
                value: self.csv_delimiter.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpdSettings {
    /// EPD 显示名称（根组件名 + 输出文件名）
    pub name: String,
    pub unit: EpdUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// 参考过程所在仓库
    pub root: String,
    /// 结果写入仓库
    pub target: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT_REPOSITORY.to_string(),
            target: DEFAULT_TARGET_REPOSITORY.to_string(),
        }
    }
}

/// 凭据槽位（顺序有意义: 0 = 生产环境, 1 = 开发环境）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSlot {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AuthSlot {
    pub fn for_url(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// false = 只生成 JSON 文件，不提交
    pub submit: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            api_key: None,
            submit: true,
        }
    }
}

// ==========================================
// EpdConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpdConfig {
    pub source: SourceConfig,
    pub epd: EpdSettings,
    pub repositories: RepositoryConfig,
    pub auth: Vec<AuthSlot>,
    pub method_lib: MethodLib,
    pub api: ApiConfig,
    pub output_dir: PathBuf,
    /// 缺失物料自动跳过
    pub skip_missing_materials: bool,
    /// 显式缺失物料策略（优先于 skip_missing_materials）
    pub missing_policy: Option<MissingPolicyKind>,
    pub duplicate_mapping: DuplicateKeyPolicy,
}

impl Default for EpdConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            epd: EpdSettings::default(),
            repositories: RepositoryConfig::default(),
            auth: vec![
                AuthSlot::for_url(DEFAULT_AUTH_URL_PROD),
                AuthSlot::for_url(DEFAULT_AUTH_URL_DEV),
            ],
            method_lib: MethodLib {
                url: DEFAULT_METHOD_LIB_URL.to_string(),
                name: DEFAULT_METHOD_LIB_NAME.to_string(),
            },
            api: ApiConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            skip_missing_materials: false,
            missing_policy: None,
            duplicate_mapping: DuplicateKeyPolicy::default(),
        }
    }
}

impl EpdConfig {
    /// 校验读取 / 预览所需字段
    pub fn validate_source(&self) -> ConfigResult<()> {
        if self.source.bom_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("source.bom_path".to_string()));
        }
        if self.source.mapping_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("source.mapping_path".to_string()));
        }
        self.source.material_column_index()?;
        self.source.amount_column_index()?;
        self.source.csv_delimiter_byte()?;
        Ok(())
    }

    /// 校验完整运行所需字段（不含密钥）
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_source()?;
        if self.epd.name.trim().is_empty() {
            return Err(ConfigError::MissingField("epd.name".to_string()));
        }
        if self.repositories.root.trim().is_empty() {
            return Err(ConfigError::MissingField("repositories.root".to_string()));
        }
        if self.repositories.target.trim().is_empty() {
            return Err(ConfigError::MissingField("repositories.target".to_string()));
        }
        if self.api.submit && self.api.url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.url".to_string()));
        }
        Ok(())
    }

    /// 生成载荷凭据列表（保持槽位顺序）
    pub fn resolve_credentials(&self) -> ConfigResult<Vec<Credential>> {
        self.auth
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                let user = slot
                    .user
                    .clone()
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| ConfigError::MissingSecret(env_keys::auth_user(idx)))?;
                let password = slot
                    .password
                    .clone()
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| ConfigError::MissingSecret(env_keys::auth_password(idx)))?;
                Ok(Credential {
                    url: slot.url.clone(),
                    user,
                    password,
                })
            })
            .collect()
    }

    pub fn api_key(&self) -> ConfigResult<&str> {
        self.api
            .api_key
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingSecret(env_keys::API_KEY.to_string()))
    }

    /// 实际生效的缺失物料策略
    pub fn effective_missing_policy(&self, interactive: bool) -> MissingPolicyKind {
        self.missing_policy.unwrap_or_else(|| {
            MissingPolicyKind::resolve_default(self.skip_missing_materials, interactive)
        })
    }
}

// ==========================================
// 环境变量键
// ==========================================
pub mod env_keys {
    /// 配置文件路径
    pub const CONFIG_PATH: &str = "BOM_TO_EPD_CONFIG";
    /// 评分服务 API Key
    pub const API_KEY: &str = "BOM_TO_EPD_API_KEY";
    /// 评分服务地址
    pub const API_URL: &str = "BOM_TO_EPD_API_URL";

    /// 第 idx 个凭据槽位的用户名（从 0 开始）
    pub fn auth_user(idx: usize) -> String {
        format!("BOM_TO_EPD_AUTH_{idx}_USER")
    }

    /// 第 idx 个凭据槽位的密码（从 0 开始）
    pub fn auth_password(idx: usize) -> String {
        format!("BOM_TO_EPD_AUTH_{idx}_PASSWORD")
    }
}
