// ==========================================
// 配置加载集成测试
// ==========================================
// 测试目标: 配置文件解析、默认值补全、密钥覆写、校验
// ==========================================

use bom_to_epd::config::{ConfigError, ConfigLoader, EpdConfig};
use bom_to_epd::domain::EpdUnit;
use bom_to_epd::engine::{DuplicateKeyPolicy, MissingPolicyKind};
use std::collections::HashMap;
use tempfile::TempDir;

const SAMPLE_CONFIG: &str = r#"{
  "source": {
    "bom_path": "input/BoM_Transformer.xlsx",
    "sheet_name": "Sheet1",
    "material_column": "C",
    "amount_column": "E",
    "mapping_path": "input/mapping.csv",
    "csv_delimiter": ";"
  },
  "epd": { "name": "Transformer T-400", "unit": "Item(s)" },
  "repositories": { "target": "https://lca.example/Computed/Test" },
  "missing_policy": "abort",
  "duplicate_mapping": "reject"
}"#;

#[test]
fn test_load_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, SAMPLE_CONFIG).unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();

    assert_eq!(config.source.sheet_name.as_deref(), Some("Sheet1"));
    assert_eq!(config.source.material_column_index().unwrap(), 2);
    assert_eq!(config.source.amount_column_index().unwrap(), 4);
    assert_eq!(config.source.csv_delimiter_byte().unwrap(), b';');
    assert_eq!(config.source.start_row, 0);
    assert_eq!(config.epd.unit, EpdUnit::Items);
    assert_eq!(config.missing_policy, Some(MissingPolicyKind::Abort));
    assert_eq!(config.duplicate_mapping, DuplicateKeyPolicy::Reject);

    // 未给出的分节取默认值
    let defaults = EpdConfig::default();
    assert_eq!(config.repositories.root, defaults.repositories.root);
    assert_eq!(config.repositories.target, "https://lca.example/Computed/Test");
    assert_eq!(config.method_lib, defaults.method_lib);
    assert_eq!(config.auth.len(), 2);
    assert!(config.api.submit);
}

#[test]
fn test_secrets_come_from_environment_lookup() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, SAMPLE_CONFIG).unwrap();
    let mut config = ConfigLoader::load_from_file(&path).unwrap();

    // 密钥缺失时明确指出环境变量名
    match config.api_key() {
        Err(ConfigError::MissingSecret(key)) => assert_eq!(key, "BOM_TO_EPD_API_KEY"),
        other => panic!("unexpected: {:?}", other),
    }
    assert!(config.resolve_credentials().is_err());

    let env: HashMap<String, String> = [
        ("BOM_TO_EPD_API_KEY", "secret-key"),
        ("BOM_TO_EPD_AUTH_0_USER", "prod"),
        ("BOM_TO_EPD_AUTH_0_PASSWORD", "prod-pw"),
        ("BOM_TO_EPD_AUTH_1_USER", "dev"),
        ("BOM_TO_EPD_AUTH_1_PASSWORD", "dev-pw"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    ConfigLoader::apply_overrides(&mut config, |key| env.get(key).cloned());

    assert_eq!(config.api_key().unwrap(), "secret-key");
    let credentials = config.resolve_credentials().unwrap();
    assert_eq!(credentials[0].user, "prod");
    assert_eq!(credentials[1].password, "dev-pw");
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_column_letter_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "source": { "bom_path": "bom.xlsx", "material_column": "C3" } }"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert!(matches!(
        config.validate_source(),
        Err(ConfigError::InvalidColumn(_))
    ));
}

#[test]
fn test_unknown_unit_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "epd": { "name": "X", "unit": "barrel" } }"#).unwrap();

    assert!(matches!(
        ConfigLoader::load_from_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::load(Some(&dir.path().join("absent.json")));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}
