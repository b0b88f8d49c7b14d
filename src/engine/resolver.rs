// ==========================================
// BoM 转 EPD - 过程解析器
// ==========================================
// 职责: 物料行 × 映射表 左连接（按规范化名称）
// 规则:
//   - 每个物料行至少产出一行（未匹配 → mapping = None）
//   - 映射表同名多行 → 按映射表顺序扇出多行（FanOut）
//   - Reject 策略下同名多行直接报错
// ==========================================

use crate::domain::{MappingEntry, MaterialLine, ProcessLine, ResolvedMaterial, UnresolvedMaterial};
use crate::engine::converter::QuantityConverter;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

// ==========================================
// DuplicateKeyPolicy - 映射表重复键策略
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// 扇出：每个重复映射各产出一行（默认）
    #[default]
    FanOut,
    /// 拒绝：加载时报错
    Reject,
}

impl fmt::Display for DuplicateKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateKeyPolicy::FanOut => write!(f, "fan_out"),
            DuplicateKeyPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for DuplicateKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fan_out" | "fanout" => Ok(DuplicateKeyPolicy::FanOut),
            "reject" => Ok(DuplicateKeyPolicy::Reject),
            other => Err(format!("未知的重复键策略: {other}")),
        }
    }
}

// ==========================================
// JoinedMaterial - 连接结果行
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct JoinedMaterial<'a> {
    pub material: &'a MaterialLine,
    pub mapping: Option<&'a MappingEntry>,
}

// ==========================================
// Resolution - 解析 + 换算 + 分区结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// 全部换算行（含未解析），保持连接顺序
    pub rows: Vec<ResolvedMaterial>,
    /// 已解析的过程行
    pub lines: Vec<ProcessLine>,
    /// 缺少 A1 UUID 的物料
    pub unresolved: Vec<UnresolvedMaterial>,
}

impl Resolution {
    pub fn has_missing(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

// ==========================================
// ProcessResolver
// ==========================================
pub struct ProcessResolver {
    entries: Vec<MappingEntry>,
    index: HashMap<String, Vec<usize>>,
    converter: QuantityConverter,
}

impl ProcessResolver {
    /// 建立映射索引
    ///
    /// # 参数
    /// - entries: 映射表条目（material_name_norm 已规范化）
    /// - policy: 重复键策略
    ///
    /// # 返回
    /// - Err(DuplicateMapping): Reject 策略下存在同名条目
    pub fn new(entries: Vec<MappingEntry>, policy: DuplicateKeyPolicy) -> ImportResult<Self> {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, entry) in entries.iter().enumerate() {
            index
                .entry(entry.material_name_norm.clone())
                .or_default()
                .push(pos);
        }

        // 按映射表行序检查
        for (pos, entry) in entries.iter().enumerate() {
            let key = &entry.material_name_norm;
            let positions = &index[key];
            if positions.len() < 2 || positions[0] != pos {
                continue;
            }
            let first = entry;
            let duplicate = &entries[positions[1]];
            warn!(
                material = %key,
                count = positions.len(),
                first_row = first.row_number,
                duplicate_row = duplicate.row_number,
                "映射表存在重复物料名"
            );
            if policy == DuplicateKeyPolicy::Reject {
                return Err(ImportError::DuplicateMapping {
                    material: key.clone(),
                    first_row: first.row_number,
                    duplicate_row: duplicate.row_number,
                });
            }
        }

        Ok(Self {
            entries,
            index,
            converter: QuantityConverter,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// 出现多次的规范化名称（排序后返回）
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .index
            .iter()
            .filter(|(_, positions)| positions.len() > 1)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// 左连接
    pub fn join<'a>(&'a self, materials: &'a [MaterialLine]) -> Vec<JoinedMaterial<'a>> {
        let mut joined = Vec::with_capacity(materials.len());
        for material in materials {
            match self.index.get(&material.join_key()) {
                Some(positions) => {
                    for &pos in positions {
                        joined.push(JoinedMaterial {
                            material,
                            mapping: Some(&self.entries[pos]),
                        });
                    }
                }
                None => joined.push(JoinedMaterial {
                    material,
                    mapping: None,
                }),
            }
        }
        joined
    }

    /// 连接 → 换算 → 按 A1 UUID 分区
    pub fn resolve(&self, materials: &[MaterialLine]) -> Resolution {
        let joined = self.join(materials);
        let rows = self.converter.convert_all(&joined);

        let mut lines = Vec::new();
        let mut unresolved = Vec::new();
        for row in rows.iter().cloned() {
            match row.into_process_line() {
                Ok(line) => lines.push(line),
                Err(missing) => unresolved.push(missing),
            }
        }

        debug!(
            materials = materials.len(),
            joined = rows.len(),
            resolved = lines.len(),
            unresolved = unresolved.len(),
            "物料解析完成"
        );

        Resolution {
            rows,
            lines,
            unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, uuid: &str, row: usize) -> MappingEntry {
        let mut entry = MappingEntry::for_material(name).with_a1("kg", uuid, Some(1.0));
        entry.row_number = row;
        entry
    }

    #[test]
    fn test_join_matches_case_and_whitespace_insensitive() {
        let resolver = ProcessResolver::new(
            vec![entry("steel", "uuid-steel", 2)],
            DuplicateKeyPolicy::FanOut,
        )
        .unwrap();
        let materials = vec![MaterialLine::new("  STEEL ", 5.0)];

        let joined = resolver.join(&materials);
        assert_eq!(joined.len(), 1);
        assert_eq!(
            joined[0].mapping.and_then(|m| m.process_uuid_a1.as_deref()),
            Some("uuid-steel")
        );
    }

    #[test]
    fn test_join_keeps_unmatched_rows() {
        let resolver = ProcessResolver::new(vec![], DuplicateKeyPolicy::FanOut).unwrap();
        let materials = vec![MaterialLine::new("Wood", 1.0), MaterialLine::new("Glass", 2.0)];

        let joined = resolver.join(&materials);
        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|j| j.mapping.is_none()));
    }

    #[test]
    fn test_join_fans_out_duplicates_in_table_order() {
        let resolver = ProcessResolver::new(
            vec![
                entry("steel", "uuid-first", 2),
                entry("copper", "uuid-cu", 3),
                entry("Steel", "uuid-second", 4),
            ],
            DuplicateKeyPolicy::FanOut,
        )
        .unwrap();
        let materials = vec![MaterialLine::new("Steel", 1.0), MaterialLine::new("Copper", 2.0)];

        let joined = resolver.join(&materials);
        let uuids: Vec<&str> = joined
            .iter()
            .filter_map(|j| j.mapping.and_then(|m| m.process_uuid_a1.as_deref()))
            .collect();
        assert_eq!(uuids, vec!["uuid-first", "uuid-second", "uuid-cu"]);
        assert_eq!(resolver.duplicate_keys(), vec!["steel"]);
    }

    #[test]
    fn test_reject_policy_reports_rows() {
        let result = ProcessResolver::new(
            vec![entry("steel", "a", 2), entry("steel", "b", 7)],
            DuplicateKeyPolicy::Reject,
        );

        match result {
            Err(ImportError::DuplicateMapping {
                material,
                first_row,
                duplicate_row,
            }) => {
                assert_eq!(material, "steel");
                assert_eq!(first_row, 2);
                assert_eq!(duplicate_row, 7);
            }
            other => panic!("expected DuplicateMapping, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_reject_policy_reports_first_duplicate_in_table_order() {
        let entries = vec![
            entry("zinc", "z1", 2),
            entry("brass", "b1", 3),
            entry("aluminium", "a1", 4),
            entry("brass", "b2", 5),
            entry("zinc", "z2", 6),
            entry("aluminium", "a2", 7),
        ];

        for _ in 0..16 {
            match ProcessResolver::new(entries.clone(), DuplicateKeyPolicy::Reject) {
                Err(ImportError::DuplicateMapping {
                    material,
                    first_row,
                    duplicate_row,
                }) => {
                    assert_eq!(material, "zinc");
                    assert_eq!(first_row, 2);
                    assert_eq!(duplicate_row, 6);
                }
                other => panic!("expected DuplicateMapping, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_resolve_partitions_by_a1_uuid() {
        let mut no_uuid = MappingEntry::for_material("paint");
        no_uuid.row_number = 3;
        let resolver = ProcessResolver::new(
            vec![entry("steel", "uuid-steel", 2), no_uuid],
            DuplicateKeyPolicy::FanOut,
        )
        .unwrap();
        let materials = vec![
            MaterialLine::new("Steel", 10.0),
            MaterialLine::new("Paint", 0.5),
            MaterialLine::new("Wood", 3.0),
        ];

        let resolution = resolver.resolve(&materials);
        assert_eq!(resolution.rows.len(), 3);
        assert_eq!(resolution.lines.len(), 1);
        assert_eq!(resolution.lines[0].material, "Steel");
        let missing: Vec<&str> = resolution.unresolved.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(missing, vec!["Paint", "Wood"]);
        assert!(resolution.has_missing());
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!("fan-out".parse::<DuplicateKeyPolicy>().unwrap(), DuplicateKeyPolicy::FanOut);
        assert_eq!("REJECT".parse::<DuplicateKeyPolicy>().unwrap(), DuplicateKeyPolicy::Reject);
        assert!("other".parse::<DuplicateKeyPolicy>().is_err());
    }
}
