// crates/td_io/src/manifest.rs

//! 积水结果清单与工况配置
//!
//! 结构化元数据走 JSON：清单记录每个积水池的求解结果摘要与
//! 边界网格产物名，工况配置描述一次完整运行的输入输出路径。

use crate::error::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 单个积水池的清单记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolRecord {
    /// 汇点面索引
    pub sink_face: u32,
    /// 平衡水面高程 [m]
    pub level: f64,
    /// 目标体积 [m³]
    pub requested_volume: f64,
    /// 实际容纳体积 [m³]
    pub achieved_volume: f64,
    /// 溢出未容纳的体积 [m³]
    pub shortfall: f64,
    /// 是否溢出钳制
    pub overflow: bool,
    /// 淹没域面数
    pub n_faces: usize,
    /// 边界网格产物文件名
    pub mesh_name: String,
    /// 被并入的其他汇点面
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absorbed_sinks: Vec<u32>,
    /// 非致命告警
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// 积水结果清单
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolManifest {
    /// 各积水池记录（按定型顺序）
    pub pools: Vec<PoolRecord>,
}

impl PoolManifest {
    /// 写出到 JSON 文件
    pub fn save(&self, path: &Path) -> IoResult<()> {
        let file =
            File::create(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// 从 JSON 文件读入
    pub fn load(path: &Path) -> IoResult<Self> {
        let file = File::open(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// 工况配置
///
/// 描述一次完整运行：地形网格、入流体积与输出位置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    /// 地形网格 OBJ 路径
    pub mesh: PathBuf,
    /// 每面入流体积列表路径（与面索引对应）
    pub volumes: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 追踪线程数
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

impl CaseConfig {
    /// 从 JSON 文件读入
    pub fn load(path: &Path) -> IoResult<Self> {
        let file = File::open(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// 写出到 JSON 文件
    pub fn save(&self, path: &Path) -> IoResult<()> {
        let file =
            File::create(path).map_err(|e| IoError::file(path.display().to_string(), e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_roundtrip() {
        let manifest = PoolManifest {
            pools: vec![PoolRecord {
                sink_face: 42,
                level: 1.25,
                requested_volume: 3.0,
                achieved_volume: 3.0,
                shortfall: 0.0,
                overflow: false,
                n_faces: 17,
                mesh_name: "pool_mesh_42.obj".to_string(),
                absorbed_sinks: vec![7],
                warning: None,
            }],
        };

        let json = serde_json::to_string(&manifest).unwrap();
        let back: PoolManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pools.len(), 1);
        assert_eq!(back.pools[0].sink_face, 42);
        assert_eq!(back.pools[0].absorbed_sinks, vec![7]);
    }

    #[test]
    fn test_case_config_defaults() {
        let json = r#"{"mesh":"terrain.obj","volumes":"vol.txt","output_dir":"out"}"#;
        let cfg: CaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.workers, 1);
    }

    #[test]
    fn test_empty_warning_omitted() {
        let record = PoolRecord {
            sink_face: 0,
            level: 0.0,
            requested_volume: 0.0,
            achieved_volume: 0.0,
            shortfall: 0.0,
            overflow: false,
            n_faces: 0,
            mesh_name: String::new(),
            absorbed_sinks: Vec::new(),
            warning: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("warning"));
        assert!(!json.contains("absorbed_sinks"));
    }
}
