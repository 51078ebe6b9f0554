// crates/td_io/src/lib.rs

//! TerraDrain 文件交换层
//!
//! 排水路径、终点与体积的行式文本格式，以及积水结果清单与
//! 工况配置的 JSON 序列化。几何数据统一用行式文本便于外部
//! 工具逐行消费，结构化元数据走 JSON。
//!
//! # 文本格式约定
//!
//! - 排水路径（`.tsv`）：每行一条路径，路径点之间制表符分隔，
//!   点内坐标 `x,y,z` 逗号分隔
//! - 终点列表：每行一个 `x,y,z`
//! - 体积列表：每行一个浮点数
//!
//! 所有读取器同时提供基于 `io::Read` 的入口，便于内存测试。

#![warn(missing_docs)]

pub mod drain_tsv;
pub mod error;
pub mod lists;
pub mod manifest;

pub use drain_tsv::{read_paths, read_paths_from, write_paths, write_paths_to};
pub use error::{IoError, IoResult};
pub use lists::{
    read_endpoints, read_endpoints_from, read_volumes, read_volumes_from, write_endpoints,
    write_endpoints_to, write_mesh_names, write_mesh_names_to, write_volumes, write_volumes_to,
};
pub use manifest::{CaseConfig, PoolManifest, PoolRecord};
