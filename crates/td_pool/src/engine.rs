// crates/td_pool/src/engine.rs

//! 包容体积计算引擎
//!
//! 给定水面高程 z，计算淹没域内地形与水面之间的体积
//! （相当于把以淹没域足迹为底、z 为顶的棱柱与地形网格做布尔
//! 交运算后取实体体积）。
//!
//! # 引擎切换
//!
//! - [`ClipPrismEngine`]（主引擎）：逐三角形按水面平面精确裁剪并
//!   积分水柱体积。遇到近竖直的退化三角形（XY 投影面积低于容差）
//!   返回类型化的 [`EngineError::Unsupported`]。
//! - [`CentroidColumnEngine`]（后备引擎）：整面分类，按形心判断
//!   淹没并取 `A_xy · (z − z_c)`，不会失败但精度较低。
//!
//! 调用方只在主引擎返回 `Unsupported` 时切换后备引擎，
//! 其他错误原样向上传播，避免泛化 catch 掩盖无关故障。

use crate::clip::{clip_triangle_below, column_volume};
use rayon::prelude::*;
use td_foundation::Tolerance;
use td_mesh::TerrainMesh;
use thiserror::Error;

/// 体积引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 引擎能力不支持该几何（切换后备引擎的唯一依据）
    #[error("引擎不支持该几何: {reason}")]
    Unsupported {
        /// 不支持的原因
        reason: String,
    },

    /// 计算失败
    #[error("体积计算失败: {message}")]
    Failed {
        /// 失败原因
        message: String,
    },
}

/// 包容体积计算引擎
pub trait VolumeEngine: Send + Sync {
    /// 引擎名称（用于日志）
    fn name(&self) -> &'static str;

    /// 计算淹没域 `region` 在水面高程 `level` 下的包容体积
    fn enclosed_volume(
        &self,
        mesh: &TerrainMesh,
        region: &[u32],
        level: f64,
    ) -> Result<f64, EngineError>;
}

/// 从汇点面洪泛收集淹没域
///
/// 收集与 `sink` 连通、且存在低于 `level` 顶点的面集合。
/// 汇点面无条件包含，结果升序排序（确定性输出）。
pub fn submerged_region(mesh: &TerrainMesh, sink: u32, level: f64) -> Vec<u32> {
    let below = |face: usize| -> bool {
        mesh.face_vertices(face).iter().any(|v| v.z < level)
    };

    let mut visited = vec![false; mesh.n_faces()];
    let mut region = Vec::new();
    let mut stack = vec![sink as usize];
    visited[sink as usize] = true;

    while let Some(face) = stack.pop() {
        region.push(face as u32);
        for &nb in mesh.adjacent_faces(face) {
            let nb = nb as usize;
            if !visited[nb] && below(nb) {
                visited[nb] = true;
                stack.push(nb);
            }
        }
    }

    region.sort_unstable();
    region
}

// ============================================================
// 主引擎：平面裁剪棱柱积分
// ============================================================

/// 平面裁剪棱柱引擎
///
/// 对每个淹没面做水面裁剪，再对裁剪多边形积分精确水柱体积。
/// 面数超过阈值时用 rayon 并行求和。
pub struct ClipPrismEngine {
    tolerance: Tolerance,
    /// 低于此面数时串行计算
    min_parallel_size: usize,
}

impl ClipPrismEngine {
    /// 创建主引擎
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            min_parallel_size: 1024,
        }
    }

    /// 单面水柱体积
    fn face_volume(
        &self,
        mesh: &TerrainMesh,
        face: u32,
        level: f64,
    ) -> Result<f64, EngineError> {
        let tri = mesh.face_vertices(face as usize);

        // 完全在水面以上的面不贡献体积
        if tri.iter().all(|v| v.z >= level) {
            return Ok(0.0);
        }

        // 近竖直面：XY 投影退化，棱柱积分失去意义
        if self.tolerance.is_degenerate_area(mesh.face_area_xy(face as usize)) {
            return Err(EngineError::Unsupported {
                reason: format!("面 {} 的 XY 投影面积退化（近竖直面）", face),
            });
        }

        let poly = clip_triangle_below(&tri, level);
        Ok(column_volume(&poly, level))
    }
}

impl VolumeEngine for ClipPrismEngine {
    fn name(&self) -> &'static str {
        "clip_prism"
    }

    fn enclosed_volume(
        &self,
        mesh: &TerrainMesh,
        region: &[u32],
        level: f64,
    ) -> Result<f64, EngineError> {
        if region.len() < self.min_parallel_size {
            let mut total = 0.0;
            for &face in region {
                total += self.face_volume(mesh, face, level)?;
            }
            Ok(total)
        } else {
            let parts: Result<Vec<f64>, EngineError> = region
                .par_iter()
                .map(|&face| self.face_volume(mesh, face, level))
                .collect();
            Ok(parts?.iter().sum())
        }
    }
}

// ============================================================
// 后备引擎：形心整面分类
// ============================================================

/// 形心水柱引擎
///
/// 整面分类：形心低于水面的面贡献 `A_xy · (level − z_c)`。
/// 不做裁剪，任何几何都能处理。
pub struct CentroidColumnEngine;

impl VolumeEngine for CentroidColumnEngine {
    fn name(&self) -> &'static str {
        "centroid_column"
    }

    fn enclosed_volume(
        &self,
        mesh: &TerrainMesh,
        region: &[u32],
        level: f64,
    ) -> Result<f64, EngineError> {
        let mut total = 0.0;
        for &face in region {
            let depth = level - mesh.face_centroid_z(face as usize);
            if depth > 0.0 {
                total += mesh.face_area_xy(face as usize) * depth;
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use td_mesh::generation::GridMeshGenerator;

    fn flat_mesh(n: usize, length: f64, z: f64) -> TerrainMesh {
        GridMeshGenerator::square(n, length)
            .with_elevation(move |_, _| z)
            .build()
            .unwrap()
    }

    #[test]
    fn test_flat_mesh_volume_is_area_times_depth() {
        let mesh = flat_mesh(4, 8.0, 0.0);
        let region: Vec<u32> = mesh.faces().map(|f| f as u32).collect();
        let engine = ClipPrismEngine::new(Tolerance::default());

        let v = engine.enclosed_volume(&mesh, &region, 0.5).unwrap();
        assert!((v - 8.0 * 8.0 * 0.5).abs() < 1e-9, "v = {}", v);
    }

    #[test]
    fn test_engines_agree_on_flat_mesh() {
        let mesh = flat_mesh(4, 4.0, 1.0);
        let region: Vec<u32> = mesh.faces().map(|f| f as u32).collect();

        let primary = ClipPrismEngine::new(Tolerance::default())
            .enclosed_volume(&mesh, &region, 2.0)
            .unwrap();
        let fallback = CentroidColumnEngine
            .enclosed_volume(&mesh, &region, 2.0)
            .unwrap();
        assert!((primary - fallback).abs() < 1e-9);
    }

    #[test]
    fn test_level_below_terrain_gives_zero() {
        let mesh = flat_mesh(2, 2.0, 5.0);
        let region: Vec<u32> = mesh.faces().map(|f| f as u32).collect();
        let engine = ClipPrismEngine::new(Tolerance::default());
        let v = engine.enclosed_volume(&mesh, &region, 1.0).unwrap();
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_vertical_face_is_unsupported() {
        // 含一个竖直三角形的网格
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 0.0, 1.0), // 与 0-1 构成竖直面
        ];
        let faces = vec![[0, 1, 2], [0, 1, 3]];
        let mesh = TerrainMesh::from_raw(vertices, faces).unwrap();

        let engine = ClipPrismEngine::new(Tolerance::default());
        let err = engine
            .enclosed_volume(&mesh, &[0, 1], 0.5)
            .unwrap_err();
        assert!(matches!(err, EngineError::Unsupported { .. }));

        // 后备引擎可以处理
        let v = CentroidColumnEngine.enclosed_volume(&mesh, &[0, 1], 0.5);
        assert!(v.is_ok());
    }

    #[test]
    fn test_submerged_region_connected_only() {
        // 倾斜网格：从最低面出发，水位只淹到一半
        let mesh = GridMeshGenerator::new(8, 1, 8.0, 1.0)
            .with_elevation(|x, _| x)
            .build()
            .unwrap();

        // 最低面：x 接近 0
        let sink = mesh
            .faces()
            .min_by(|&a, &b| {
                mesh.face_centroid_z(a)
                    .partial_cmp(&mesh.face_centroid_z(b))
                    .unwrap()
            })
            .unwrap() as u32;

        let region = submerged_region(&mesh, sink, 2.0);
        assert!(!region.is_empty());
        assert!(region.contains(&sink));
        // 高于水位的面不进入淹没域
        for &f in &region {
            let min_z = mesh
                .face_vertices(f as usize)
                .iter()
                .map(|v| v.z)
                .fold(f64::MAX, f64::min);
            assert!(min_z < 2.0 || f == sink);
        }
        assert!(region.len() < mesh.n_faces());
    }

    #[test]
    fn test_submerged_region_monotone_in_level() {
        let mesh = GridMeshGenerator::new(8, 1, 8.0, 1.0)
            .with_elevation(|x, _| x)
            .build()
            .unwrap();
        let sink = 0u32;

        let low = submerged_region(&mesh, sink, 1.0);
        let high = submerged_region(&mesh, sink, 5.0);
        assert!(high.len() >= low.len());
        for f in &low {
            assert!(high.contains(f));
        }
    }
}
