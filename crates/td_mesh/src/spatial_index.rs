// crates/td_mesh/src/spatial_index.rs

//! 面形心空间索引
//!
//! 基于 R-Tree 的形心索引，用于把排水终点坐标映射回所在的汇点面。
//! 使用 rstar crate 实现 O(log n) 最近邻查询。
//!
//! # 示例
//!
//! ```ignore
//! use td_mesh::spatial_index::CentroidIndex;
//!
//! let index = CentroidIndex::build(&mesh);
//! if let Some(face) = index.face_at(endpoint, 1e-6) {
//!     println!("终点落在面 {} 上", face);
//! }
//! ```

use crate::terrain::TerrainMesh;
use glam::DVec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// 索引条目：一个面形心
#[derive(Debug, Clone)]
pub struct CentroidEntry {
    /// 面索引
    pub face: u32,
    /// 形心坐标
    pub position: [f64; 3],
}

impl RTreeObject for CentroidEntry {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for CentroidEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// 面形心 R-Tree 索引
#[derive(Debug)]
pub struct CentroidIndex {
    tree: RTree<CentroidEntry>,
}

impl CentroidIndex {
    /// 从网格构建索引
    pub fn build(mesh: &TerrainMesh) -> Self {
        let entries: Vec<CentroidEntry> = mesh
            .faces()
            .map(|f| {
                let c = mesh.face_centroid(f);
                CentroidEntry {
                    face: f as u32,
                    position: [c.x, c.y, c.z],
                }
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// 最近形心的面及其平方距离
    pub fn nearest(&self, point: DVec3) -> Option<(u32, f64)> {
        let p = [point.x, point.y, point.z];
        self.tree
            .nearest_neighbor(&p)
            .map(|e| (e.face, e.distance_2(&p)))
    }

    /// 在 `eps` 距离内查找形心与 `point` 重合的面
    ///
    /// 超出容差返回 `None`，由调用方决定是否视为错误。
    pub fn face_at(&self, point: DVec3, eps: f64) -> Option<u32> {
        match self.nearest(point) {
            Some((face, dist2)) if dist2 <= eps * eps => Some(face),
            _ => None,
        }
    }

    /// 索引条目数
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
