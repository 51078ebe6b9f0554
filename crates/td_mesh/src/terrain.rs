// crates/td_mesh/src/terrain.rs

//! 地形网格
//!
//! 只读的 SoA 布局三角网格。构建时一次性完成：
//!
//! 1. 顶点焊接（容差内的重复顶点合并，保证共边检测稳定）
//! 2. 面形心、3D 面积与 XY 投影面积预计算
//! 3. 共边邻接构建（两面共享两个顶点即视为相邻）
//!
//! 冻结后不可修改，追踪与积水求解共享同一份实例。

use crate::topology::CsrAdjacency;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use td_foundation::{TdError, TdResult, Tolerance};

/// 只读三角地形网格
///
/// 不变量：
/// - 面索引是 `0..n_faces()` 的稳定整数
/// - 邻接对称（A 相邻 B 则 B 相邻 A）
/// - `face_area[i] >= 0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainMesh {
    /// 焊接后的顶点坐标
    vertices: Vec<DVec3>,
    /// 三角形顶点索引
    faces: Vec<[u32; 3]>,
    /// 面形心
    face_centroid: Vec<DVec3>,
    /// 面的 3D 面积
    face_area: Vec<f64>,
    /// 面的 XY 投影面积（带正负号消除后的绝对值）
    face_area_xy: Vec<f64>,
    /// 共边邻接
    adjacency: CsrAdjacency,
    /// 包围盒下界
    bounds_min: DVec3,
    /// 包围盒上界
    bounds_max: DVec3,
}

impl TerrainMesh {
    /// 从顶点与面索引构建（使用默认容差）
    pub fn from_raw(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> TdResult<Self> {
        Self::from_raw_with(vertices, faces, &Tolerance::default())
    }

    /// 从顶点与面索引构建
    pub fn from_raw_with(
        vertices: Vec<DVec3>,
        faces: Vec<[u32; 3]>,
        tol: &Tolerance,
    ) -> TdResult<Self> {
        if vertices.is_empty() {
            return Err(TdError::invalid_mesh("网格没有顶点"));
        }
        if faces.is_empty() {
            return Err(TdError::invalid_mesh("网格没有面"));
        }
        for (i, f) in faces.iter().enumerate() {
            for &v in f {
                if v as usize >= vertices.len() {
                    return Err(TdError::invalid_mesh(format!(
                        "面 {} 引用越界顶点 {} (顶点数 {})",
                        i,
                        v,
                        vertices.len()
                    )));
                }
            }
        }

        // 顶点焊接：容差量化网格去重，使逐面展开的顶点也能共边
        let (welded, remap) = weld_vertices(&vertices, tol.weld_eps);
        let faces: Vec<[u32; 3]> = faces
            .iter()
            .map(|f| [remap[f[0] as usize], remap[f[1] as usize], remap[f[2] as usize]])
            .collect();

        // 逐面几何量
        let n_faces = faces.len();
        let mut face_centroid = Vec::with_capacity(n_faces);
        let mut face_area = Vec::with_capacity(n_faces);
        let mut face_area_xy = Vec::with_capacity(n_faces);
        for f in &faces {
            let a = welded[f[0] as usize];
            let b = welded[f[1] as usize];
            let c = welded[f[2] as usize];
            face_centroid.push((a + b + c) / 3.0);
            face_area.push(0.5 * (b - a).cross(c - a).length());
            let cross_z = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
            face_area_xy.push(0.5 * cross_z.abs());
        }

        // 共边邻接：规范化边 -> 面列表
        let mut edge_map: HashMap<(u32, u32), Vec<u32>> = HashMap::with_capacity(n_faces * 3 / 2);
        for (fi, f) in faces.iter().enumerate() {
            for k in 0..3 {
                let (a, b) = (f[k], f[(k + 1) % 3]);
                let key = if a < b { (a, b) } else { (b, a) };
                edge_map.entry(key).or_default().push(fi as u32);
            }
        }
        let mut rows: Vec<Vec<u32>> = vec![Vec::new(); n_faces];
        for shared in edge_map.values() {
            for i in 0..shared.len() {
                for j in (i + 1)..shared.len() {
                    let (a, b) = (shared[i], shared[j]);
                    if !rows[a as usize].contains(&b) {
                        rows[a as usize].push(b);
                        rows[b as usize].push(a);
                    }
                }
            }
        }
        // 行内排序，保证后续迭代顺序确定
        for row in &mut rows {
            row.sort_unstable();
        }
        let adjacency = CsrAdjacency::from_rows(&rows);

        // 包围盒
        let mut bounds_min = DVec3::splat(f64::MAX);
        let mut bounds_max = DVec3::splat(f64::MIN);
        for v in &welded {
            bounds_min = bounds_min.min(*v);
            bounds_max = bounds_max.max(*v);
        }

        Ok(Self {
            vertices: welded,
            faces,
            face_centroid,
            face_area,
            face_area_xy,
            adjacency,
            bounds_min,
            bounds_max,
        })
    }

    // =========================================================================
    // 基本统计
    // =========================================================================

    /// 顶点数量
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// 面数量
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// 面索引范围
    #[inline]
    pub fn faces(&self) -> std::ops::Range<usize> {
        0..self.n_faces()
    }

    // =========================================================================
    // 顶点与面访问
    // =========================================================================

    /// 获取顶点坐标
    #[inline]
    pub fn vertex(&self, v: usize) -> DVec3 {
        self.vertices[v]
    }

    /// 所有顶点
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// 获取面的顶点索引
    #[inline]
    pub fn face_indices(&self, face: usize) -> [u32; 3] {
        self.faces[face]
    }

    /// 所有面的顶点索引
    #[inline]
    pub fn face_index_list(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// 获取面的三个顶点坐标
    #[inline]
    pub fn face_vertices(&self, face: usize) -> [DVec3; 3] {
        let f = self.faces[face];
        [
            self.vertices[f[0] as usize],
            self.vertices[f[1] as usize],
            self.vertices[f[2] as usize],
        ]
    }

    /// 获取面形心
    #[inline]
    pub fn face_centroid(&self, face: usize) -> DVec3 {
        self.face_centroid[face]
    }

    /// 获取面形心高程
    #[inline]
    pub fn face_centroid_z(&self, face: usize) -> f64 {
        self.face_centroid[face].z
    }

    /// 获取面的 3D 面积
    #[inline]
    pub fn face_area(&self, face: usize) -> f64 {
        self.face_area[face]
    }

    /// 获取面的 XY 投影面积
    #[inline]
    pub fn face_area_xy(&self, face: usize) -> f64 {
        self.face_area_xy[face]
    }

    // =========================================================================
    // 拓扑查询
    // =========================================================================

    /// 获取面的共边邻居
    #[inline]
    pub fn adjacent_faces(&self, face: usize) -> &[u32] {
        self.adjacency.neighbors(face)
    }

    /// 邻接存储
    #[inline]
    pub fn adjacency(&self) -> &CsrAdjacency {
        &self.adjacency
    }

    /// 两个面共享边的长度
    ///
    /// 两面共享两个顶点时返回共享边长；不共边返回 `None`。
    /// "无共享边"是合法查询结果，不是错误。
    pub fn shared_edge_length(&self, a: usize, b: usize) -> Option<f64> {
        let fa = self.faces[a];
        let fb = self.faces[b];

        let mut shared = [0u32; 2];
        let mut count = 0;
        for &va in &fa {
            if fb.contains(&va) {
                if count < 2 {
                    shared[count] = va;
                }
                count += 1;
            }
        }
        if count != 2 {
            return None;
        }

        let p = self.vertices[shared[0] as usize];
        let q = self.vertices[shared[1] as usize];
        Some(p.distance(q))
    }

    // =========================================================================
    // 全局几何量
    // =========================================================================

    /// 包围盒 (min, max)
    #[inline]
    pub fn bounds(&self) -> (DVec3, DVec3) {
        (self.bounds_min, self.bounds_max)
    }

    /// 网格最低高程
    #[inline]
    pub fn z_min(&self) -> f64 {
        self.bounds_min.z
    }

    /// 网格最高高程
    #[inline]
    pub fn z_max(&self) -> f64 {
        self.bounds_max.z
    }

    /// 总 3D 面积
    pub fn total_area(&self) -> f64 {
        self.face_area.iter().sum()
    }

    /// 验证网格完整性
    pub fn validate(&self) -> TdResult<()> {
        TdError::check_size("face_centroid", self.faces.len(), self.face_centroid.len())?;
        TdError::check_size("face_area", self.faces.len(), self.face_area.len())?;
        TdError::check_size("face_area_xy", self.faces.len(), self.face_area_xy.len())?;

        if self.adjacency.n_faces() != self.faces.len() {
            return Err(TdError::invalid_mesh(format!(
                "邻接行数 {} != 面数 {}",
                self.adjacency.n_faces(),
                self.faces.len()
            )));
        }
        self.adjacency
            .validate_symmetry()
            .map_err(TdError::invalid_mesh)?;

        for (i, &area) in self.face_area.iter().enumerate() {
            if area < 0.0 || !area.is_finite() {
                return Err(TdError::invalid_mesh(format!("面 {} 面积非法: {}", i, area)));
            }
        }
        Ok(())
    }
}

/// 顶点焊接
///
/// 按 `eps` 量化坐标去重，返回 (焊接后顶点, 原索引 -> 新索引映射)。
fn weld_vertices(vertices: &[DVec3], eps: f64) -> (Vec<DVec3>, Vec<u32>) {
    let mut welded: Vec<DVec3> = Vec::with_capacity(vertices.len());
    let mut remap: Vec<u32> = Vec::with_capacity(vertices.len());
    let mut seen: HashMap<(i64, i64, i64), u32> = HashMap::with_capacity(vertices.len());

    let quantize = |x: f64| -> i64 { (x / eps).round() as i64 };

    for v in vertices {
        let key = (quantize(v.x), quantize(v.y), quantize(v.z));
        match seen.get(&key) {
            Some(&idx) => remap.push(idx),
            None => {
                let idx = welded.len() as u32;
                seen.insert(key, idx);
                welded.push(*v);
                remap.push(idx);
            }
        }
    }
    (welded, remap)
}
