// crates/td_pool/src/boundary.rs

//! 积水边界网格构造
//!
//! 以最终水位把淹没域各面裁剪出水下多边形，底面贴地形、
//! 顶面抬升到水面高程，扇形剖分为三角形网格。产物用于
//! 可视化与下游交换，不参与体积计算。

use crate::clip::clip_triangle_below;
use glam::DVec3;
use td_mesh::TerrainMesh;

/// 积水边界网格数据
///
/// 顶点与三角形索引，可直接交给 OBJ 写出器。
#[derive(Debug, Clone, Default)]
pub struct PoolMeshData {
    /// 顶点坐标
    pub vertices: Vec<DVec3>,
    /// 三角形顶点索引
    pub faces: Vec<[u32; 3]>,
}

impl PoolMeshData {
    /// 网格是否为空
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// 三角形个数
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }
}

/// 积水边界网格构造器
pub struct PoolMeshBuilder<'a> {
    mesh: &'a TerrainMesh,
}

impl<'a> PoolMeshBuilder<'a> {
    /// 绑定地形网格
    pub fn new(mesh: &'a TerrainMesh) -> Self {
        Self { mesh }
    }

    /// 构造淹没域在水位 `level` 下的边界网格
    ///
    /// 每个淹没面裁剪出水下多边形后生成两层三角形：
    /// 底层贴地形原高程，顶层全部抬到 `level`。
    /// 水位不没过任何面时返回空网格。
    pub fn build(&self, region: &[u32], level: f64) -> PoolMeshData {
        let mut data = PoolMeshData::default();

        for &face in region {
            let tri = self.mesh.face_vertices(face as usize);
            let poly = clip_triangle_below(&tri, level);
            if poly.len() < 3 {
                continue;
            }

            Self::push_fan(&mut data, &poly, false, level);
            Self::push_fan(&mut data, &poly, true, level);
        }
        data
    }

    /// 扇形剖分追加多边形；`lift` 为真时顶点 z 抬升到 `level`
    fn push_fan(data: &mut PoolMeshData, poly: &[DVec3], lift: bool, level: f64) {
        let base = data.vertices.len() as u32;
        for &p in poly {
            let z = if lift { level } else { p.z };
            data.vertices.push(DVec3::new(p.x, p.y, z));
        }
        for i in 1..poly.len() as u32 - 1 {
            data.faces.push([base, base + i, base + i + 1]);
        }
    }
}
