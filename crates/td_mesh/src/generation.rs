// crates/td_mesh/src/generation.rs

//! 网格生成模块
//!
//! 提供简单的结构化网格生成工具，用于测试和验证：
//! 矩形域三角网格，高程由给定的 `f(x, y)` 函数决定。
//!
//! # 使用示例
//!
//! ```
//! use td_mesh::generation::GridMeshGenerator;
//!
//! // 沿 x 方向单调下降的斜面
//! let mesh = GridMeshGenerator::new(10, 10, 100.0, 100.0)
//!     .with_elevation(|x, _y| 10.0 - 0.1 * x)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mesh.n_faces(), 200); // 10*10*2 triangles
//! ```

use crate::terrain::TerrainMesh;
use glam::DVec3;
use td_foundation::TdResult;

/// 矩形结构化网格生成器
///
/// 生成矩形域上的三角形网格，顶点按行主序排列，
/// 每个矩形单元沿对角线分为两个三角形。
pub struct GridMeshGenerator {
    /// x 方向单元数
    nx: usize,
    /// y 方向单元数
    ny: usize,
    /// x 方向域长度 [m]
    lx: f64,
    /// y 方向域长度 [m]
    ly: f64,
    /// x 方向起点
    x0: f64,
    /// y 方向起点
    y0: f64,
    /// 高程函数 z = f(x, y)
    elevation: Box<dyn Fn(f64, f64) -> f64>,
}

impl GridMeshGenerator {
    /// 创建矩形网格生成器（默认平面 z = 0）
    ///
    /// # 参数
    ///
    /// - `nx`: x 方向单元数
    /// - `ny`: y 方向单元数
    /// - `lx`: x 方向域长度
    /// - `ly`: y 方向域长度
    pub fn new(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        Self {
            nx,
            ny,
            lx,
            ly,
            x0: 0.0,
            y0: 0.0,
            elevation: Box::new(|_, _| 0.0),
        }
    }

    /// 创建方形网格生成器
    pub fn square(n: usize, length: f64) -> Self {
        Self::new(n, n, length, length)
    }

    /// 设置原点偏移
    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    /// 设置高程函数
    pub fn with_elevation(mut self, f: impl Fn(f64, f64) -> f64 + 'static) -> Self {
        self.elevation = Box::new(f);
        self
    }

    /// x 方向网格间距
    pub fn dx(&self) -> f64 {
        self.lx / self.nx as f64
    }

    /// y 方向网格间距
    pub fn dy(&self) -> f64 {
        self.ly / self.ny as f64
    }

    /// 顶点总数
    pub fn n_vertices(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    /// 面总数（每个矩形分为 2 个三角形）
    pub fn n_faces(&self) -> usize {
        self.nx * self.ny * 2
    }

    /// 构建网格
    pub fn build(&self) -> TdResult<TerrainMesh> {
        let dx = self.dx();
        let dy = self.dy();

        // 顶点
        let mut vertices = Vec::with_capacity(self.n_vertices());
        for j in 0..=self.ny {
            for i in 0..=self.nx {
                let x = self.x0 + i as f64 * dx;
                let y = self.y0 + j as f64 * dy;
                let z = (self.elevation)(x, y);
                vertices.push(DVec3::new(x, y, z));
            }
        }

        let vid = |i: usize, j: usize| -> u32 { (j * (self.nx + 1) + i) as u32 };

        // 三角形
        let mut faces = Vec::with_capacity(self.n_faces());
        for j in 0..self.ny {
            for i in 0..self.nx {
                let v00 = vid(i, j);
                let v10 = vid(i + 1, j);
                let v11 = vid(i + 1, j + 1);
                let v01 = vid(i, j + 1);
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        TerrainMesh::from_raw(vertices, faces)
    }
}
