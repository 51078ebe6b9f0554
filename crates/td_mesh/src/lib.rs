// crates/td_mesh/src/lib.rs

//! TerraDrain 地形网格模块
//!
//! 提供只读的 SoA 布局三角网格，面向排水路径追踪与积水求解：
//! 每个面预先计算形心、面积与共边邻接。
//!
//! # 核心类型
//!
//! - [`TerrainMesh`]: 只读三角地形网格
//! - [`CsrAdjacency`]: CSR 格式的面邻接存储
//! - [`CentroidIndex`]: 面形心 R-Tree 空间索引
//!
//! # 模块结构
//!
//! - [`terrain`]: 地形网格核心实现
//! - [`topology`]: CSR 邻接存储
//! - [`io`]: OBJ 风格纯文本网格读写
//! - [`spatial_index`]: 空间索引
//! - [`generation`]: 结构化测试网格生成
//!
//! # 示例
//!
//! ```
//! use td_mesh::generation::GridMeshGenerator;
//!
//! // 生成 4x4 的倾斜平面网格
//! let mesh = GridMeshGenerator::new(4, 4, 10.0, 10.0)
//!     .with_elevation(|x, _y| -0.1 * x)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mesh.n_faces(), 32); // 4*4*2 三角形
//! ```

pub mod generation;
pub mod io;
pub mod spatial_index;
pub mod terrain;
pub mod topology;

// 重导出核心类型
pub use io::obj::{ObjLoader, ObjWriter};
pub use spatial_index::CentroidIndex;
pub use terrain::TerrainMesh;
pub use topology::CsrAdjacency;
