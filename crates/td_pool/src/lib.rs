// crates/td_pool/src/lib.rs

//! TerraDrain 积水体积求解模块
//!
//! 输入排水终点（按位置合并）与每个终点的汇入体积，对每个
//! 汇点求平衡积水水面高程并构造近似的积水边界网格。
//!
//! # 求解流程
//!
//! 1. [`endpoints`]: 终点按容差重合合并，体积相加，并绑定到汇点面
//! 2. [`resolver`]: 从汇点面向外扩张淹没域，吸收形心低于候选水位的
//!    邻面；吸收到其他汇点时合并其体积（已定型的积水池会被重新打开）
//! 3. [`solver`]: 割线法迭代求 f(z) = 目标体积 − 实际包容体积 的零点
//! 4. [`engine`]: 包容体积计算引擎——主引擎按水面平面精确裁剪三角形，
//!    对退化几何返回类型化的不支持错误；后备引擎按形心整面分类
//! 5. [`boundary`]: 以最终水位构造积水边界网格（底面 + 顶面）
//!
//! 汇点按发现顺序串行求解：扩张可能改动其他积水池的合并状态，
//! 共享簿记禁止并行。

pub mod boundary;
pub mod clip;
pub mod endpoints;
pub mod engine;
pub mod resolver;
pub mod solver;

pub use boundary::{PoolMeshBuilder, PoolMeshData};
pub use endpoints::{merge_endpoints, MergedEndpoint};
pub use engine::{
    submerged_region, CentroidColumnEngine, ClipPrismEngine, EngineError, VolumeEngine,
};
pub use resolver::{PoolConfig, PoolResolver, PoolResult};
pub use solver::{solve_secant, SecantOutcome, SolverParams};
