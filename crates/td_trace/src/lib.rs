// crates/td_trace/src/lib.rs

//! TerraDrain 排水路径追踪模块
//!
//! 对网格的每个面做一次离散最陡下降追踪：从面形心出发，
//! 反复跳向形心高程最低的相邻面，直到不存在更低的邻居
//! （局部极小，即排水终点）。
//!
//! 各面的追踪彼此独立，天然可并行：固定数量的工作线程从
//! 共享任务队列取面索引，结束后在 join 屏障处合并结果。
//!
//! # 核心类型
//!
//! - [`DrainPath`]: 单条排水路径（逐跳形心点列）
//! - [`DrainTracer`]: 追踪器
//! - [`TraceConfig`]: 并行度配置

pub mod path;
pub mod tracer;

pub use path::DrainPath;
pub use tracer::{DrainTracer, TraceConfig};
