// crates/td_foundation/src/lib.rs

//! TerraDrain Foundation Layer
//!
//! 基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`tolerance`]: 数值容差配置
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 和 thiserror
//! 2. **显式容差**: 所有浮点相等判断必须经过 [`tolerance::Tolerance`]，
//!    禁止散落的魔法 epsilon
//! 3. **可追溯**: 错误携带文件路径、行号等上下文

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod tolerance;

// 重导出常用类型
pub use error::{TdError, TdResult};
pub use tolerance::Tolerance;

/// 条件检查宏，失败时返回给定错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

/// Option 解包宏，None 时返回给定错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr) => {
        match $opt {
            Some(v) => v,
            None => return Err($err),
        }
    };
}

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{TdError, TdResult};
    pub use crate::tolerance::Tolerance;
    pub use crate::{ensure, require};
}
