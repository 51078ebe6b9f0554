// crates/td_mesh/src/io/mod.rs

//! 网格 IO
//!
//! 目前仅支持 OBJ 风格纯文本格式（`v`/`f` 行，1 基索引），
//! 与外部编排层的网格交换约定一致。

pub mod obj;

pub use obj::{ObjLoader, ObjWriter};
