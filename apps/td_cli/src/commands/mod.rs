// apps/td_cli/src/commands/mod.rs

//! 命令实现模块

pub mod info;
pub mod pools;
pub mod run;
pub mod trace;
