// apps/td_cli/src/commands/info.rs

//! 网格信息命令
//!
//! 显示地形网格的基本统计与高程范围。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use td_mesh::ObjLoader;

/// 网格信息参数
#[derive(Args)]
pub struct InfoArgs {
    /// 地形网格 OBJ 路径
    #[arg(short, long)]
    pub mesh: PathBuf,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let mesh = ObjLoader::load(&args.mesh)
        .with_context(|| format!("加载网格失败: {}", args.mesh.display()))?;

    let (min, max) = mesh.bounds();

    println!("=== 网格信息 ===");
    println!("文件: {}", args.mesh.display());
    println!("顶点数: {}", mesh.n_vertices());
    println!("面数: {}", mesh.n_faces());
    println!("邻接链接数: {}", mesh.adjacency().n_links());
    println!(
        "包围盒: ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
    println!("高程范围: {:.3} - {:.3}", mesh.z_min(), mesh.z_max());
    println!("总表面积: {:.3}", mesh.total_area());
    Ok(())
}
