// apps/td_cli/src/commands/pools.rs

//! 积水体积求解命令
//!
//! 读入终点列表与对应体积列表（按行对应），合并终点后求解
//! 各积水池的平衡水位，写出边界网格与结果清单。

use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use td_foundation::Tolerance;
use td_io::{PoolManifest, PoolRecord};
use td_mesh::{ObjLoader, ObjWriter, TerrainMesh};
use td_pool::{merge_endpoints, PoolConfig, PoolResolver, PoolResult};
use tracing::info;

/// 积水求解参数
#[derive(Args)]
pub struct PoolsArgs {
    /// 地形网格 OBJ 路径
    #[arg(short, long)]
    pub mesh: PathBuf,

    /// 终点列表路径（每行 x,y,z）
    #[arg(short, long)]
    pub endpoints: PathBuf,

    /// 体积列表路径（每行一个，与终点按行对应）
    #[arg(short, long)]
    pub volumes: PathBuf,

    /// 输出目录
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,
}

/// 执行积水求解命令
pub fn execute(args: PoolsArgs) -> Result<()> {
    let mesh = ObjLoader::load(&args.mesh)
        .with_context(|| format!("加载网格失败: {}", args.mesh.display()))?;

    let points = td_io::read_endpoints(&args.endpoints).context("读取终点列表失败")?;
    let volumes = td_io::read_volumes(&args.volumes).context("读取体积列表失败")?;
    if points.len() != volumes.len() {
        bail!(
            "终点与体积数量不一致: {} vs {}",
            points.len(),
            volumes.len()
        );
    }

    let results = solve(&mesh, &points, &volumes)?;
    write_outputs(&args.output, &results)?;
    Ok(())
}

/// 合并终点并求解全部积水池
pub fn solve(
    mesh: &TerrainMesh,
    points: &[glam::DVec3],
    volumes: &[f64],
) -> Result<Vec<PoolResult>> {
    let tol = Tolerance::default();
    let endpoints = merge_endpoints(mesh, points, volumes, &tol).context("终点合并失败")?;
    info!(
        n_raw = points.len(),
        n_merged = endpoints.len(),
        "终点合并完成"
    );

    let resolver = PoolResolver::new(mesh, PoolConfig::default());
    resolver.resolve(&endpoints).context("积水求解失败")
}

/// 写出边界网格与清单
pub fn write_outputs(output: &Path, results: &[PoolResult]) -> Result<()> {
    fs::create_dir_all(output)
        .with_context(|| format!("创建输出目录失败: {}", output.display()))?;

    let mut manifest = PoolManifest::default();
    for r in results {
        if !r.mesh.is_empty() {
            let mesh_path = output.join(&r.mesh_name);
            ObjWriter::write_raw(&mesh_path, &r.mesh.vertices, &r.mesh.faces)
                .with_context(|| format!("写出边界网格失败: {}", mesh_path.display()))?;
        }
        manifest.pools.push(PoolRecord {
            sink_face: r.sink_face,
            level: r.level,
            requested_volume: r.requested_volume,
            achieved_volume: r.achieved_volume,
            shortfall: r.shortfall,
            overflow: r.overflow,
            n_faces: r.n_faces,
            mesh_name: r.mesh_name.clone(),
            absorbed_sinks: r.absorbed_sinks.clone(),
            warning: r.warning.clone(),
        });
    }

    let manifest_path = output.join("pools.json");
    manifest.save(&manifest_path).context("写出结果清单失败")?;

    // 旧式消费端只认产物名列表
    let names: Vec<String> = results.iter().map(|r| r.mesh_name.clone()).collect();
    td_io::write_mesh_names(&output.join("mesh_names.txt"), &names)
        .context("写出网格名列表失败")?;

    info!(n_pools = results.len(), "积水求解输出完成");
    println!("结果清单: {}", manifest_path.display());
    Ok(())
}
