// apps/td_cli/src/commands/run.rs

//! 完整工况命令
//!
//! 按工况配置执行完整流程：加载网格、全面追踪排水路径、
//! 把每个面的入流体积带到其排水终点、合并终点并求解积水池，
//! 最后写出路径、终点、边界网格与结果清单。

use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use td_io::CaseConfig;
use td_mesh::ObjLoader;
use td_trace::{DrainTracer, TraceConfig};
use tracing::info;

/// 完整工况参数
#[derive(Args)]
pub struct RunArgs {
    /// 工况配置 JSON 路径
    #[arg(short, long)]
    pub config: PathBuf,
}

/// 执行完整工况
pub fn execute(args: RunArgs) -> Result<()> {
    let start = Instant::now();

    let case = CaseConfig::load(&args.config)
        .with_context(|| format!("加载工况配置失败: {}", args.config.display()))?;

    let mesh = ObjLoader::load(&case.mesh)
        .with_context(|| format!("加载网格失败: {}", case.mesh.display()))?;
    info!(
        n_vertices = mesh.n_vertices(),
        n_faces = mesh.n_faces(),
        "网格加载完成"
    );

    // 每面入流体积，与面索引按行对应
    let face_volumes = td_io::read_volumes(&case.volumes).context("读取体积列表失败")?;
    if face_volumes.len() != mesh.n_faces() {
        bail!(
            "体积列表与网格面数不一致: {} vs {}",
            face_volumes.len(),
            mesh.n_faces()
        );
    }

    // ---- 追踪阶段 ----
    let tracer = DrainTracer::new(&mesh, TraceConfig::with_workers(case.workers));
    let paths = tracer.trace_all();

    fs::create_dir_all(&case.output_dir)
        .with_context(|| format!("创建输出目录失败: {}", case.output_dir.display()))?;

    let point_lists: Vec<Vec<_>> = paths.iter().map(|p| p.points.clone()).collect();
    td_io::write_paths(&case.output_dir.join("drain_paths.tsv"), &point_lists)
        .context("写出排水路径失败")?;

    // 入流体积随路径汇到终点
    let endpoints: Vec<_> = paths.iter().map(|p| p.endpoint()).collect();
    let endpoint_volumes: Vec<f64> = paths
        .iter()
        .map(|p| face_volumes[p.source_face as usize])
        .collect();
    td_io::write_endpoints(&case.output_dir.join("endpoints.txt"), &endpoints)
        .context("写出终点列表失败")?;

    // ---- 积水阶段 ----
    let results = super::pools::solve(&mesh, &endpoints, &endpoint_volumes)?;
    super::pools::write_outputs(&case.output_dir, &results)?;

    info!(
        n_paths = paths.len(),
        n_pools = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "工况执行完成"
    );
    Ok(())
}
