// apps/td_cli/src/commands/trace.rs

//! 排水路径追踪命令
//!
//! 从网格每个面的形心出发做最陡下降追踪，写出路径 TSV
//! 与终点列表。

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use td_mesh::{ObjLoader, ObjWriter};
use td_trace::{DrainTracer, TraceConfig};
use tracing::info;

/// 排水路径追踪参数
#[derive(Args)]
pub struct TraceArgs {
    /// 地形网格 OBJ 路径
    #[arg(short, long)]
    pub mesh: PathBuf,

    /// 输出目录
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// 追踪线程数
    #[arg(short, long, default_value = "1")]
    pub workers: usize,

    /// 追踪后把焊接过的网格另存到输出目录
    #[arg(long)]
    pub resave_mesh: bool,
}

/// 执行追踪命令
pub fn execute(args: TraceArgs) -> Result<()> {
    let start = Instant::now();

    let mesh = ObjLoader::load(&args.mesh)
        .with_context(|| format!("加载网格失败: {}", args.mesh.display()))?;
    info!(
        n_vertices = mesh.n_vertices(),
        n_faces = mesh.n_faces(),
        "网格加载完成"
    );

    let tracer = DrainTracer::new(&mesh, TraceConfig::with_workers(args.workers));
    let paths = tracer.trace_all();

    fs::create_dir_all(&args.output)
        .with_context(|| format!("创建输出目录失败: {}", args.output.display()))?;

    let point_lists: Vec<Vec<_>> = paths.iter().map(|p| p.points.clone()).collect();
    let endpoints: Vec<_> = paths.iter().map(|p| p.endpoint()).collect();

    let tsv_path = args.output.join("drain_paths.tsv");
    td_io::write_paths(&tsv_path, &point_lists).context("写出排水路径失败")?;
    let ep_path = args.output.join("endpoints.txt");
    td_io::write_endpoints(&ep_path, &endpoints).context("写出终点列表失败")?;

    if args.resave_mesh {
        let mesh_path = args.output.join("drain_mesh.obj");
        ObjWriter::write(&mesh_path, &mesh)
            .with_context(|| format!("另存网格失败: {}", mesh_path.display()))?;
        println!("焊接网格: {}", mesh_path.display());
    }

    info!(
        n_paths = paths.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "追踪完成"
    );
    println!("排水路径: {}", tsv_path.display());
    println!("终点列表: {}", ep_path.display());
    Ok(())
}
