// crates/td_trace/src/tracer.rs

//! 最陡下降追踪器
//!
//! # 算法
//!
//! 从面形心出发，每步检查所有相邻面，选择形心高程最低者；
//! 当前点先记入路径，若所选最低高程不低于当前高程则停止
//! （局部极小即排水终点），否则跳到该面继续。
//!
//! # 终止性
//!
//! 每次跳跃要求邻居高程严格更低，因此路径高程严格递减、不可能
//! 回访任何面，跳数以面总数为上界。无邻居的边界面立即以单点
//! 路径终止。不需要看门狗。
//!
//! # 并发
//!
//! 经典生产者/消费者：固定数量的工作线程从共享队列取
//! (面索引) 任务，各自在线程本地列表累积完成的路径，
//! `thread::scope` 退出即 join 屏障，之后合并。结果集与
//! 线程数无关；对源面排序后输出完全确定。

use crate::path::DrainPath;
use glam::DVec3;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Instant;
use td_mesh::TerrainMesh;
use tracing::{debug, info};

/// 追踪配置
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// 工作线程数；<= 1 时串行执行
    pub workers: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl TraceConfig {
    /// 指定线程数
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }
}

/// 排水路径追踪器
pub struct DrainTracer<'a> {
    mesh: &'a TerrainMesh,
    config: TraceConfig,
}

impl<'a> DrainTracer<'a> {
    /// 创建追踪器
    pub fn new(mesh: &'a TerrainMesh, config: TraceConfig) -> Self {
        Self { mesh, config }
    }

    /// 追踪所有面，返回按源面索引排序的路径列表
    pub fn trace_all(&self) -> Vec<DrainPath> {
        let n = self.mesh.n_faces();
        let workers = self.config.workers.max(1);
        info!("排水追踪开始: {} 面, {} 线程", n, workers);
        let start = Instant::now();

        let mut paths = if workers == 1 {
            self.trace_sequential()
        } else {
            self.trace_pooled(workers)
        };

        paths.sort_unstable_by_key(|p| p.source_face);
        info!(
            "排水追踪完成: {} 条路径, 耗时 {:.3} s",
            paths.len(),
            start.elapsed().as_secs_f64()
        );
        paths
    }

    /// 追踪单个面
    pub fn trace_face(&self, face: u32) -> DrainPath {
        let mut index = face as usize;
        let mut pt: DVec3 = self.mesh.face_centroid(index);
        let mut points = Vec::new();

        loop {
            points.push(pt);

            // 形心最低的相邻面
            let mut lowest: Option<(usize, f64)> = None;
            for &ad in self.mesh.adjacent_faces(index) {
                let z = self.mesh.face_centroid_z(ad as usize);
                match lowest {
                    None => lowest = Some((ad as usize, z)),
                    Some((_, best)) if z < best => lowest = Some((ad as usize, z)),
                    _ => {}
                }
            }

            match lowest {
                // 严格更低才继续下降
                Some((next, z)) if z < pt.z => {
                    index = next;
                    pt = self.mesh.face_centroid(next);
                }
                // 局部极小或无邻居：当前点即排水终点
                _ => break,
            }
        }

        debug_assert!(points.len() <= self.mesh.n_faces());
        DrainPath {
            source_face: face,
            sink_face: index as u32,
            points,
        }
    }

    fn trace_sequential(&self) -> Vec<DrainPath> {
        self.mesh
            .faces()
            .map(|f| self.trace_face(f as u32))
            .collect()
    }

    fn trace_pooled(&self, workers: usize) -> Vec<DrainPath> {
        let queue: Mutex<VecDeque<u32>> =
            Mutex::new(self.mesh.faces().map(|f| f as u32).collect());
        let results: Mutex<Vec<DrainPath>> = Mutex::new(Vec::with_capacity(self.mesh.n_faces()));

        std::thread::scope(|s| {
            for worker in 0..workers {
                let queue = &queue;
                let results = &results;
                s.spawn(move || {
                    let mut local = Vec::new();
                    loop {
                        // 队列取空即退出；scope 退出处为 join 屏障
                        let job = queue.lock().pop_front();
                        match job {
                            Some(face) => local.push(self.trace_face(face)),
                            None => break,
                        }
                    }
                    debug!("工作线程 {} 完成 {} 条路径", worker, local.len());
                    results.lock().extend(local);
                });
            }
        });

        results.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use td_mesh::generation::GridMeshGenerator;

    fn inclined_mesh(n: usize) -> TerrainMesh {
        // 沿 x 单调下降的斜面
        GridMeshGenerator::square(n, n as f64)
            .with_elevation(|x, _y| -x)
            .build()
            .unwrap()
    }

    #[test]
    fn test_path_elevation_strictly_decreasing() {
        let mesh = inclined_mesh(6);
        let tracer = DrainTracer::new(&mesh, TraceConfig::default());

        for path in tracer.trace_all() {
            for w in path.points.windows(2) {
                assert!(w[1].z < w[0].z, "路径高程必须严格递减");
            }
            assert!(path.points.len() <= mesh.n_faces());
        }
    }

    #[test]
    fn test_path_starts_at_source_ends_at_sink() {
        let mesh = inclined_mesh(4);
        let tracer = DrainTracer::new(&mesh, TraceConfig::default());

        for path in tracer.trace_all() {
            let src = mesh.face_centroid(path.source_face as usize);
            let sink = mesh.face_centroid(path.sink_face as usize);
            assert!((path.points[0] - src).length() < 1e-12);
            assert!((path.endpoint() - sink).length() < 1e-12);
        }
    }

    #[test]
    fn test_sink_is_local_minimum() {
        let mesh = inclined_mesh(5);
        let tracer = DrainTracer::new(&mesh, TraceConfig::default());

        for path in tracer.trace_all() {
            let sink = path.sink_face as usize;
            let sink_z = mesh.face_centroid_z(sink);
            for &nb in mesh.adjacent_faces(sink) {
                assert!(mesh.face_centroid_z(nb as usize) >= sink_z);
            }
        }
    }

    #[test]
    fn test_flat_mesh_all_single_point() {
        // 全平网格：没有严格更低的邻居，所有路径原地终止
        let mesh = GridMeshGenerator::square(3, 3.0).build().unwrap();
        let tracer = DrainTracer::new(&mesh, TraceConfig::default());

        for path in tracer.trace_all() {
            assert!(path.is_local_minimum());
            assert_eq!(path.sink_face, path.source_face);
        }
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let mesh = inclined_mesh(8);
        let seq = DrainTracer::new(&mesh, TraceConfig::with_workers(1)).trace_all();
        let par = DrainTracer::new(&mesh, TraceConfig::with_workers(8)).trace_all();

        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.source_face, b.source_face);
            assert_eq!(a.sink_face, b.sink_face);
            assert_eq!(a.points.len(), b.points.len());
            for (p, q) in a.points.iter().zip(b.points.iter()) {
                assert!((*p - *q).length() < 1e-15);
            }
        }
    }
}
