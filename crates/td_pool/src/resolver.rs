// crates/td_pool/src/resolver.rs

//! 积水池求解器
//!
//! 对每个合并后的终点：以汇点面为起点估算水位、向外扩张淹没域、
//! 吸收途中遇到的其他汇点（含已定型的积水池，整体重新打开），
//! 再用割线法精确求平衡水位，最后构造边界网格产物。
//!
//! 汇点之间共享合并簿记，串行按发现顺序处理；循环直到没有
//! 待处理终点为止，重新打开只会减少待定型的池数，必然终止。

use crate::boundary::{PoolMeshBuilder, PoolMeshData};
use crate::endpoints::MergedEndpoint;
use crate::engine::{
    submerged_region, CentroidColumnEngine, ClipPrismEngine, EngineError, VolumeEngine,
};
use crate::solver::{solve_secant, SolverParams};
use std::collections::HashMap;
use td_foundation::{TdError, TdResult, Tolerance};
use td_mesh::TerrainMesh;
use tracing::{debug, info, warn};

/// 积水求解配置
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// 几何与收敛容差
    pub tolerance: Tolerance,
    /// 割线法参数
    pub solver: SolverParams,
    /// 边界网格产物名前缀
    pub artifact_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            solver: SolverParams::default(),
            artifact_prefix: "pool_mesh".to_string(),
        }
    }
}

/// 单个积水池的求解结果
#[derive(Debug, Clone)]
pub struct PoolResult {
    /// 汇点面索引（池的根）
    pub sink_face: u32,
    /// 平衡水面高程
    pub level: f64,
    /// 汇入的目标体积（含被吸收池的体积）
    pub requested_volume: f64,
    /// 实际容纳体积
    pub achieved_volume: f64,
    /// 溢出时未容纳的体积，未溢出为 0
    pub shortfall: f64,
    /// 水位是否被钳制到网格最高点（容量不足）
    pub overflow: bool,
    /// 淹没域面数
    pub n_faces: usize,
    /// 边界网格产物名
    pub mesh_name: String,
    /// 边界网格数据
    pub mesh: PoolMeshData,
    /// 非致命告警（溢出、引擎降级）
    pub warning: Option<String>,
    /// 被并入本池的其他汇点面
    pub absorbed_sinks: Vec<u32>,
}

/// 终点处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointState {
    /// 尚未处理
    Pending,
    /// 被并入 `root` 所指终点的池
    Absorbed { root: usize },
    /// 已定型（可被后续扩张重新打开）
    Finalized,
}

/// 积水池求解器
pub struct PoolResolver<'a> {
    mesh: &'a TerrainMesh,
    config: PoolConfig,
    primary: ClipPrismEngine,
    fallback: CentroidColumnEngine,
}

impl<'a> PoolResolver<'a> {
    /// 绑定地形网格
    pub fn new(mesh: &'a TerrainMesh, config: PoolConfig) -> Self {
        let primary = ClipPrismEngine::new(config.tolerance.clone());
        Self {
            mesh,
            config,
            primary,
            fallback: CentroidColumnEngine,
        }
    }

    /// 求解全部终点，返回按定型顺序排列的结果
    pub fn resolve(&self, endpoints: &[MergedEndpoint]) -> TdResult<Vec<PoolResult>> {
        for ep in endpoints {
            TdError::check_index("sink_face", ep.sink_face as usize, self.mesh.n_faces())?;
        }

        info!(n_endpoints = endpoints.len(), "开始积水池求解");

        let mut states = vec![EndpointState::Pending; endpoints.len()];
        // 汇点面 -> 终点索引
        let mut sink_of: HashMap<u32, usize> = HashMap::new();
        // 每个根池累计的目标体积与成员
        let mut pooled_volume: Vec<f64> = endpoints.iter().map(|e| e.volume).collect();
        let mut members: Vec<Vec<usize>> = (0..endpoints.len()).map(|i| vec![i]).collect();
        // 根终点索引 -> 已定型结果
        let mut results: HashMap<usize, PoolResult> = HashMap::new();
        let mut finalize_order: Vec<usize> = Vec::new();

        for (i, ep) in endpoints.iter().enumerate() {
            sink_of.insert(ep.sink_face, i);
        }

        while let Some(root) = states.iter().position(|s| *s == EndpointState::Pending) {
            self.solve_pool(
                root,
                endpoints,
                &sink_of,
                &mut states,
                &mut pooled_volume,
                &mut members,
                &mut results,
                &mut finalize_order,
            )?;
        }

        let mut ordered = Vec::with_capacity(finalize_order.len());
        for root in finalize_order {
            if let Some(r) = results.remove(&root) {
                ordered.push(r);
            }
        }
        info!(n_pools = ordered.len(), "积水池求解完成");
        Ok(ordered)
    }

    /// 求解以 `root` 终点为根的积水池
    #[allow(clippy::too_many_arguments)]
    fn solve_pool(
        &self,
        root: usize,
        endpoints: &[MergedEndpoint],
        sink_of: &HashMap<u32, usize>,
        states: &mut [EndpointState],
        pooled_volume: &mut [f64],
        members: &mut [Vec<usize>],
        results: &mut HashMap<usize, PoolResult>,
        finalize_order: &mut Vec<usize>,
    ) -> TdResult<()> {
        let sink = endpoints[root].sink_face;
        debug!(sink, volume = pooled_volume[root], "处理汇点");

        // ---- 扩张阶段：吸收低于候选水位的邻面与其他汇点 ----
        let mut in_region = vec![false; self.mesh.n_faces()];
        let mut region: Vec<u32> = vec![sink];
        in_region[sink as usize] = true;

        // 候选水位 Z = (Σ z_c·A_xy + V) / Σ A_xy
        let mut sum_za = self.mesh.face_centroid_z(sink as usize)
            * self.mesh.face_area_xy(sink as usize);
        let mut sum_a = self.mesh.face_area_xy(sink as usize);
        td_foundation::ensure!(
            self.config.tolerance.is_divisor_safe(sum_a),
            TdError::invalid_mesh(format!(
                "汇点面 {} 的 XY 投影面积退化，无法估算水位",
                sink
            ))
        );
        let mut level = (sum_za + pooled_volume[root]) / sum_a;

        loop {
            let mut absorbed_any = false;
            let mut scan = 0;
            while scan < region.len() {
                let face = region[scan] as usize;
                scan += 1;
                for &nb in self.mesh.adjacent_faces(face) {
                    if in_region[nb as usize] {
                        continue;
                    }
                    if self.mesh.face_centroid_z(nb as usize) >= level {
                        continue;
                    }

                    in_region[nb as usize] = true;
                    region.push(nb);
                    sum_za += self.mesh.face_centroid_z(nb as usize)
                        * self.mesh.face_area_xy(nb as usize);
                    sum_a += self.mesh.face_area_xy(nb as usize);
                    absorbed_any = true;

                    // 吸收到其他汇点：并入其体积与成员
                    if let Some(&other) = sink_of.get(&nb) {
                        if other != root {
                            self.absorb_endpoint(
                                root,
                                other,
                                states,
                                pooled_volume,
                                members,
                                results,
                                finalize_order,
                            );
                        }
                    }
                    level = (sum_za + pooled_volume[root]) / sum_a;
                }
            }
            if !absorbed_any {
                break;
            }
        }

        debug!(
            sink,
            n_faces = region.len(),
            estimate = level,
            "扩张完成"
        );

        // ---- 容量检查与求根阶段 ----
        let target = pooled_volume[root];
        let z_max = self.mesh.z_max();
        let mut degraded = false;

        let capacity = self.volume_at(sink, z_max, &mut degraded)?;
        let mut warning = None;

        let (final_level, achieved, shortfall, overflow) = if target > capacity {
            let msg = format!(
                "汇点 {} 溢出：目标体积 {:.6} 超出网格容量 {:.6}，水位钳制到 {:.6}",
                sink, target, capacity, z_max
            );
            warn!("{}", msg);
            warning = Some(msg);
            (z_max, capacity, target - capacity, true)
        } else {
            let x0 = level.min(z_max);
            let outcome = solve_secant(
                |z| {
                    let v = self.volume_at(sink, z, &mut degraded)?;
                    Ok(target - v)
                },
                x0,
                &self.config.solver,
            )?;
            let z = outcome.root.min(z_max);
            let v = self.volume_at(sink, z, &mut degraded)?;
            (z, v, 0.0, false)
        };

        if degraded && warning.is_none() {
            warning = Some(format!(
                "汇点 {} 的体积计算降级到 {} 引擎",
                sink,
                self.fallback.name()
            ));
        }

        // ---- 产物阶段 ----
        let final_region = submerged_region(self.mesh, sink, final_level);
        let mesh_data = PoolMeshBuilder::new(self.mesh).build(&final_region, final_level);
        let mesh_name = format!("{}_{}.obj", self.config.artifact_prefix, sink);

        let absorbed_sinks = members[root]
            .iter()
            .filter(|&&m| m != root)
            .map(|&m| endpoints[m].sink_face)
            .collect();

        info!(
            sink,
            level = final_level,
            volume = achieved,
            n_faces = final_region.len(),
            overflow,
            "积水池定型"
        );

        states[root] = EndpointState::Finalized;
        finalize_order.push(root);
        results.insert(
            root,
            PoolResult {
                sink_face: sink,
                level: final_level,
                requested_volume: target,
                achieved_volume: achieved,
                shortfall,
                overflow,
                n_faces: final_region.len(),
                mesh_name,
                mesh: mesh_data,
                warning,
                absorbed_sinks,
            },
        );
        Ok(())
    }

    /// 把终点 `other`（及其整个池）并入 `root`
    #[allow(clippy::too_many_arguments)]
    fn absorb_endpoint(
        &self,
        root: usize,
        other: usize,
        states: &mut [EndpointState],
        pooled_volume: &mut [f64],
        members: &mut [Vec<usize>],
        results: &mut HashMap<usize, PoolResult>,
        finalize_order: &mut Vec<usize>,
    ) {
        // 找到 other 当前所属池的根
        let other_root = match states[other] {
            EndpointState::Absorbed { root: r } => r,
            _ => other,
        };
        if other_root == root {
            return;
        }

        if states[other_root] == EndpointState::Finalized {
            // 重新打开已定型的池：丢弃其结果，体积整体并入
            debug!(reopened = other_root, into = root, "重新打开已定型积水池");
            results.remove(&other_root);
            finalize_order.retain(|&r| r != other_root);
        }

        pooled_volume[root] += pooled_volume[other_root];
        pooled_volume[other_root] = 0.0;

        let moved = std::mem::take(&mut members[other_root]);
        for &m in &moved {
            states[m] = EndpointState::Absorbed { root };
        }
        members[root].extend(moved);
    }

    /// 水位 `z` 下从 `sink` 出发的包容体积
    ///
    /// 主引擎返回 `Unsupported` 时切换后备引擎并记住降级；
    /// 其他引擎错误转为数值错误向上传播。
    fn volume_at(&self, sink: u32, z: f64, degraded: &mut bool) -> TdResult<f64> {
        let region = submerged_region(self.mesh, sink, z);

        if !*degraded {
            match self.primary.enclosed_volume(self.mesh, &region, z) {
                Ok(v) => return Ok(v),
                Err(EngineError::Unsupported { reason }) => {
                    warn!(
                        engine = self.primary.name(),
                        reason, "主引擎不支持该几何，切换后备引擎"
                    );
                    *degraded = true;
                }
                Err(EngineError::Failed { message }) => {
                    return Err(TdError::numerical(message));
                }
            }
        }

        self.fallback
            .enclosed_volume(self.mesh, &region, z)
            .map_err(|e| TdError::numerical(e.to_string()))
    }
}
