// crates/td_pool/src/endpoints.rs

//! 排水终点合并
//!
//! 多条排水路径的终点若在容差内重合，则视为同一汇点，
//! 体积相加。容差内重合的判定使用量化空间哈希加相邻格探测，
//! 分组结果只取决于输入顺序，与哈希迭代顺序无关
//! （取代逐对 allclose 扫描的顺序敏感行为）。

use glam::DVec3;
use std::collections::HashMap;
use td_foundation::{TdError, TdResult, Tolerance};
use td_mesh::{CentroidIndex, TerrainMesh};

/// 合并后的终点组
#[derive(Debug, Clone)]
pub struct MergedEndpoint {
    /// 代表位置（组内首个出现的终点）
    pub position: DVec3,
    /// 组内体积之和
    pub volume: f64,
    /// 组内合并的原始终点个数
    pub n_merged: usize,
    /// 所在汇点面索引
    pub sink_face: u32,
}

/// 合并终点并绑定到汇点面
///
/// `points[i]` 与 `volumes[i]` 一一对应。位置在 `tol.merge_eps`
/// 内重合的终点并为一组，体积相加；每组再通过形心索引映射到
/// 汇点面。终点对不上任何面形心属于输入数据损坏，是致命错误。
pub fn merge_endpoints(
    mesh: &TerrainMesh,
    points: &[DVec3],
    volumes: &[f64],
    tol: &Tolerance,
) -> TdResult<Vec<MergedEndpoint>> {
    TdError::check_size("volumes", points.len(), volumes.len())?;

    let groups = group_by_position(points, volumes, tol);

    let index = CentroidIndex::build(mesh);
    let mut merged = Vec::with_capacity(groups.len());
    for g in groups {
        let sink_face = td_foundation::require!(
            index.face_at(g.position, tol.merge_eps),
            TdError::invalid_input(format!(
                "终点 ({}, {}, {}) 不在任何面形心上",
                g.position.x, g.position.y, g.position.z
            ))
        );
        merged.push(MergedEndpoint {
            position: g.position,
            volume: g.volume,
            n_merged: g.n_merged,
            sink_face,
        });
    }
    Ok(merged)
}

/// 仅按位置分组（不绑定面），保持首次出现顺序
pub fn group_by_position(points: &[DVec3], volumes: &[f64], tol: &Tolerance) -> Vec<PositionGroup> {
    let eps = tol.merge_eps;
    let mut groups: Vec<PositionGroup> = Vec::new();
    // 量化格 -> 组索引列表
    let mut cells: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();

    let quantize = |x: f64| -> i64 { (x / eps).floor() as i64 };

    for (i, &p) in points.iter().enumerate() {
        let key = (quantize(p.x), quantize(p.y), quantize(p.z));

        // 在 27 个相邻格内找容差重合的已有组
        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let k = (key.0 + dx, key.1 + dy, key.2 + dz);
                    if let Some(candidates) = cells.get(&k) {
                        for &gi in candidates {
                            let q = groups[gi].position;
                            if tol.is_same_point([p.x, p.y, p.z], [q.x, q.y, q.z]) {
                                found = Some(gi);
                                break 'search;
                            }
                        }
                    }
                }
            }
        }

        match found {
            Some(gi) => {
                groups[gi].volume += volumes[i];
                groups[gi].n_merged += 1;
            }
            None => {
                let gi = groups.len();
                groups.push(PositionGroup {
                    position: p,
                    volume: volumes[i],
                    n_merged: 1,
                });
                cells.entry(key).or_default().push(gi);
            }
        }
    }
    groups
}

/// 位置分组中间结果
#[derive(Debug, Clone)]
pub struct PositionGroup {
    /// 代表位置
    pub position: DVec3,
    /// 体积之和
    pub volume: f64,
    /// 合并的终点个数
    pub n_merged: usize,
}
