// crates/td_trace/src/path.rs

//! 排水路径数据结构

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 一条排水路径
///
/// 从 `source_face` 的形心出发，每跳一个相邻面追加一个点，
/// 终止于局部极小面 `sink_face`。生命周期：追踪期间只增不改，
/// 发出后不再修改。
///
/// 不变量：`points` 非空；首点是源面形心，末点是汇点面形心；
/// 点列高程严格递减（单点路径除外）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrainPath {
    /// 起始面索引
    pub source_face: u32,
    /// 终止（汇点）面索引
    pub sink_face: u32,
    /// 逐跳访问的形心点列
    pub points: Vec<DVec3>,
}

impl DrainPath {
    /// 路径终点（排水终点）
    #[inline]
    pub fn endpoint(&self) -> DVec3 {
        self.points[self.points.len() - 1]
    }

    /// 跳数（点数减一）
    #[inline]
    pub fn n_hops(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// 是否原地终止（源面本身就是局部极小）
    #[inline]
    pub fn is_local_minimum(&self) -> bool {
        self.points.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_and_hops() {
        let path = DrainPath {
            source_face: 0,
            sink_face: 2,
            points: vec![
                DVec3::new(0.0, 0.0, 2.0),
                DVec3::new(1.0, 0.0, 1.0),
                DVec3::new(2.0, 0.0, 0.0),
            ],
        };
        assert_eq!(path.endpoint(), DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(path.n_hops(), 2);
        assert!(!path.is_local_minimum());
    }

    #[test]
    fn test_single_point_path() {
        let path = DrainPath {
            source_face: 5,
            sink_face: 5,
            points: vec![DVec3::new(1.0, 1.0, 0.0)],
        };
        assert!(path.is_local_minimum());
        assert_eq!(path.n_hops(), 0);
        assert_eq!(path.endpoint(), path.points[0]);
    }
}
