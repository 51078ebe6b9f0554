// crates/td_foundation/src/tolerance.rs

//! 数值容差配置
//!
//! 集中存放项目中所有浮点比较用的阈值，通过参数注入传递，
//! 不使用全局静态变量。
//!
//! # 主要阈值
//!
//! - `merge_eps`: 排水终点重合判断（两条排水路径终点在此距离内视为同一汇点）
//! - `weld_eps`: 网格顶点焊接（共享顶点检测）
//! - `convergence`: 水面高程迭代求解的收敛容差
//! - `min_area_xy`: XY 投影面积下限，低于此值的三角形视为退化（近竖直面）

use serde::{Deserialize, Serialize};

/// 数值容差配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tolerance {
    /// 终点重合容差 [m]
    pub merge_eps: f64,
    /// 顶点焊接容差 [m]
    pub weld_eps: f64,
    /// 体积求解收敛容差（相对目标体积）
    pub convergence: f64,
    /// 退化三角形的 XY 投影面积下限 [m²]
    pub min_area_xy: f64,
    /// 安全除法阈值
    pub safe_div: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            merge_eps: 1e-6,
            weld_eps: 1e-9,
            convergence: 1e-8,
            min_area_xy: 1e-12,
            safe_div: 1e-14,
        }
    }
}

impl Tolerance {
    /// 创建保守配置（更严格的容差）
    pub fn conservative() -> Self {
        Self {
            convergence: 1e-10,
            merge_eps: 1e-8,
            ..Default::default()
        }
    }

    /// 创建快速配置（更宽松的容差）
    pub fn fast() -> Self {
        Self {
            convergence: 1e-6,
            merge_eps: 1e-4,
            ..Default::default()
        }
    }

    /// 判断两点坐标分量是否在终点重合容差内
    #[inline]
    pub fn is_same_point(&self, a: [f64; 3], b: [f64; 3]) -> bool {
        (a[0] - b[0]).abs() <= self.merge_eps
            && (a[1] - b[1]).abs() <= self.merge_eps
            && (a[2] - b[2]).abs() <= self.merge_eps
    }

    /// 判断 XY 投影面积是否退化
    #[inline]
    pub fn is_degenerate_area(&self, area_xy: f64) -> bool {
        area_xy.abs() < self.min_area_xy
    }

    /// 判断体积残差是否收敛
    #[inline]
    pub fn is_volume_converged(&self, residual: f64, target: f64) -> bool {
        residual.abs() < self.convergence * target.abs().max(1.0)
    }

    /// 安全除法判断分母是否过小
    #[inline]
    pub fn is_divisor_safe(&self, d: f64) -> bool {
        d.abs() >= self.safe_div
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance() {
        let tol = Tolerance::default();
        assert!((tol.merge_eps - 1e-6).abs() < 1e-15);
        assert!((tol.convergence - 1e-8).abs() < 1e-15);
    }

    #[test]
    fn test_is_same_point() {
        let tol = Tolerance::default();
        assert!(tol.is_same_point([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]));
        assert!(tol.is_same_point([1.0, 2.0, 3.0], [1.0 + 5e-7, 2.0, 3.0 - 5e-7]));
        assert!(!tol.is_same_point([1.0, 2.0, 3.0], [1.0 + 1e-3, 2.0, 3.0]));
    }

    #[test]
    fn test_degenerate_area() {
        let tol = Tolerance::default();
        assert!(tol.is_degenerate_area(0.0));
        assert!(tol.is_degenerate_area(1e-13));
        assert!(!tol.is_degenerate_area(1e-6));
    }

    #[test]
    fn test_volume_converged() {
        let tol = Tolerance::default();
        assert!(tol.is_volume_converged(1e-9, 1.0));
        assert!(!tol.is_volume_converged(1e-3, 1.0));
        // 大目标体积按相对容差判断
        assert!(tol.is_volume_converged(1e-3, 1e6));
    }

    #[test]
    fn test_conservative_config() {
        let tol = Tolerance::conservative();
        assert!(tol.convergence < Tolerance::default().convergence);
        assert!(tol.merge_eps < Tolerance::default().merge_eps);
    }
}
