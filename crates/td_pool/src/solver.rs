// crates/td_pool/src/solver.rs

//! 割线法一维求根
//!
//! 求解 f(z) = 0，其中 f 为"目标体积 − 水位 z 下的包容体积"。
//! 被积函数单调但只能数值求值，不提供导数，割线法是自然选择。

use td_foundation::{TdError, TdResult};
use tracing::trace;

/// 割线法参数
#[derive(Debug, Clone)]
pub struct SolverParams {
    /// 最大迭代次数
    pub max_iters: usize,
    /// 残差收敛阈值（绝对值）
    pub f_tol: f64,
    /// 第二个初值相对第一个的偏移
    pub initial_step: f64,
    /// 割线分母的最小安全值
    pub min_denominator: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            max_iters: 60,
            f_tol: 1e-8,
            initial_step: 1e-3,
            min_denominator: 1e-14,
        }
    }
}

/// 求根结果
#[derive(Debug, Clone, Copy)]
pub struct SecantOutcome {
    /// 近似根
    pub root: f64,
    /// 实际迭代次数
    pub iterations: usize,
    /// 收敛时的残差 |f(root)|
    pub residual: f64,
}

/// 割线法求 f(x) = 0
///
/// 从 `x0` 与 `x0 + initial_step` 出发迭代。分母过小时按安全值
/// 截断步长方向，超过 `max_iters` 仍未收敛返回数值错误。
/// f 的求值错误原样向上传播。
pub fn solve_secant<F>(mut f: F, x0: f64, params: &SolverParams) -> TdResult<SecantOutcome>
where
    F: FnMut(f64) -> TdResult<f64>,
{
    let mut x_prev = x0;
    let mut x_cur = x0 + params.initial_step;
    let mut f_prev = f(x_prev)?;

    if f_prev.abs() <= params.f_tol {
        return Ok(SecantOutcome {
            root: x_prev,
            iterations: 0,
            residual: f_prev.abs(),
        });
    }

    for iter in 1..=params.max_iters {
        let f_cur = f(x_cur)?;
        trace!(iter, x = x_cur, residual = f_cur, "割线迭代");

        if f_cur.abs() <= params.f_tol {
            return Ok(SecantOutcome {
                root: x_cur,
                iterations: iter,
                residual: f_cur.abs(),
            });
        }

        let mut denom = f_cur - f_prev;
        if denom.abs() < params.min_denominator {
            // 平坦区段：保符号截断分母，避免步长爆炸
            denom = params.min_denominator.copysign(if denom == 0.0 { 1.0 } else { denom });
        }
        let x_next = x_cur - f_cur * (x_cur - x_prev) / denom;

        x_prev = x_cur;
        f_prev = f_cur;
        x_cur = x_next;
    }

    Err(TdError::numerical(format!(
        "割线法 {} 次迭代未收敛（最后残差 {:.3e}）",
        params.max_iters, f_prev
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_converges_in_one_step() {
        let out = solve_secant(|x| Ok(2.0 * x - 4.0), 0.0, &SolverParams::default()).unwrap();
        assert!((out.root - 2.0).abs() < 1e-8);
    }

    #[test]
    fn test_monotone_nonlinear() {
        // f(x) = x^3 - 8, 根 = 2
        let out = solve_secant(|x| Ok(x * x * x - 8.0), 1.0, &SolverParams::default()).unwrap();
        assert!((out.root - 2.0).abs() < 1e-6, "root = {}", out.root);
        assert!(out.residual <= 1e-8);
    }

    #[test]
    fn test_initial_guess_already_root() {
        let out = solve_secant(|x| Ok(x - 3.0), 3.0, &SolverParams::default()).unwrap();
        assert_eq!(out.iterations, 0);
        assert_eq!(out.root, 3.0);
    }

    #[test]
    fn test_divergent_reports_numerical_error() {
        // 无零点的常值函数
        let params = SolverParams {
            max_iters: 10,
            ..SolverParams::default()
        };
        let err = solve_secant(|_| Ok(1.0), 0.0, &params).unwrap_err();
        assert!(matches!(err, TdError::Numerical { .. }));
    }

    #[test]
    fn test_evaluation_error_propagates() {
        let err = solve_secant(
            |_| Err(TdError::invalid_input("bad")),
            0.0,
            &SolverParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TdError::InvalidInput { .. }));
    }
}
