// crates/tr_closure/src/limiter.rs

//! 涡粘性限制器
//!
//! Bradshaw 假设：湍流剪切应力不超过 a1·k，与局部应变率大小无关。
//! 对应的涡粘性上限形式：
//!
//! ```text
//! νt = a1·k / max(a1·ω, b1·F23·S)
//! ```
//!
//! 每次 `correct()` 仅在两个输运方程都求解完成后调用一次。

use crate::coeffs::SstCoeffs;
use rayon::prelude::*;
use tr_foundation::Scalar;

/// 单元涡粘性 νt = a1·k / max(a1·ω, b1·F23·S)
#[inline]
pub fn nut_cell(k: Scalar, omega: Scalar, f23: Scalar, strain: Scalar, coeffs: &SstCoeffs) -> Scalar {
    let denom = (coeffs.a1 * omega.max(coeffs.omega_min)).max(coeffs.b1 * f23 * strain);
    coeffs.a1 * k / denom
}

/// 全场涡粘性修正（逐单元并行，覆盖写入 `nut`）
pub fn correct_nut_field(
    nut: &mut [Scalar],
    k: &[Scalar],
    omega: &[Scalar],
    f23: &[Scalar],
    strain: &[Scalar],
    coeffs: &SstCoeffs,
) {
    nut.par_iter_mut().enumerate().for_each(|(i, v)| {
        *v = nut_cell(k[i], omega[i], f23[i], strain[i], coeffs);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_branch_is_k_over_omega() {
        let c = SstCoeffs::default();
        // S = 0：νt = a1·k/(a1·ω) = k/ω
        let nut = nut_cell(0.01, 10.0, 1.0, 0.0, &c);
        assert!((nut - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_bradshaw_cap_never_exceeded() {
        let c = SstCoeffs::default();
        let k = 0.01;
        let omega = 10.0;
        // S 扫掠多个量级：νt·S ≤ a1·k 恒成立（b1=F23=1 时）
        for exp in -6..=8 {
            let s = (10.0_f64).powi(exp) as Scalar;
            let nut = nut_cell(k, omega, 1.0, s, &c);
            assert!(
                nut * s <= c.a1 * k * (1.0 + 1e-12),
                "νt·S = {} > a1·k = {}",
                nut * s,
                c.a1 * k
            );
        }
    }

    #[test]
    fn test_f23_zero_disables_limiter() {
        let c = SstCoeffs::default();
        // F23 = 0：回到 k/ω，无论应变率多大
        let nut = nut_cell(0.01, 10.0, 0.0, 1e9, &c);
        assert!((nut - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_field_pass() {
        let c = SstCoeffs::default();
        let k = vec![0.01; 4];
        let omega = vec![10.0; 4];
        let f23 = vec![1.0; 4];
        let strain = vec![0.0, 1.0, 100.0, 1e6];
        let mut nut = vec![0.0; 4];
        correct_nut_field(&mut nut, &k, &omega, &f23, &strain, &c);
        for (i, &v) in nut.iter().enumerate() {
            assert!(v > 0.0);
            assert!(v * strain[i] <= c.a1 * 0.01 + 1e-12);
        }
    }
}
