// crates/tr_closure/src/blending.rs

//! 混合函数引擎
//!
//! 把逐单元场值（k、ω、壁面距离 y、分子粘性 ν、交叉扩散项 CDkω）
//! 映射为无量纲混合因子 F1/F2/F3/F23 和低雷诺数修正因子 ReT/α*/β*/γ。
//!
//! # 公式（Menter-Esch 2001，Hellsten 1998）
//!
//! ```text
//! ReT = k/(ν·ω)
//! α*  = α*∞·(α*₀ + ReT/Rk)/(1 + ReT/Rk),  α*₀ = βi/3
//! β*  = β*∞·(4/15 + (ReT/Rβ)⁴)/(1 + (ReT/Rβ)⁴)
//! γ   = (γ∞(F1)/α*)·(α0 + ReT/Rω)/(1 + ReT/Rω)
//! F1  = tanh(arg1⁴)
//! F2  = tanh(arg2²)
//! F3  = 1 − tanh((150ν/(ω·y²))⁴)
//! ```
//!
//! 所有除法分母都用正下限保护；输入物理上极端但有限时
//! 输出在解析界内饱和，不抛错误。

use crate::blend;
use crate::coeffs::SstCoeffs;
use tr_foundation::tolerance::VSMALL;
use tr_foundation::{Scalar, SMALL};

/// 湍流雷诺数 ReT = k/(ν·ω)
#[inline]
pub fn re_t(k: Scalar, omega: Scalar, nu: Scalar, coeffs: &SstCoeffs) -> Scalar {
    k / (nu * omega.max(coeffs.omega_min)).max(VSMALL)
}

/// 低雷诺数修正 α*(ReT)
///
/// ReT→0 时趋于 α*₀ = βi/3，ReT→∞ 时趋于 α*∞。
#[inline]
pub fn alpha_star(ret: Scalar, coeffs: &SstCoeffs) -> Scalar {
    let r = ret / coeffs.r_k;
    coeffs.alpha_star_inf * (coeffs.alpha_star_zero() + r) / (1.0 + r)
}

/// 低雷诺数修正 β*(ReT)
///
/// ReT→0 时趋于 (4/15)·β*∞，ReT→∞ 时趋于 β*∞。
#[inline]
pub fn beta_star(ret: Scalar, coeffs: &SstCoeffs) -> Scalar {
    let r4 = (ret / coeffs.r_beta).powi(4);
    coeffs.beta_star_inf * (4.0 / 15.0 + r4) / (1.0 + r4)
}

/// ω 产生系数 γ（F1 混合 + 低雷诺数修正）
#[inline]
pub fn gamma(f1: Scalar, ret: Scalar, coeffs: &SstCoeffs) -> Scalar {
    let r = ret / coeffs.r_omega;
    blend::gamma_inf(f1, coeffs) / alpha_star(ret, coeffs) * (coeffs.alpha_zero + r) / (1.0 + r)
}

/// 交叉扩散项 CDkω = 2/(σω2·ω)·∇k·∇ω
///
/// 返回原始（可为负）值；F1 中使用时另行做正下限截断。
#[inline]
pub fn cd_k_omega(grad_k_dot_grad_omega: Scalar, omega: Scalar, coeffs: &SstCoeffs) -> Scalar {
    2.0 / (coeffs.sigma_omega2 * omega.max(coeffs.omega_min)) * grad_k_dot_grad_omega
}

/// 混合函数 F1 = tanh(arg1⁴)
///
/// 近壁（y→0）趋于 1（k-ω 分支），远壁（y→∞）趋于 0（k-ε 分支）。
#[inline]
pub fn f1(
    k: Scalar,
    omega: Scalar,
    y: Scalar,
    nu: Scalar,
    cd_k_omega: Scalar,
    coeffs: &SstCoeffs,
) -> Scalar {
    let y = y.max(SMALL);
    let w = omega.max(coeffs.omega_min);
    let y2 = y * y;

    let wall_term = (k.max(0.0)).sqrt() / (coeffs.beta_star_inf * w * y);
    let visc_term = 500.0 * nu / (y2 * w);
    let cd_term = 4.0 * k / (coeffs.sigma_omega2 * cd_k_omega.max(1e-10) * y2);

    let arg1 = wall_term.max(visc_term).min(cd_term).min(10.0);
    arg1.powi(4).tanh()
}

/// 混合函数 F2 = tanh(arg2²)
///
/// 只进入涡粘性限制器，不参与系数混合。
#[inline]
pub fn f2(k: Scalar, omega: Scalar, y: Scalar, nu: Scalar, coeffs: &SstCoeffs) -> Scalar {
    let y = y.max(SMALL);
    let w = omega.max(coeffs.omega_min);

    let wall_term = 2.0 * (k.max(0.0)).sqrt() / (coeffs.beta_star_inf * w * y);
    let visc_term = 500.0 * nu / (y * y * w);

    let arg2 = wall_term.max(visc_term).min(100.0);
    (arg2 * arg2).tanh()
}

/// 粗糙壁面项 F3 = 1 − tanh((150ν/(ω·y²))⁴)（Hellsten 1998）
///
/// 近壁趋于 0（抑制限制器），远壁趋于 1。
#[inline]
pub fn f3(omega: Scalar, y: Scalar, nu: Scalar, coeffs: &SstCoeffs) -> Scalar {
    let y = y.max(SMALL);
    let w = omega.max(coeffs.omega_min);

    let arg3 = 150.0 * nu / (w * y * y);
    1.0 - arg3.powi(4).tanh()
}

/// F23：启用粗糙壁面修正时为 F2·F3，否则为 F2
///
/// F3 在近壁趋于 0，对 F2 做乘性抑制；远壁 F3→1，F23 与 F2 一致。
#[inline]
pub fn f23(
    k: Scalar,
    omega: Scalar,
    y: Scalar,
    nu: Scalar,
    coeffs: &SstCoeffs,
) -> Scalar {
    let f2 = f2(k, omega, y, nu, coeffs);
    if coeffs.f3 {
        f2 * f3(omega, y, nu, coeffs)
    } else {
        f2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs() -> SstCoeffs {
        SstCoeffs::default()
    }

    #[test]
    fn test_f1_bounds() {
        let c = coeffs();
        // 扫掠若干量级的输入，F1 必须保持在 [0,1]
        for &k in &[1e-10, 1e-4, 0.01, 1.0, 1e4] {
            for &w in &[1e-8, 0.1, 10.0, 1e6] {
                for &y in &[1e-8, 1e-3, 0.05, 10.0] {
                    for &cd in &[-1.0, 0.0, 1e-10, 5.0] {
                        let v = f1(k, w, y, 1.5e-5, cd, &c);
                        assert!((0.0..=1.0).contains(&v), "F1 = {v}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_f1_near_wall_limit() {
        let c = coeffs();
        // y→0：F1→1（k-ω 分支）
        let v = f1(0.01, 10.0, 1e-9, 1.5e-5, 1e-10, &c);
        assert!(v > 0.999, "F1 = {v}");
    }

    #[test]
    fn test_f1_far_field_limit() {
        let c = coeffs();
        // y→∞：F1→0（k-ε 分支）
        let v = f1(0.01, 10.0, 1e6, 1.5e-5, 1e-10, &c);
        assert!(v < 1e-6, "F1 = {v}");
    }

    #[test]
    fn test_f2_bounds_and_limits() {
        let c = coeffs();
        for &y in &[1e-9, 1e-3, 1.0, 1e5] {
            let v = f2(0.01, 10.0, y, 1.5e-5, &c);
            assert!((0.0..=1.0).contains(&v), "F2 = {v}");
        }
        assert!(f2(0.01, 10.0, 1e-9, 1.5e-5, &c) > 0.999);
        assert!(f2(0.01, 10.0, 1e6, 1.5e-5, &c) < 1e-6);
    }

    #[test]
    fn test_f3_near_wall_suppression() {
        let c = coeffs();
        // 近壁 F3→0，远壁 F3→1
        assert!(f3(10.0, 1e-6, 1.5e-5, &c) < 1e-6);
        assert!(f3(10.0, 10.0, 1.5e-5, &c) > 1.0 - 1e-10);
    }

    #[test]
    fn test_f23_toggle_far_field_invariant() {
        let mut c = coeffs();
        // 远壁：开关 F3 不改变 F23
        let far = f23(0.01, 10.0, 5.0, 1.5e-5, &c);
        c.f3 = true;
        let far_rough = f23(0.01, 10.0, 5.0, 1.5e-5, &c);
        assert!((far - far_rough).abs() < 1e-10);

        // 近壁：F3 开启后 F23 被抑制
        c.f3 = false;
        let near = f23(0.01, 10.0, 2e-5, 1.5e-5, &c);
        c.f3 = true;
        let near_rough = f23(0.01, 10.0, 2e-5, 1.5e-5, &c);
        assert!(near_rough < near);
    }

    #[test]
    fn test_low_re_alpha_star_limits() {
        let c = coeffs();
        // ReT→0: α*→βi/3；ReT→∞: α*→α*∞
        assert!((alpha_star(0.0, &c) - c.beta_inf / 3.0).abs() < 1e-12);
        assert!((alpha_star(1e12, &c) - c.alpha_star_inf).abs() < 1e-6);
    }

    #[test]
    fn test_low_re_beta_star_limits() {
        let c = coeffs();
        assert!((beta_star(0.0, &c) - 4.0 / 15.0 * c.beta_star_inf).abs() < 1e-12);
        assert!((beta_star(1e12, &c) - c.beta_star_inf).abs() < 1e-9);
    }

    #[test]
    fn test_gamma_fully_turbulent_limits() {
        let c = coeffs();
        // 完全湍流极限下 γ 回到混合后的 γ∞
        let ret = 1e12;
        let g1 = gamma(1.0, ret, &c);
        let g0 = gamma(0.0, ret, &c);
        assert!((g1 - c.gamma1()).abs() < 1e-5, "γ(F1=1) = {g1}");
        assert!((g0 - c.gamma2()).abs() < 1e-5, "γ(F1=0) = {g0}");
    }

    #[test]
    fn test_re_t_guarded() {
        let c = coeffs();
        // ω=0 不产生非有限值
        let v = re_t(1.0, 0.0, 1.5e-5, &c);
        assert!(v.is_finite());
    }

    #[test]
    fn test_cd_k_omega_sign_passthrough() {
        let c = coeffs();
        assert!(cd_k_omega(-3.0, 10.0, &c) < 0.0);
        assert!(cd_k_omega(3.0, 10.0, &c) > 0.0);
    }
}
