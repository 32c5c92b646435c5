// crates/tr_closure/src/blend.rs

//! 系数混合器
//!
//! 用通用混合算子把 k-ω / k-ε 两套系数按 F1 组合成有效系数：
//!
//! ```text
//! blend(F1, ψ1, ψ2) = F1·(ψ1 − ψ2) + ψ2
//! ```
//!
//! 注意混合作用在 1/σ（α 扩散系数）上而不是 σ 本身，
//! 以保证与两分支模型的混合一致。
//!
//! 纯函数、无状态、无副作用；F1 的数值保护在上游完成。

use crate::coeffs::SstCoeffs;
use tr_foundation::Scalar;

/// 通用混合算子 blend(F1, ψ1, ψ2) = F1·(ψ1 − ψ2) + ψ2
#[inline]
pub fn blend(f1: Scalar, psi1: Scalar, psi2: Scalar) -> Scalar {
    f1 * (psi1 - psi2) + psi2
}

/// 有效 β(F1) = blend(F1, β1, β2)
#[inline]
pub fn beta(f1: Scalar, coeffs: &SstCoeffs) -> Scalar {
    blend(f1, coeffs.beta1, coeffs.beta2)
}

/// 有效 σk(F1)：1/σk 按 blend 混合
#[inline]
pub fn sigma_k(f1: Scalar, coeffs: &SstCoeffs) -> Scalar {
    1.0 / blend(f1, 1.0 / coeffs.sigma_k1, 1.0 / coeffs.sigma_k2)
}

/// 有效 σω(F1)：1/σω 按 blend 混合
#[inline]
pub fn sigma_omega(f1: Scalar, coeffs: &SstCoeffs) -> Scalar {
    1.0 / blend(f1, 1.0 / coeffs.sigma_omega1, 1.0 / coeffs.sigma_omega2)
}

/// 完全湍流 γ∞(F1) = blend(F1, γ1, γ2)
#[inline]
pub fn gamma_inf(f1: Scalar, coeffs: &SstCoeffs) -> Scalar {
    blend(f1, coeffs.gamma1(), coeffs.gamma2())
}

/// k 方程有效扩散率 DkEff = νt/σk(F1) + ν
#[inline]
pub fn dk_eff(nut: Scalar, f1: Scalar, nu: Scalar, coeffs: &SstCoeffs) -> Scalar {
    nut / sigma_k(f1, coeffs) + nu
}

/// ω 方程有效扩散率 DωEff = νt/σω(F1) + ν
#[inline]
pub fn domega_eff(nut: Scalar, f1: Scalar, nu: Scalar, coeffs: &SstCoeffs) -> Scalar {
    nut / sigma_omega(f1, coeffs) + nu
}
