// crates/tr_closure/src/coeffs.rs

//! SST 模型系数
//!
//! k-ω SST 低雷诺数模型的全部物理常数，构造时加载一次，
//! 之后只能通过 [`SstCoeffs::updated`] 显式重读。
//!
//! # 默认系数（Menter-Esch 2001 / Fluent v15 低雷诺数扩展）
//!
//! | 系数 | 值 | 说明 |
//! |------|------|------|
//! | β1 | 0.075 | k-ω 分支 ω 耗散系数 |
//! | β2 | 0.0828 | k-ε 分支 ω 耗散系数 |
//! | β*∞ | 0.09 | k 耗散系数（完全湍流渐近值）|
//! | α*∞ | 1.0 | 低雷诺数修正渐近值 |
//! | βi | 0.072 | k-ω 模型 β（α*₀ = βi/3）|
//! | κ | 0.41 | von Karman 常数 |
//! | σk1, σk2 | 1.176, 1.0 | k 方程湍流 Prandtl 数 |
//! | σω1, σω2 | 2.0, 1.168 | ω 方程湍流 Prandtl 数 |
//! | a1 | 0.31 | Bradshaw 涡粘性限制系数 |
//! | b1 | 1.0 | 限制器应变率权重 |
//! | c1 | 10.0 | k 产生项上限系数 |
//! | Rβ, Rk, Rω | 8.0, 6.0, 2.95 | 低雷诺数修正尺度 |
//! | α0 | 1/9 | ω 产生系数低雷诺数渐近值 |
//! | F3 | false | 粗糙壁面修正开关 |
//!
//! 注意：混合作用在 1/σ（即 α 扩散系数）上，与 k-ε / k-ω 两分支的
//! 混合保持一致；派生值 γ1 = 0.5532、γ2 = 0.4403。

use serde::{Deserialize, Serialize};
use tr_foundation::{Scalar, TrError, TrResult};

/// SST 低雷诺数模型系数
///
/// 所有标量系数严格为正（[`validate`](Self::validate) 强制检查），
/// 唯一例外是布尔型粗糙壁面开关 `f3`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SstCoeffs {
    /// β1：k-ω 分支 ω 方程耗散系数
    pub beta1: Scalar,
    /// β2：k-ε 分支 ω 方程耗散系数
    pub beta2: Scalar,
    /// β*∞：k 方程耗散系数的完全湍流渐近值
    pub beta_star_inf: Scalar,
    /// α*∞：低雷诺数修正 α* 的完全湍流渐近值
    pub alpha_star_inf: Scalar,
    /// βi：标准 k-ω 模型 β（低雷诺数 α*₀ = βi/3）
    pub beta_inf: Scalar,
    /// κ：von Karman 常数
    pub kappa: Scalar,
    /// σk1：k-ω 分支 k 方程湍流 Prandtl 数
    pub sigma_k1: Scalar,
    /// σk2：k-ε 分支 k 方程湍流 Prandtl 数
    pub sigma_k2: Scalar,
    /// σω1：k-ω 分支 ω 方程湍流 Prandtl 数
    pub sigma_omega1: Scalar,
    /// σω2：k-ε 分支 ω 方程湍流 Prandtl 数
    pub sigma_omega2: Scalar,
    /// a1：Bradshaw 假设涡粘性上限系数
    pub a1: Scalar,
    /// b1：限制器中应变率项的权重
    pub b1: Scalar,
    /// c1：k 产生项上限（P ≤ c1·β*·k·ω）
    pub c1: Scalar,
    /// Rβ：β* 低雷诺数修正的雷诺数尺度
    pub r_beta: Scalar,
    /// Rk：α* 低雷诺数修正的雷诺数尺度
    pub r_k: Scalar,
    /// Rω：γ 低雷诺数修正的雷诺数尺度
    pub r_omega: Scalar,
    /// α0：γ 低雷诺数修正的零雷诺数渐近值
    pub alpha_zero: Scalar,
    /// k 场下限 [m²/s²]
    pub k_min: Scalar,
    /// ω 场下限 [1/s]
    pub omega_min: Scalar,
    /// F3 粗糙壁面修正开关（Hellsten 1998）
    pub f3: bool,
}

impl Default for SstCoeffs {
    fn default() -> Self {
        Self {
            beta1: 0.075,
            beta2: 0.0828,
            beta_star_inf: 0.09,
            alpha_star_inf: 1.0,
            beta_inf: 0.072,
            kappa: 0.41,
            sigma_k1: 1.176,
            sigma_k2: 1.0,
            sigma_omega1: 2.0,
            sigma_omega2: 1.168,
            a1: 0.31,
            b1: 1.0,
            c1: 10.0,
            r_beta: 8.0,
            r_k: 6.0,
            r_omega: 2.95,
            alpha_zero: 1.0 / 9.0,
            k_min: 1e-10,
            omega_min: 1e-10,
            f3: false,
        }
    }
}

impl SstCoeffs {
    /// γ1：k-ω 分支 ω 产生系数（派生值，默认 0.5532）
    ///
    /// γi = βi'/β*∞ − κ²/(σωi·√β*∞)
    #[inline]
    pub fn gamma1(&self) -> Scalar {
        self.beta1 / self.beta_star_inf
            - self.kappa * self.kappa / (self.sigma_omega1 * self.beta_star_inf.sqrt())
    }

    /// γ2：k-ε 分支 ω 产生系数（派生值，默认 0.4403）
    #[inline]
    pub fn gamma2(&self) -> Scalar {
        self.beta2 / self.beta_star_inf
            - self.kappa * self.kappa / (self.sigma_omega2 * self.beta_star_inf.sqrt())
    }

    /// α*₀ = βi/3：α* 的零雷诺数渐近值
    #[inline]
    pub fn alpha_star_zero(&self) -> Scalar {
        self.beta_inf / 3.0
    }

    /// 系数名-值对（校验与错误上报共用）
    fn named_values(&self) -> [(&'static str, Scalar); 19] {
        [
            ("beta1", self.beta1),
            ("beta2", self.beta2),
            ("beta_star_inf", self.beta_star_inf),
            ("alpha_star_inf", self.alpha_star_inf),
            ("beta_inf", self.beta_inf),
            ("kappa", self.kappa),
            ("sigma_k1", self.sigma_k1),
            ("sigma_k2", self.sigma_k2),
            ("sigma_omega1", self.sigma_omega1),
            ("sigma_omega2", self.sigma_omega2),
            ("a1", self.a1),
            ("b1", self.b1),
            ("c1", self.c1),
            ("r_beta", self.r_beta),
            ("r_k", self.r_k),
            ("r_omega", self.r_omega),
            ("alpha_zero", self.alpha_zero),
            ("k_min", self.k_min),
            ("omega_min", self.omega_min),
        ]
    }

    /// 校验所有标量系数严格为正且有限
    pub fn validate(&self) -> TrResult<()> {
        for (name, v) in self.named_values() {
            if !v.is_finite() || v <= 0.0 {
                return Err(TrError::config(
                    name,
                    format!("必须为正的有限数, 实际 {v}"),
                ));
            }
        }
        Ok(())
    }

    /// 应用配置覆盖，返回（新系数, 是否有变化）
    ///
    /// 输入是系数名到数值的 JSON 对象映射，未出现的键保持原值。
    /// 任何键无效或取值非法时返回错误，原系数不受影响。
    pub fn updated(&self, dict: &serde_json::Value) -> TrResult<(Self, bool)> {
        let obj = dict
            .as_object()
            .ok_or_else(|| TrError::invalid_input("系数配置必须是 JSON 对象"))?;

        let mut next = *self;
        for (key, value) in obj {
            if key == "f3" {
                next.f3 = value
                    .as_bool()
                    .ok_or_else(|| TrError::config(key, "期望布尔值"))?;
                continue;
            }

            let v = value
                .as_f64()
                .ok_or_else(|| TrError::config(key, "期望数值"))? as Scalar;

            match key.as_str() {
                "beta1" => next.beta1 = v,
                "beta2" => next.beta2 = v,
                "beta_star_inf" => next.beta_star_inf = v,
                "alpha_star_inf" => next.alpha_star_inf = v,
                "beta_inf" => next.beta_inf = v,
                "kappa" => next.kappa = v,
                "sigma_k1" => next.sigma_k1 = v,
                "sigma_k2" => next.sigma_k2 = v,
                "sigma_omega1" => next.sigma_omega1 = v,
                "sigma_omega2" => next.sigma_omega2 = v,
                "a1" => next.a1 = v,
                "b1" => next.b1 = v,
                "c1" => next.c1 = v,
                "r_beta" => next.r_beta = v,
                "r_k" => next.r_k = v,
                "r_omega" => next.r_omega = v,
                "alpha_zero" => next.alpha_zero = v,
                "k_min" => next.k_min = v,
                "omega_min" => next.omega_min = v,
                _ => return Err(TrError::config(key, "未知系数")),
            }
        }

        next.validate()?;
        let changed = next != *self;
        Ok((next, changed))
    }
}
