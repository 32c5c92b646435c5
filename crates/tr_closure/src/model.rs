// crates/tr_closure/src/model.rs

//! k-ω SST 低雷诺数闭合模型编排
//!
//! 实现 `correct()` 的固定线性序列：
//!
//! 1. 重算应变率、∇k·∇ω、CDkω 与 F1
//! 2. 组装并求解 ω 输运方程，ω 下限截断
//! 3. 组装并求解 k 输运方程（使用更新后的 ω），k 下限截断
//! 4. 重算 F2/F23 并调用涡粘性限制器
//!
//! 步序是正确性要求：k 方程的有效扩散率依赖上一步的 νt，
//! νt 修正必须放在两个方程之后。除可选的 F3 粗糙壁面路径外
//! 无任何分支。
//!
//! `read()` 是带外操作：只重读系数，不触碰 k、ω、νt。

use crate::blend;
use crate::blending;
use crate::coeffs::SstCoeffs;
use crate::limiter;
use crate::mesh::MeshConnectivity;
use crate::traits::{RansClosure, VelocityGradient};
use crate::transport::{TransportEquation, TransportSolver};
use glam::DVec2;
use rayon::prelude::*;
use tr_foundation::{FieldBuf, Scalar, TrError, TrResult};

/// k-ω SST 低雷诺数湍流模型
///
/// 拥有 k、ω、νt 三个主场；壁面距离、速度梯度与分子粘性
/// 由网格/动量协作方注入。派生量（F1、F23、CDkω、应变率、
/// 有效扩散率）每次 `correct()` 重算，不跨步持久。
#[derive(Debug, Clone)]
pub struct SstLowReModel {
    coeffs: SstCoeffs,
    mesh: MeshConnectivity,
    /// 分子运动粘性 [m²/s]（不可压缩，全场均一）
    nu: Scalar,

    k: FieldBuf<Scalar>,
    omega: FieldBuf<Scalar>,
    nut: FieldBuf<Scalar>,

    wall_distance: FieldBuf<Scalar>,
    velocity_gradient: Vec<VelocityGradient>,

    // 每步重算的派生场
    strain: FieldBuf<Scalar>,
    f1: FieldBuf<Scalar>,
    f23: FieldBuf<Scalar>,
    cd_komega: FieldBuf<Scalar>,
    diffusivity: FieldBuf<Scalar>,
    source: FieldBuf<Scalar>,
    sink: FieldBuf<Scalar>,
    grad_k: Vec<DVec2>,
    grad_omega: Vec<DVec2>,
}

impl SstLowReModel {
    /// 初始湍动能 [m²/s²]
    const K_INIT: Scalar = 1e-4;
    /// 初始比耗散率 [1/s]
    const OMEGA_INIT: Scalar = 1.0;

    /// 创建模型（默认系数，小的正初始场避免除零）
    pub fn new(mesh: MeshConnectivity, nu: Scalar) -> TrResult<Self> {
        Self::with_coeffs(mesh, nu, SstCoeffs::default())
    }

    /// 使用指定系数创建
    pub fn with_coeffs(mesh: MeshConnectivity, nu: Scalar, coeffs: SstCoeffs) -> TrResult<Self> {
        if !(nu > 0.0) || !nu.is_finite() {
            return Err(TrError::invalid_input(format!("分子粘性必须为正: {nu}")));
        }
        coeffs.validate()?;

        let n = mesh.n_cells();
        let mut model = Self {
            coeffs,
            mesh,
            nu,
            k: FieldBuf::filled(n, Self::K_INIT),
            omega: FieldBuf::filled(n, Self::OMEGA_INIT),
            nut: FieldBuf::zeros(n),
            wall_distance: FieldBuf::filled(n, 1.0),
            velocity_gradient: vec![VelocityGradient::default(); n],
            strain: FieldBuf::zeros(n),
            f1: FieldBuf::zeros(n),
            f23: FieldBuf::zeros(n),
            cd_komega: FieldBuf::zeros(n),
            diffusivity: FieldBuf::zeros(n),
            source: FieldBuf::zeros(n),
            sink: FieldBuf::zeros(n),
            grad_k: vec![DVec2::ZERO; n],
            grad_omega: vec![DVec2::ZERO; n],
        };
        model.correct_nut();
        Ok(model)
    }

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.mesh.n_cells()
    }

    /// 当前模型系数
    #[inline]
    pub fn coeffs(&self) -> &SstCoeffs {
        &self.coeffs
    }

    /// 网格连接
    #[inline]
    pub fn mesh(&self) -> &MeshConnectivity {
        &self.mesh
    }

    /// 分子粘性
    #[inline]
    pub fn nu(&self) -> Scalar {
        self.nu
    }

    fn check_len(&self, name: &str, actual: usize) -> TrResult<()> {
        let n = self.n_cells();
        if actual != n {
            return Err(TrError::size_mismatch(name, n, actual));
        }
        Ok(())
    }

    /// 设置 k 场（初始条件/重启），值下限截断
    pub fn set_k(&mut self, values: &[Scalar]) -> TrResult<()> {
        self.check_len("k", values.len())?;
        let k_min = self.coeffs.k_min;
        for (dst, &v) in self.k.iter_mut().zip(values) {
            *dst = v.max(k_min);
        }
        Ok(())
    }

    /// 设置 ω 场（初始条件/重启），值下限截断
    pub fn set_omega(&mut self, values: &[Scalar]) -> TrResult<()> {
        self.check_len("omega", values.len())?;
        let omega_min = self.coeffs.omega_min;
        for (dst, &v) in self.omega.iter_mut().zip(values) {
            *dst = v.max(omega_min);
        }
        Ok(())
    }

    /// 设置壁面距离场
    pub fn set_wall_distance(&mut self, values: &[Scalar]) -> TrResult<()> {
        self.check_len("wall_distance", values.len())?;
        self.wall_distance.copy_from_slice(values);
        Ok(())
    }

    /// 设置速度梯度场（每步由动量求解器注入）
    pub fn set_velocity_gradients(&mut self, gradients: &[VelocityGradient]) -> TrResult<()> {
        self.check_len("velocity_gradient", gradients.len())?;
        self.velocity_gradient.copy_from_slice(gradients);
        Ok(())
    }

    /// 应变率模 |S| 场（从注入的速度梯度重算）
    fn compute_strain(&mut self) {
        let grads = &self.velocity_gradient;
        self.strain.par_iter_mut().enumerate().for_each(|(i, s)| {
            *s = grads[i].strain_rate_magnitude();
        });
    }

    /// F1 与 CDkω（步序第 1 段）
    fn compute_f1(&mut self) {
        let c = self.coeffs;
        let nu = self.nu;

        self.mesh.grad_scalar_into(&self.k, &mut self.grad_k);
        self.mesh.grad_scalar_into(&self.omega, &mut self.grad_omega);

        let grad_k = &self.grad_k;
        let grad_omega = &self.grad_omega;
        let omega = &self.omega;
        self.cd_komega.par_iter_mut().enumerate().for_each(|(i, cd)| {
            let dot = grad_k[i].dot(grad_omega[i]) as Scalar;
            *cd = blending::cd_k_omega(dot, omega[i], &c);
        });

        let k = &self.k;
        let y = &self.wall_distance;
        let cd = &self.cd_komega;
        self.f1.par_iter_mut().enumerate().for_each(|(i, v)| {
            *v = blending::f1(k[i], omega[i], y[i], nu, cd[i], &c);
        });
    }

    /// 组装 ω 方程：DωEff、γ·S² + (1−F1)·CDkω、β(F1)·ω 隐式汇
    fn assemble_omega(&mut self) {
        let c = self.coeffs;
        let nu = self.nu;

        let nut = &self.nut;
        let f1 = &self.f1;
        self.diffusivity.par_iter_mut().enumerate().for_each(|(i, d)| {
            *d = blend::domega_eff(nut[i], f1[i], nu, &c);
        });

        let k = &self.k;
        let omega = &self.omega;
        let strain = &self.strain;
        let cd = &self.cd_komega;
        let (source, sink) = (&mut self.source, &mut self.sink);
        source
            .par_iter_mut()
            .zip(sink.par_iter_mut())
            .enumerate()
            .for_each(|(i, (src, sp))| {
                let ret = blending::re_t(k[i], omega[i], nu, &c);
                let gamma = blending::gamma(f1[i], ret, &c);
                let s2 = strain[i] * strain[i];
                *src = gamma * s2 + (1.0 - f1[i]) * cd[i];
                *sp = blend::beta(f1[i], &c) * omega[i];
            });
    }

    /// 组装 k 方程：DkEff、min(νt·S², c1·β*·k·ω) 产生上限、β*·ω 隐式汇
    ///
    /// 使用刚更新的 ω 重算 ReT 与 β*。
    fn assemble_k(&mut self) {
        let c = self.coeffs;
        let nu = self.nu;

        let nut = &self.nut;
        let f1 = &self.f1;
        self.diffusivity.par_iter_mut().enumerate().for_each(|(i, d)| {
            *d = blend::dk_eff(nut[i], f1[i], nu, &c);
        });

        let k = &self.k;
        let omega = &self.omega;
        let strain = &self.strain;
        let (source, sink) = (&mut self.source, &mut self.sink);
        source
            .par_iter_mut()
            .zip(sink.par_iter_mut())
            .enumerate()
            .for_each(|(i, (src, sp))| {
                let ret = blending::re_t(k[i], omega[i], nu, &c);
                let beta_star = blending::beta_star(ret, &c);
                let production = (nut[i] * strain[i] * strain[i])
                    .min(c.c1 * beta_star * k[i] * omega[i]);
                *src = production;
                *sp = beta_star * omega[i];
            });
    }

    /// F2/F23 场（步序第 4 段前置）
    fn compute_f23(&mut self) {
        let c = self.coeffs;
        let nu = self.nu;
        let k = &self.k;
        let omega = &self.omega;
        let y = &self.wall_distance;
        self.f23.par_iter_mut().enumerate().for_each(|(i, v)| {
            *v = blending::f23(k[i], omega[i], y[i], nu, &c);
        });
    }

    /// 求解湍流输运方程并修正涡粘性（每外层迭代一次）
    pub fn correct(&mut self, solver: &dyn TransportSolver, dt: Scalar) -> TrResult<()> {
        self.compute_strain();
        self.compute_f1();

        // ω 方程先行
        self.assemble_omega();
        let eqn = TransportEquation {
            name: "omega",
            diffusivity: &self.diffusivity,
            source: &self.source,
            sink_coeff: &self.sink,
        };
        solver.solve(&self.mesh, &eqn, &mut self.omega, dt)?;
        let omega_min = self.coeffs.omega_min;
        self.omega.par_iter_mut().for_each(|w| *w = w.max(omega_min));

        // k 方程
        self.assemble_k();
        let eqn = TransportEquation {
            name: "k",
            diffusivity: &self.diffusivity,
            source: &self.source,
            sink_coeff: &self.sink,
        };
        solver.solve(&self.mesh, &eqn, &mut self.k, dt)?;
        let k_min = self.coeffs.k_min;
        self.k.par_iter_mut().for_each(|k| *k = k.max(k_min));

        // 涡粘性修正最后执行
        self.correct_nut();
        Ok(())
    }

    /// 仅重算涡粘性（F2/F23 + Bradshaw 限制器）
    pub fn correct_nut(&mut self) {
        self.compute_strain();
        self.compute_f23();
        limiter::correct_nut_field(
            &mut self.nut,
            &self.k,
            &self.omega,
            &self.f23,
            &self.strain,
            &self.coeffs,
        );
    }

    /// 重读系数，返回是否有变化；非法配置保留原系数
    pub fn read(&mut self, dict: &serde_json::Value) -> TrResult<bool> {
        let (next, changed) = self.coeffs.updated(dict)?;
        if changed {
            log::debug!("SST 系数已更新");
            self.coeffs = next;
        }
        Ok(changed)
    }

    /// 湍动能场
    #[inline]
    pub fn k(&self) -> &[Scalar] {
        &self.k
    }

    /// 比耗散率场
    #[inline]
    pub fn omega(&self) -> &[Scalar] {
        &self.omega
    }

    /// 涡粘性场（动量求解器只读消费）
    #[inline]
    pub fn nut(&self) -> &[Scalar] {
        &self.nut
    }
}

impl RansClosure for SstLowReModel {
    fn name(&self) -> &'static str {
        "kOmegaSSTLowRe"
    }

    fn correct(&mut self, solver: &dyn TransportSolver, dt: Scalar) -> TrResult<()> {
        SstLowReModel::correct(self, solver, dt)
    }

    fn correct_nut(&mut self) {
        SstLowReModel::correct_nut(self)
    }

    fn read(&mut self, dict: &serde_json::Value) -> TrResult<bool> {
        SstLowReModel::read(self, dict)
    }

    fn k(&self) -> &[Scalar] {
        SstLowReModel::k(self)
    }

    fn omega(&self) -> &[Scalar] {
        SstLowReModel::omega(self)
    }

    fn nut(&self) -> &[Scalar] {
        SstLowReModel::nut(self)
    }
}
