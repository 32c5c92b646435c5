// crates/tr_closure/src/transport.rs

//! 标量输运方程描述与求解接口
//!
//! 闭合模型只负责组装输运方程（有效扩散率、显式源、隐式汇），
//! 离散格式与线性求解由外部协作方实现 [`TransportSolver`] 提供。
//!
//! 同时提供一个基于面的显式有限体积参考求解器
//! [`ExplicitFvmSolver`]：
//!
//! ```text
//! φ_i^{n+1} = (φ_i + dτ·(D_i + S_i)) / (1 + dτ·Sp_i)
//! D_i = (1/A_i) Σ_f Γ_f·(φ_j − φ_i)/d_f·L_f
//! ```
//!
//! 汇项按 Patankar 线性化隐式处理，保持正性；
//! 扩散显式稳定性由自动子步控制。

use crate::mesh::MeshConnectivity;
use rayon::prelude::*;
use tr_foundation::{Scalar, TrError, TrResult};

/// 一个标量输运方程的逐单元描述
///
/// 对流项不在本子系统内（由外层动量/输运框架处理），
/// 此处只携带闭合模型贡献的扩散、源与汇。
#[derive(Debug)]
pub struct TransportEquation<'a> {
    /// 方程名（"k" 或 "omega"，用于错误上报）
    pub name: &'static str,
    /// 逐单元有效扩散率 Γ [m²/s]
    pub diffusivity: &'a [Scalar],
    /// 逐单元显式源项 [φ/s]
    pub source: &'a [Scalar],
    /// 逐单元隐式汇系数 Sp ≥ 0（贡献 −Sp·φ）[1/s]
    pub sink_coeff: &'a [Scalar],
}

/// 求解统计
#[derive(Debug, Clone, Copy)]
pub struct SolveStats {
    /// 实际执行的子步数
    pub substeps: usize,
    /// 最后一个子步的最大增量（收敛性度量）
    pub max_delta: Scalar,
}

/// 输运方程求解协作方接口
///
/// 接受方程描述并就地更新未知场；未收敛以
/// [`TrError::SolverDiverged`] 上报，闭合模型不在内部重试。
pub trait TransportSolver: Send + Sync {
    /// 把 `phi` 推进一个时间步 `dt`
    fn solve(
        &self,
        mesh: &MeshConnectivity,
        eqn: &TransportEquation<'_>,
        phi: &mut [Scalar],
        dt: Scalar,
    ) -> TrResult<SolveStats>;
}

/// 基于面的显式有限体积参考求解器
#[derive(Debug, Clone)]
pub struct ExplicitFvmSolver {
    /// 扩散稳定性安全系数（0 < safety ≤ 1）
    pub safety: Scalar,
    /// 子步数上限，超出视为未收敛
    pub max_substeps: usize,
}

impl Default for ExplicitFvmSolver {
    fn default() -> Self {
        Self {
            safety: 0.5,
            max_substeps: 200,
        }
    }
}

impl ExplicitFvmSolver {
    /// 显式扩散稳定时间步：dτ < safety / max_i[(1/A_i)·Σ_f Γ_f·L_f/d_f]
    fn stable_dt(&self, mesh: &MeshConnectivity, diffusivity: &[Scalar], dt: Scalar) -> Scalar {
        let max_rate = (0..mesh.n_cells())
            .into_par_iter()
            .map(|i| {
                let mut rate = 0.0;
                for link in mesh.links_of(i) {
                    let gamma_f = 0.5 * (diffusivity[i] + diffusivity[link.neighbor]);
                    rate += gamma_f * link.face_length / link.center_distance;
                }
                rate / mesh.cell_areas()[i]
            })
            .reduce(|| 0.0 as Scalar, Scalar::max);

        if max_rate > 0.0 {
            (self.safety / max_rate).min(dt)
        } else {
            dt
        }
    }
}

impl TransportSolver for ExplicitFvmSolver {
    fn solve(
        &self,
        mesh: &MeshConnectivity,
        eqn: &TransportEquation<'_>,
        phi: &mut [Scalar],
        dt: Scalar,
    ) -> TrResult<SolveStats> {
        let n = mesh.n_cells();
        if phi.len() != n {
            return Err(TrError::size_mismatch(eqn.name, n, phi.len()));
        }
        if eqn.diffusivity.len() != n || eqn.source.len() != n || eqn.sink_coeff.len() != n {
            return Err(TrError::size_mismatch(eqn.name, n, eqn.diffusivity.len()));
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(TrError::invalid_input(format!("非法时间步长: {dt}")));
        }

        let dt_stable = self.stable_dt(mesh, eqn.diffusivity, dt);
        let substeps = (dt / dt_stable).ceil() as usize;
        if substeps > self.max_substeps {
            return Err(TrError::SolverDiverged {
                equation: eqn.name.to_string(),
                iterations: self.max_substeps,
                residual: (dt / dt_stable) as f64,
            });
        }
        let dtau = dt / substeps as Scalar;
        if substeps > 1 {
            log::debug!("{} 方程显式扩散子步: {}", eqn.name, substeps);
        }

        let mut diffusion = vec![0.0 as Scalar; n];
        let mut max_delta = 0.0;

        for _ in 0..substeps {
            // 面通量扩散项（逐单元并行，只读邻居）
            diffusion.par_iter_mut().enumerate().for_each(|(i, d)| {
                let mut sum = 0.0;
                for link in mesh.links_of(i) {
                    let gamma_f = 0.5 * (eqn.diffusivity[i] + eqn.diffusivity[link.neighbor]);
                    sum += gamma_f * (phi[link.neighbor] - phi[i]) / link.center_distance
                        * link.face_length;
                }
                *d = sum / mesh.cell_areas()[i];
            });

            // Patankar 隐式汇更新
            max_delta = phi
                .par_iter_mut()
                .enumerate()
                .map(|(i, p)| {
                    let old = *p;
                    let sp = eqn.sink_coeff[i].max(0.0);
                    *p = (old + dtau * (diffusion[i] + eqn.source[i])) / (1.0 + dtau * sp);
                    (*p - old).abs()
                })
                .reduce(|| 0.0 as Scalar, Scalar::max);
        }

        Ok(SolveStats {
            substeps,
            max_delta,
        })
    }
}
