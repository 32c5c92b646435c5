// crates/tr_closure/src/lib.rs

//! k-ω SST 低雷诺数湍流闭合模型
//!
//! 为不可压缩 RANS 求解器提供两方程湍流闭合：给定当前 k、ω 场、
//! 平均速度梯度与壁面距离，产出
//!
//! - F1 混合后的有效模型系数（近壁 k-ω / 远场 k-ε 平滑切换）
//! - 推进 k、ω 输运方程所需的有效扩散率与源项
//! - 动量求解器消费的修正涡粘性（Bradshaw 上限）
//!
//! # 模块概览
//!
//! - [`coeffs`]: 模型系数与配置重读 (Menter-Esch 2001 低雷诺数扩展)
//! - [`blending`]: F1/F2/F3/F23 混合函数与低雷诺数修正因子
//! - [`blend`]: 系数混合器（通用 blend 算子 + 有效扩散率）
//! - [`limiter`]: Bradshaw 涡粘性限制器
//! - [`mesh`]: 网格连接适配层（面连接 + Green-Gauss 梯度）
//! - [`transport`]: 输运方程描述、求解接口与显式 FVM 参考求解器
//! - [`model`]: `correct()` 编排（ω 方程先行，νt 修正最后）
//! - [`traits`]: [`RansClosure`] 能力接口与速度梯度
//!
//! # 求解顺序
//!
//! 每次 `correct()` 严格执行 F1 → ω 方程 → k 方程 → νt 的线性序列；
//! 这是正确性要求而非性能选择（k 方程的扩散率依赖上一步 νt）。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blend;
pub mod blending;
pub mod coeffs;
pub mod limiter;
pub mod mesh;
pub mod model;
pub mod traits;
pub mod transport;

// 重导出常用类型
pub use coeffs::SstCoeffs;
pub use mesh::{FaceLink, MeshConnectivity};
pub use model::SstLowReModel;
pub use traits::{RansClosure, VelocityGradient};
pub use transport::{ExplicitFvmSolver, SolveStats, TransportEquation, TransportSolver};
