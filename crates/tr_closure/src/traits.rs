// crates/tr_closure/src/traits.rs

//! 湍流闭合公共接口
//!
//! 定义 RANS 闭合模型的能力接口和速度梯度数据结构，
//! 供动量求解器以多态方式消费。

use crate::transport::TransportSolver;
use tr_foundation::{FieldBuf, Scalar, TrResult};

/// 速度梯度张量（2D）
///
/// 用于计算应变率、涡度等湍流相关量。
///
/// # 应变率模
///
/// ```text
/// |S| = √(2S_ij·S_ij) = √(2(∂u/∂x)² + 2(∂v/∂y)² + (∂u/∂y + ∂v/∂x)²)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityGradient {
    /// ∂u/∂x
    pub du_dx: Scalar,
    /// ∂u/∂y
    pub du_dy: Scalar,
    /// ∂v/∂x
    pub dv_dx: Scalar,
    /// ∂v/∂y
    pub dv_dy: Scalar,
}

impl VelocityGradient {
    /// 创建新的速度梯度
    #[inline]
    pub fn new(du_dx: Scalar, du_dy: Scalar, dv_dx: Scalar, dv_dy: Scalar) -> Self {
        Self { du_dx, du_dy, dv_dx, dv_dy }
    }

    /// 计算应变率张量的模 |S| = √(2S_ij·S_ij)
    #[inline]
    pub fn strain_rate_magnitude(&self) -> Scalar {
        let s11 = self.du_dx;
        let s22 = self.dv_dy;
        let s12 = 0.5 * (self.du_dy + self.dv_dx);

        (2.0 * s11 * s11 + 2.0 * s22 * s22 + 4.0 * s12 * s12).sqrt()
    }

    /// 计算涡度（z 分量）ω_z = ∂v/∂x - ∂u/∂y
    #[inline]
    pub fn vorticity(&self) -> Scalar {
        self.dv_dx - self.du_dy
    }

    /// 检查梯度是否有效
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.du_dx.is_finite()
            && self.du_dy.is_finite()
            && self.dv_dx.is_finite()
            && self.dv_dy.is_finite()
    }
}

/// RANS 闭合模型能力接口
///
/// 外层求解器只通过该接口驱动闭合模型：每个外层迭代调用一次
/// [`correct`](Self::correct)，并在调用返回后读取 [`nut`](Self::nut)。
pub trait RansClosure: Send + Sync {
    /// 模型名称
    fn name(&self) -> &'static str;

    /// 求解湍流输运方程并更新涡粘性
    ///
    /// 执行固定顺序：F1 → ω 方程 → ω 下限 → k 方程 → k 下限 → νt。
    /// 求解失败（未收敛）向调用方上报，重试策略属于外层迭代循环。
    fn correct(&mut self, solver: &dyn TransportSolver, dt: Scalar) -> TrResult<()>;

    /// 仅重算涡粘性（不求解输运方程）
    fn correct_nut(&mut self);

    /// 重读模型系数，返回是否有系数发生变化
    ///
    /// 带外操作：不触碰 k、ω、νt 场；配置非法时保留原系数并返回错误。
    fn read(&mut self, dict: &serde_json::Value) -> TrResult<bool>;

    /// 湍动能场 [m²/s²]
    fn k(&self) -> &[Scalar];

    /// 比耗散率场 [1/s]
    fn omega(&self) -> &[Scalar];

    /// 涡粘性场 [m²/s]
    fn nut(&self) -> &[Scalar];

    /// 耗散率场 ε = 0.09·k·ω [m²/s³]
    ///
    /// 注意：非 SST 一致的 ε，仅供报告输出使用。
    fn epsilon(&self) -> FieldBuf<Scalar> {
        let eps: Vec<Scalar> = self
            .k()
            .iter()
            .zip(self.omega())
            .map(|(&k, &w)| 0.09 * k * w)
            .collect();
        FieldBuf::from_slice(&eps)
    }
}
