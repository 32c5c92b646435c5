// crates/tr_foundation/src/tolerance.rs

//! 数值下限常量
//!
//! 所有近零分母（ω、壁面距离、交叉扩散项）在使用前用下限截断，
//! 截断不作为错误上报（见错误处理策略）。

use crate::scalar::Scalar;

/// 通用小量下限（分母保护）
pub const SMALL: Scalar = 1e-10;

/// 极小量下限（避免 0/0，不改变物理量级）
pub const VSMALL: Scalar = 1e-30;
