// crates/tr_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `TrError` 枚举和 `TrResult` 类型别名。
//!
//! # 设计原则
//!
//! 1. **可恢复**: 本子系统中没有致命错误，调用方决定中止、缩步或继续
//! 2. **可追溯**: 配置错误携带违规键名，求解错误携带残差信息
//!
//! # 示例
//!
//! ```
//! use tr_foundation::error::{TrError, TrResult};
//!
//! fn read_coeff() -> TrResult<()> {
//!     Err(TrError::config("beta1", "必须为正"))
//! }
//! ```

use thiserror::Error;

/// 统一结果类型
pub type TrResult<T> = Result<T, TrError>;

/// TurbRANS 错误类型
#[derive(Error, Debug)]
pub enum TrError {
    /// 配置错误（携带违规键名）
    #[error("配置错误: 系数 '{key}': {message}")]
    Config {
        /// 违规的系数键名
        key: String,
        /// 错误说明
        message: String,
    },

    /// 输运方程求解未收敛
    #[error("求解未收敛: {equation} 方程, {iterations} 次迭代, 残差 {residual:.3e}")]
    SolverDiverged {
        /// 方程名（"k" 或 "omega"）
        equation: String,
        /// 已执行的迭代/子步数
        iterations: usize,
        /// 最终残差或失稳度量
        residual: f64,
    },

    /// 场长度不匹配
    #[error("场长度不匹配: {name} 期望 {expected} 个单元, 实际 {actual}")]
    SizeMismatch {
        /// 场名称
        name: String,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 无效的输入数据
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },
}

impl TrError {
    /// 创建配置错误
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    /// 创建无效输入错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建场长度不匹配错误
    pub fn size_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }
}
