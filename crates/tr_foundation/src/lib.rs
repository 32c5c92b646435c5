// crates/tr_foundation/src/lib.rs

//! TurbRANS Foundation Layer
//!
//! 零领域知识基础层，为湍流闭合求解提供基础抽象。
//!
//! # 模块概览
//!
//! - [`scalar`]: 统一标量类型（feature 控制精度）
//! - [`field`]: 缓存行对齐的单元场缓冲，带 rayon 并行迭代
//! - [`error`]: 统一错误类型
//! - [`tolerance`]: 数值下限常量
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde、thiserror、rayon、bytemuck
//! 2. **数据并行友好**: 场缓冲按 64 字节对齐，逐单元循环无跨单元依赖
//! 3. **无全局状态**: 所有容差通过参数注入

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod field;
pub mod scalar;
pub mod tolerance;

pub use error::{TrError, TrResult};
pub use field::FieldBuf;
pub use scalar::Scalar;
pub use tolerance::{SMALL, VSMALL};
