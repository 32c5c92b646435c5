// crates/tr_foundation/src/scalar.rs

//! 统一标量类型系统
//!
//! 通过 feature 控制精度，为 GPU 和混合精度预留接口。
//!
//! # Feature 控制
//!
//! - 默认: `Scalar = f64`
//! - `gpu-f32` feature: `Scalar = f32`

/// 计算用标量类型（默认 f64，启用 gpu-f32 feature 时为 f32）
#[cfg(not(feature = "gpu-f32"))]
pub type Scalar = f64;

/// 计算用标量类型（默认 f64，启用 gpu-f32 feature 时为 f32）
#[cfg(feature = "gpu-f32")]
pub type Scalar = f32;
