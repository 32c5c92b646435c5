// crates/tr_closure/tests/closure_test.rs

//! 闭合模型集成测试
//!
//! 在连通网格上验证 `correct()` 端到端行为：
//! 衰减场景、粗糙壁面开关的局部性、极端初值下的正性保持。

use tr_closure::{
    ExplicitFvmSolver, MeshConnectivity, RansClosure, SstLowReModel, TransportSolver,
    VelocityGradient,
};
use tr_foundation::{Scalar, TrError};

const NU: Scalar = 1.5e-5;

/// 一维壁面算例：单元 i 的壁面距离 (i+0.5)·dx
fn wall_bounded_model(n: usize, dx: Scalar) -> SstLowReModel {
    let mut m = SstLowReModel::new(MeshConnectivity::line(n, dx), NU).unwrap();
    let y: Vec<Scalar> = (0..n).map(|i| (i as Scalar + 0.5) * dx).collect();
    m.set_wall_distance(&y).unwrap();
    m
}

#[test]
fn test_uniform_decay_scenario() {
    // 均匀流算例：k=0.01, ω=10, y=0.05, ν=1.5e-5, S=0
    // 产生项消失，k、ω 向下限单调衰减
    let mut m = SstLowReModel::new(MeshConnectivity::line(8, 0.01), NU).unwrap();
    m.set_k(&[0.01; 8]).unwrap();
    m.set_omega(&[10.0; 8]).unwrap();
    m.set_wall_distance(&[0.05; 8]).unwrap();

    let solver = ExplicitFvmSolver::default();
    let mut k_prev: Vec<Scalar> = m.k().to_vec();
    let mut w_prev: Vec<Scalar> = m.omega().to_vec();
    for _ in 0..100 {
        m.correct(&solver, 0.05).unwrap();
        for i in 0..8 {
            assert!(m.k()[i] <= k_prev[i] + 1e-15);
            assert!(m.omega()[i] <= w_prev[i] + 1e-15);
            assert!(m.k()[i] >= m.coeffs().k_min);
            assert!(m.omega()[i] >= m.coeffs().omega_min);
        }
        k_prev = m.k().to_vec();
        w_prev = m.omega().to_vec();
    }
}

#[test]
fn test_rough_wall_toggle_is_local_to_near_wall_layer() {
    // F3 开关只影响近壁层（y 在几个粘性单位内），远场 νt 不变
    let n = 32;
    // 粘性尺度 √(150ν/ω) ≈ 4.7e-4 m：最内单元落在层内，最外 1/4 远在层外
    let dx = 1e-3;
    let build = |f3: bool| -> Vec<Scalar> {
        let mut m = wall_bounded_model(n, dx);
        m.set_k(&[1e-4; 32]).unwrap();
        m.set_omega(&[1e4; 32]).unwrap();
        if f3 {
            m.read(&serde_json::json!({ "f3": true })).unwrap();
        }
        // 适度剪切使限制器起作用
        let g = VelocityGradient::new(0.0, 1e5, 0.0, 0.0);
        m.set_velocity_gradients(&[g; 32]).unwrap();
        m.correct_nut();
        m.nut().to_vec()
    };

    let smooth = build(false);
    let rough = build(true);

    // 近壁层内 νt 发生变化
    assert!(
        (rough[0] - smooth[0]).abs() > 1e-12 * smooth[0].abs().max(1e-30),
        "近壁 νt 应随 F3 改变: {} vs {}",
        rough[0],
        smooth[0]
    );
    // 远场（最外 1/4）保持一致到浮点容差
    for i in (3 * n / 4)..n {
        let rel = (rough[i] - smooth[i]).abs() / smooth[i].max(1e-30);
        assert!(rel < 1e-12, "单元 {i} 远场 νt 被 F3 改变: rel = {rel}");
    }
}

#[test]
fn test_f3_rough_wall_raises_near_wall_nut() {
    // F3 抑制限制器 → 近壁 νt 回到 k/ω，高于受限值
    let n = 16;
    let dx = 1e-3;
    let mut m = wall_bounded_model(n, dx);
    m.set_k(&[1e-4; 16]).unwrap();
    m.set_omega(&[1e4; 16]).unwrap();
    let g = VelocityGradient::new(0.0, 1e5, 0.0, 0.0);
    m.set_velocity_gradients(&[g; 16]).unwrap();

    m.correct_nut();
    let limited = m.nut()[0];

    m.read(&serde_json::json!({ "f3": true })).unwrap();
    m.correct_nut();
    let rough = m.nut()[0];

    assert!(rough >= limited, "粗糙壁面下近壁 νt 不应更小");
}

#[test]
fn test_positivity_under_repeated_correct_on_connected_mesh() {
    let mut m = wall_bounded_model(16, 0.01);
    // 极端不均匀初值
    let k: Vec<Scalar> = (0..16)
        .map(|i| if i % 2 == 0 { 1e-12 } else { 100.0 })
        .collect();
    let w: Vec<Scalar> = (0..16)
        .map(|i| if i % 3 == 0 { 1e-8 } else { 1e5 })
        .collect();
    m.set_k(&k).unwrap();
    m.set_omega(&w).unwrap();

    let solver = ExplicitFvmSolver {
        safety: 0.5,
        max_substeps: 100_000,
    };
    for _ in 0..20 {
        m.correct(&solver, 1e-4).unwrap();
        assert!(m.k().iter().all(|&v| v >= m.coeffs().k_min && v.is_finite()));
        assert!(m
            .omega()
            .iter()
            .all(|&v| v >= m.coeffs().omega_min && v.is_finite()));
        assert!(m.nut().iter().all(|&v| v >= 0.0 && v.is_finite()));
    }
}

#[test]
fn test_solver_divergence_surfaces_to_caller() {
    // 极细网格 + 大时间步：参考求解器子步预算耗尽，错误上报给调用方
    let mut m = wall_bounded_model(16, 1e-6);
    m.set_k(&[1.0; 16]).unwrap();
    m.set_omega(&[1.0; 16]).unwrap();
    let solver = ExplicitFvmSolver {
        safety: 0.5,
        max_substeps: 4,
    };
    let err = m.correct(&solver, 10.0).unwrap_err();
    match err {
        TrError::SolverDiverged { equation, .. } => {
            assert_eq!(equation, "omega"); // ω 方程先行
        }
        other => panic!("期望 SolverDiverged, 实际 {other:?}"),
    }
}

#[test]
fn test_polymorphic_use_through_trait() {
    // 外层求解器通过能力接口多态消费闭合模型
    let mut model: Box<dyn RansClosure> =
        Box::new(SstLowReModel::new(MeshConnectivity::line(4, 0.1), NU).unwrap());
    let solver: Box<dyn TransportSolver> = Box::new(ExplicitFvmSolver::default());

    assert_eq!(model.name(), "kOmegaSSTLowRe");
    model.correct(solver.as_ref(), 0.01).unwrap();

    let eps = model.epsilon();
    for i in 0..4 {
        let expect = 0.09 * model.k()[i] * model.omega()[i];
        assert!((eps[i] - expect).abs() < 1e-14);
    }
}

#[test]
fn test_read_roundtrip_changes_then_no_change() {
    let mut m = wall_bounded_model(4, 0.1);
    let dict = serde_json::json!({ "a1": 0.33, "c1": 8.0 });
    assert!(m.read(&dict).unwrap());
    // 同一配置再读：无变化
    assert!(!m.read(&dict).unwrap());
    assert!((m.coeffs().a1 - 0.33).abs() < 1e-12);
}
