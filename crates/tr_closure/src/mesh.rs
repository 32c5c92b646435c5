// crates/tr_closure/src/mesh.rs

//! 网格连接适配层
//!
//! 闭合模型不拥有网格，只消费网格协作方注入的最小几何信息：
//! 单元面积、面连接（邻居、面长、心距、单位法向）与壁面距离。
//!
//! 梯度使用 Green-Gauss 面差分形式：
//! ```text
//! ∇φ_i ≈ (1/A_i) Σ_f 0.5·(φ_j - φ_i)·n̂_f·L_f
//! ```
//! 缺失的边界面等价于零梯度边界（φ_f = φ_i 的面贡献为零）。

use glam::DVec2;
use rayon::prelude::*;
use tr_foundation::{Scalar, TrError, TrResult};

/// 单元间的一个面连接
#[derive(Debug, Clone, Copy)]
pub struct FaceLink {
    /// 邻居单元索引
    pub neighbor: usize,
    /// 面长度 [m]
    pub face_length: Scalar,
    /// 单元心距离 [m]
    pub center_distance: Scalar,
    /// 从本单元指向邻居的单位法向
    pub normal: DVec2,
}

/// 网格连接信息（闭合模型消费的只读几何）
#[derive(Debug, Clone)]
pub struct MeshConnectivity {
    cell_areas: Vec<Scalar>,
    links: Vec<Vec<FaceLink>>,
}

impl MeshConnectivity {
    /// 从单元面积和面连接构造，校验索引与几何量
    pub fn new(cell_areas: Vec<Scalar>, links: Vec<Vec<FaceLink>>) -> TrResult<Self> {
        let n = cell_areas.len();
        if links.len() != n {
            return Err(TrError::size_mismatch("links", n, links.len()));
        }
        for (i, area) in cell_areas.iter().enumerate() {
            if !(*area > 0.0) {
                return Err(TrError::invalid_input(format!(
                    "单元 {i} 面积非正: {area}"
                )));
            }
        }
        for (i, cell_links) in links.iter().enumerate() {
            for link in cell_links {
                if link.neighbor >= n {
                    return Err(TrError::invalid_input(format!(
                        "单元 {i} 的邻居索引越界: {}",
                        link.neighbor
                    )));
                }
                if !(link.center_distance > 0.0) || !(link.face_length > 0.0) {
                    return Err(TrError::invalid_input(format!(
                        "单元 {i} 的面几何非正 (L={}, d={})",
                        link.face_length, link.center_distance
                    )));
                }
            }
        }
        Ok(Self { cell_areas, links })
    }

    /// 无连接网格（单位面积孤立单元，用于纯局部公式测试）
    pub fn uniform(n_cells: usize) -> Self {
        Self {
            cell_areas: vec![1.0; n_cells],
            links: vec![Vec::new(); n_cells],
        }
    }

    /// 一维链式网格：n 个间距 dx 的单元（单位宽度）
    pub fn line(n_cells: usize, dx: Scalar) -> Self {
        let mut links = vec![Vec::new(); n_cells];
        for i in 0..n_cells {
            if i > 0 {
                links[i].push(FaceLink {
                    neighbor: i - 1,
                    face_length: 1.0,
                    center_distance: dx,
                    normal: -DVec2::X,
                });
            }
            if i + 1 < n_cells {
                links[i].push(FaceLink {
                    neighbor: i + 1,
                    face_length: 1.0,
                    center_distance: dx,
                    normal: DVec2::X,
                });
            }
        }
        Self {
            cell_areas: vec![dx; n_cells],
            links,
        }
    }

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cell_areas.len()
    }

    /// 单元面积
    #[inline]
    pub fn cell_areas(&self) -> &[Scalar] {
        &self.cell_areas
    }

    /// 单元的面连接
    #[inline]
    pub fn links_of(&self, cell: usize) -> &[FaceLink] {
        &self.links[cell]
    }

    /// Green-Gauss 标量梯度（逐单元并行，零梯度边界）
    pub fn grad_scalar_into(&self, phi: &[Scalar], out: &mut [DVec2]) {
        out.par_iter_mut().enumerate().for_each(|(i, g)| {
            let mut sum = DVec2::ZERO;
            let phi_i = phi[i] as f64;
            for link in &self.links[i] {
                let phi_j = phi[link.neighbor] as f64;
                sum += 0.5 * (phi_j - phi_i) * (link.face_length as f64) * link.normal;
            }
            *g = sum / (self.cell_areas[i] as f64);
        });
    }

    /// 两个梯度场的逐单元点积
    pub fn grad_dot_into(&self, ga: &[DVec2], gb: &[DVec2], out: &mut [Scalar]) {
        out.par_iter_mut().enumerate().for_each(|(i, v)| {
            *v = ga[i].dot(gb[i]) as Scalar;
        });
    }
}
