// crates/td_mesh/src/topology.rs

//! 面邻接拓扑存储
//!
//! 提供 CSR (Compressed Sparse Row) 格式的面-面邻接存储。
//! 三角形表面网格中每个面有 0~3 个共边邻居，行长度不定，
//! CSR 布局内存紧凑且缓存友好，适合追踪热循环中的只读迭代。

use serde::{Deserialize, Serialize};

/// CSR 格式面邻接
///
/// `offsets[i]..offsets[i+1]` 划出第 i 个面的邻居索引范围。
/// 不变量：邻接对称，若 B 在 A 的行中，则 A 也在 B 的行中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrAdjacency {
    /// 行偏移数组，长度 = n_faces + 1
    offsets: Vec<u32>,
    /// 邻居面索引数组
    indices: Vec<u32>,
}

impl Default for CsrAdjacency {
    fn default() -> Self {
        Self::empty()
    }
}

impl CsrAdjacency {
    /// 创建空邻接（0 个面）
    pub fn empty() -> Self {
        Self {
            offsets: vec![0],
            indices: Vec::new(),
        }
    }

    /// 从每个面的邻居列表构建
    pub fn from_rows(rows: &[Vec<u32>]) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();

        offsets.push(0);
        for row in rows {
            indices.extend_from_slice(row);
            offsets.push(indices.len() as u32);
        }

        Self { offsets, indices }
    }

    /// 获取第 face 个面的邻居切片
    #[inline]
    pub fn neighbors(&self, face: usize) -> &[u32] {
        let start = self.offsets[face] as usize;
        let end = self.offsets[face + 1] as usize;
        &self.indices[start..end]
    }

    /// 面数量
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// 邻接关系总数
    #[inline]
    pub fn n_links(&self) -> usize {
        self.indices.len()
    }

    /// 第 face 个面的邻居个数
    #[inline]
    pub fn degree(&self, face: usize) -> usize {
        (self.offsets[face + 1] - self.offsets[face]) as usize
    }

    /// 判断两个面是否相邻
    #[inline]
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&(b as u32))
    }

    /// 迭代所有面的邻居行
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.n_faces()).map(move |i| self.neighbors(i))
    }

    /// 验证对称性
    pub fn validate_symmetry(&self) -> Result<(), String> {
        for face in 0..self.n_faces() {
            for &nb in self.neighbors(face) {
                if nb as usize >= self.n_faces() {
                    return Err(format!("面 {} 的邻居 {} 越界", face, nb));
                }
                if !self.are_adjacent(nb as usize, face) {
                    return Err(format!("邻接不对称: {} -> {} 但反向缺失", face, nb));
                }
            }
        }
        Ok(())
    }
}
