// ==========================================
// 风险测试选择系统 - 依赖矩阵
// ==========================================
// 语义: m[i][k] = true 表示"选中 i 时必须同时选中 k"
// 闭包后 m[i][i] 恒为 true
// ==========================================

use std::fmt;

// ==========================================
// DependencyMatrix - n×n 布尔依赖矩阵
// ==========================================
#[derive(Clone, PartialEq, Eq)]
pub struct DependencyMatrix {
    size: usize,
    cells: Vec<bool>, // 行优先存储
}

impl DependencyMatrix {
    /// 创建全 false 的 n×n 矩阵
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        self.cells[row * self.size + col] = value;
    }

    /// 行 i 中为 true 的列（i 依赖的全部用例，含自身）
    pub fn dependencies_of(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        let start = row * self.size;
        self.cells[start..start + self.size]
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v)
            .map(|(col, _)| col)
    }

    /// 列 k 中为 true 的行（依赖 k 的全部用例，含自身）
    pub fn dependents_of(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |&row| self.get(row, col))
    }

    /// 整列清零（该用例已提交，不再被计入其他用例的依赖）
    pub fn clear_column(&mut self, col: usize) {
        for row in 0..self.size {
            self.set(row, col, false);
        }
    }

    /// 就地计算自反传递闭包（Warshall）
    ///
    /// 对每个中间节点 k、每对 (i, j):
    /// m[i][j] = m[i][j] || (m[i][k] && m[k][j])
    ///
    /// 复杂度 O(n³)；自反性由调用方置位对角线保证
    pub fn close(&mut self) {
        let n = self.size;
        for k in 0..n {
            for i in 0..n {
                if !self.get(i, k) {
                    continue;
                }
                for j in 0..n {
                    if self.get(k, j) {
                        self.set(i, j, true);
                    }
                }
            }
        }
    }
}

impl fmt::Debug for DependencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DependencyMatrix({}x{})", self.size, self.size)?;
        for row in 0..self.size {
            let line: String = (0..self.size)
                .map(|col| if self.get(row, col) { '1' } else { '0' })
                .collect();
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}
