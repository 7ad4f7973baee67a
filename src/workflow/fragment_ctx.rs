//! 片段处理上下文
//!
//! 封装"我正在处理这一批中的第几题"这一信息

use std::fmt::Display;

/// 片段处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentCtx {
    /// 片段在批量文本中的位置（从1开始）
    pub index: usize,

    /// 片段总数
    pub total: usize,
}

impl FragmentCtx {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

impl Display for FragmentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[题目 {}/{}]", self.index, self.total)
    }
}
