use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

/// 未知符号的兜底颜色
pub const DEFAULT_SEGMENT_COLOR: Rgb = [255, 99, 132];

/// 资金曲线上的一个点。ticket指向产生该资金增量的已平仓交易，
/// 仅序列起始的合成点为None
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalPoint {
    pub timestamp_ms: i64,
    pub capital: f64,
    pub ticket: Option<i64>,
}

/// 按符号切分的曲线段，带展示颜色。
/// 相邻段共享边界点，图上不留缺口
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalSegment {
    pub symbol: String,
    pub color: Rgb,
    pub points: Vec<CapitalPoint>,
}

/// 资金演化曲线。派生数据，每次重建全量重算，从不落盘
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalCurve {
    pub segments: Vec<CapitalSegment>,
    pub final_capital: f64,
}

/// 符号->RGB颜色查找表，正常从静态资源加载。
/// 查不到的符号回退默认色，查表失败绝不中断曲线构建
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolColors(pub HashMap<String, Rgb>);

/// 静态资源加载失败时的内置颜色表（与资源文件的头部条目一致）
static FALLBACK_COLOR_TABLE: Lazy<HashMap<String, Rgb>> = Lazy::new(|| {
    let entries: [(&str, Rgb); 9] = [
        (".DE40Cash", [225, 83, 222]),
        (".JP225Cash", [12, 195, 203]),
        (".US30Cash", [91, 32, 33]),
        (".US500Cash", [31, 82, 161]),
        (".USTECHCash", [174, 137, 37]),
        ("AUDCAD", [55, 1, 144]),
        ("AUDCHF", [79, 65, 142]),
        ("AUDJPY", [43, 247, 25]),
        ("AUDNZD", [213, 41, 196]),
    ];
    entries
        .iter()
        .map(|(symbol, color)| (symbol.to_string(), *color))
        .collect()
});

impl SymbolColors {
    pub fn fallback() -> Self {
        SymbolColors(FALLBACK_COLOR_TABLE.clone())
    }

    pub fn color_for(&self, symbol: &str) -> Rgb {
        self.0.get(symbol).copied().unwrap_or(DEFAULT_SEGMENT_COLOR)
    }
}
