//! # 颜色分类模块
//!
//! ## 设计思路
//!
//! 调色板判定是一张按优先级排列的规则表，逐条匹配、首个命中即返回。
//! 各类别在色相边界上互相重叠，因此规则顺序本身就是语义的一部分。
//!
//! ## 实现思路
//!
//! - `PALETTE_RULES` 为 `(谓词, 符号)` 列表，可单独测试每条规则
//! - 全部未命中时落到 `DEFAULT_SYMBOL`，保证对任意 RGBA 输入都有结果
//!
//! 注意：黄色规则被橙色规则完全覆盖（满足 `g > 0.7` 必然满足 `g > 0.5`），
//! 实际上永远不会命中。保留原有顺序以维持输出兼容。
//!
//! 采样为直通 alpha：alpha ≥ 0.5 的半透明像素按自身颜色分类，
//! 不先与黑色预乘。例如 alpha = 0.6 的纯红仍判为红色，
//! 预乘后的 (0.6, 0, 0) 则会落到白色。

use super::color::{ColorGrid, ColorSample, GRID_SIZE, Symbol, SymbolGrid};

/// 未命中任何规则时使用的符号。
pub const DEFAULT_SYMBOL: Symbol = Symbol::White;

/// 单条调色板规则。
#[derive(Clone, Copy)]
pub struct PaletteRule {
    /// 规则名称（日志与测试使用）。
    pub name: &'static str,
    pub symbol: Symbol,
    pub matches: fn(&ColorSample) -> bool,
}

impl std::fmt::Debug for PaletteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteRule")
            .field("name", &self.name)
            .field("symbol", &self.symbol)
            .finish()
    }
}

fn is_transparent(c: &ColorSample) -> bool {
    c.alpha < 0.5
}

fn is_red(c: &ColorSample) -> bool {
    c.red > 0.7 && c.green < 0.3 && c.blue < 0.3
}

fn is_orange(c: &ColorSample) -> bool {
    c.red > 0.7 && c.green > 0.5 && c.blue < 0.3
}

fn is_yellow(c: &ColorSample) -> bool {
    c.red > 0.7 && c.green > 0.7 && c.blue < 0.3
}

fn is_green(c: &ColorSample) -> bool {
    c.red < 0.3 && c.green > 0.6 && c.blue < 0.3
}

fn is_blue(c: &ColorSample) -> bool {
    c.red < 0.3 && c.green < 0.3 && c.blue > 0.6
}

fn is_purple(c: &ColorSample) -> bool {
    c.red > 0.5 && c.green < 0.3 && c.blue > 0.5
}

fn is_brown(c: &ColorSample) -> bool {
    c.red > 0.5 && c.green > 0.3 && c.blue < 0.3
}

fn is_black(c: &ColorSample) -> bool {
    c.red < 0.2 && c.green < 0.2 && c.blue < 0.2
}

/// 按优先级排列的调色板规则。
pub const PALETTE_RULES: [PaletteRule; 9] = [
    PaletteRule { name: "transparent", symbol: Symbol::White, matches: is_transparent },
    PaletteRule { name: "red", symbol: Symbol::Red, matches: is_red },
    PaletteRule { name: "orange", symbol: Symbol::Orange, matches: is_orange },
    PaletteRule { name: "yellow", symbol: Symbol::Yellow, matches: is_yellow },
    PaletteRule { name: "green", symbol: Symbol::Green, matches: is_green },
    PaletteRule { name: "blue", symbol: Symbol::Blue, matches: is_blue },
    PaletteRule { name: "purple", symbol: Symbol::Purple, matches: is_purple },
    PaletteRule { name: "brown", symbol: Symbol::Brown, matches: is_brown },
    PaletteRule { name: "black", symbol: Symbol::Black, matches: is_black },
];

/// 将单个颜色采样映射为调色板符号。
pub fn classify(sample: &ColorSample) -> Symbol {
    PALETTE_RULES
        .iter()
        .find(|rule| (rule.matches)(sample))
        .map(|rule| rule.symbol)
        .unwrap_or(DEFAULT_SYMBOL)
}

/// 对整张网格逐格分类。
pub fn classify_grid(grid: &ColorGrid) -> SymbolGrid {
    let mut symbols = [[DEFAULT_SYMBOL; GRID_SIZE]; GRID_SIZE];
    for (row, samples) in symbols.iter_mut().zip(grid.iter()) {
        for (symbol, sample) in row.iter_mut().zip(samples.iter()) {
            *symbol = classify(sample);
        }
    }
    symbols
}
