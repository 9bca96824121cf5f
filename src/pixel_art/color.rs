//! # 颜色采样与调色板符号
//!
//! ## 设计思路
//!
//! - `ColorSample`：归一化到 `[0, 1]` 的 RGBA 四通道（直通 alpha，非预乘）
//! - `Symbol`：固定调色板中的一个 emoji 方块
//! - 网格尺寸固定为 `GRID_SIZE`，用定长数组在类型层面保证 N×N

/// 像素画网格边长（固定 15×15）。
pub const GRID_SIZE: usize = 15;

/// 颜色网格，行优先，第 0 行在最上方。
pub type ColorGrid = [[ColorSample; GRID_SIZE]; GRID_SIZE];

/// 符号网格，与 `ColorGrid` 一一对应。
pub type SymbolGrid = [[Symbol; GRID_SIZE]; GRID_SIZE];

/// 单个像素的颜色采样。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl ColorSample {
    /// 完全透明（信箱留白区域使用）。
    pub const TRANSPARENT: Self = Self {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
    };

    /// 构造采样并将各通道钳制到 `[0, 1]`，`NaN` 视为 0。
    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red: normalize_channel(red),
            green: normalize_channel(green),
            blue: normalize_channel(blue),
            alpha: normalize_channel(alpha),
        }
    }

    /// 从 8 位 RGBA 像素构造。
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            red: rgba[0] as f32 / 255.0,
            green: rgba[1] as f32 / 255.0,
            blue: rgba[2] as f32 / 255.0,
            alpha: rgba[3] as f32 / 255.0,
        }
    }
}

fn normalize_channel(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// 调色板符号。
///
/// `White` 同时是透明像素与未匹配颜色的默认符号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    #[default]
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Brown,
    Black,
}

impl Symbol {
    pub const ALL: [Symbol; 9] = [
        Symbol::White,
        Symbol::Red,
        Symbol::Orange,
        Symbol::Yellow,
        Symbol::Green,
        Symbol::Blue,
        Symbol::Purple,
        Symbol::Brown,
        Symbol::Black,
    ];

    /// 输出到文本载荷中的 emoji 字形。
    ///
    /// 白色与黑色方块带 U+FE0F 变体选择符，保持与既有输出逐字节一致。
    pub fn glyph(self) -> &'static str {
        match self {
            Self::White => "\u{2B1C}\u{FE0F}",
            Self::Red => "\u{1F7E5}",
            Self::Orange => "\u{1F7E7}",
            Self::Yellow => "\u{1F7E8}",
            Self::Green => "\u{1F7E9}",
            Self::Blue => "\u{1F7E6}",
            Self::Purple => "\u{1F7EA}",
            Self::Brown => "\u{1F7EB}",
            Self::Black => "\u{2B1B}\u{FE0F}",
        }
    }

    /// 稳定名称，用于日志与诊断。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Brown => "brown",
            Self::Black => "black",
        }
    }

    /// 从文本开头识别一个字形，返回符号与其占用的字节数。
    ///
    /// 扫码器或剪贴板可能丢掉变体选择符，因此也接受不带 U+FE0F 的方块。
    pub fn from_glyph_prefix(text: &str) -> Option<(Symbol, usize)> {
        for symbol in Self::ALL {
            let glyph = symbol.glyph();
            if text.starts_with(glyph) {
                return Some((symbol, glyph.len()));
            }
        }

        let first = text.chars().next()?;
        match first {
            '\u{2B1C}' => Some((Self::White, first.len_utf8())),
            '\u{2B1B}' => Some((Self::Black, first.len_utf8())),
            _ => None,
        }
    }
}
