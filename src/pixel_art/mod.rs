//! # 像素画模块（pixel_art）
//!
//! ## 设计思路
//!
//! 把“源图 → 颜色网格 → 符号网格 → 文本载荷”拆成三个纯函数式阶段，
//! 每个阶段都不持有状态，可单独测试：
//!
//! - `resampler`：等比缩放 + 信箱留白，输出 15×15 颜色网格
//! - `classifier`：按优先级规则表把颜色映射为 emoji 符号
//! - `encoder`：符号网格与多行文本载荷的互相转换
//!
//! ```text
//! DynamicImage
//!    ↓ ImageResampler::resample
//! ColorGrid + ResampleStatus
//!    ↓ classify_grid
//! SymbolGrid
//!    ↓ encode
//! String（二维码载荷）
//! ```

pub mod classifier;
mod color;
pub mod encoder;
pub mod resampler;

pub use classifier::{DEFAULT_SYMBOL, PALETTE_RULES, PaletteRule, classify, classify_grid};
pub use color::{ColorGrid, ColorSample, GRID_SIZE, Symbol, SymbolGrid};
pub use encoder::{PixelArt, encode, parse};
pub use resampler::{ImageResampler, ResampleFilter, ResampleStatus, Resampled, fit_rect};

use image::DynamicImage;

/// 一次完成“降采样 → 分类 → 编码”。
pub fn render_pixel_art(resampler: &ImageResampler, image: &DynamicImage) -> (PixelArt, ResampleStatus) {
    let Resampled { grid, status } = resampler.resample(image);
    let symbols = classify_grid(&grid);
    (PixelArt::from_symbols(symbols), status)
}
