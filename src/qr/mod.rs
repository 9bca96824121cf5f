//! # 二维码模块（qr）
//!
//! - `symbol`：符号编码契约 `SymbolEncoder` 与默认 `qrcode` 实现
//! - `bitmap`：最近邻放大后的单色位图
//! - `pipeline`：文本 → 位图的固定参数流水线

mod bitmap;
mod pipeline;
mod symbol;

pub use bitmap::{DARK, LIGHT, QrBitmap};
pub use pipeline::{
    DEFAULT_QUIET_ZONE, QR_CORRECTION_LEVEL, QR_MODULE_SCALE, QrPayloadPipeline, QrRequest,
};
pub use symbol::{CorrectionLevel, QrCodeEncoder, SymbolEncoder, SymbolMatrix};
