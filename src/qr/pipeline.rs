//! # 二维码载荷流水线
//!
//! ## 设计思路
//!
//! 输入为纯文本（用户输入或像素画载荷），输出为固定放大倍数的位图。
//! 纠错等级与放大倍数固定，不随请求变化；相同载荷必然得到逐字节相同的位图。
//!
//! ## 实现思路
//!
//! 1. 空载荷直接返回 `None`（不是错误）
//! 2. 以 UTF-8 字节交给 `SymbolEncoder`
//! 3. 最近邻放大 ×10 并加静区

use std::sync::Arc;
use std::time::Instant;

use super::bitmap::QrBitmap;
use super::symbol::{CorrectionLevel, QrCodeEncoder, SymbolEncoder};
use crate::generator::GeneratorError;

/// 固定纠错等级。
pub const QR_CORRECTION_LEVEL: CorrectionLevel = CorrectionLevel::Medium;
/// 固定模块放大倍数。
pub const QR_MODULE_SCALE: u32 = 10;
/// 默认静区宽度（模块数）。
pub const DEFAULT_QUIET_ZONE: u32 = 4;

/// 一次二维码生成请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
    pub payload: String,
    pub correction_level: CorrectionLevel,
    pub module_scale: u32,
}

impl QrRequest {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            correction_level: QR_CORRECTION_LEVEL,
            module_scale: QR_MODULE_SCALE,
        }
    }

    /// 从原始字节构造请求，字节必须是合法 UTF-8。
    pub fn from_utf8(bytes: Vec<u8>) -> Result<Self, GeneratorError> {
        let payload = String::from_utf8(bytes)
            .map_err(|e| GeneratorError::Encoding(format!("文本不是合法的 UTF-8：{}", e)))?;
        Ok(Self::new(payload))
    }
}

/// 二维码载荷流水线。
#[derive(Clone)]
pub struct QrPayloadPipeline {
    encoder: Arc<dyn SymbolEncoder>,
    quiet_zone: u32,
}

impl Default for QrPayloadPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_ZONE)
    }
}

impl QrPayloadPipeline {
    pub fn new(quiet_zone: u32) -> Self {
        Self::with_encoder(Arc::new(QrCodeEncoder), quiet_zone)
    }

    /// 注入自定义符号编码器（测试或替换实现）。
    pub fn with_encoder(encoder: Arc<dyn SymbolEncoder>, quiet_zone: u32) -> Self {
        Self { encoder, quiet_zone }
    }

    /// 为文本生成二维码，空文本返回 `None`。
    pub fn generate(&self, payload: &str) -> Result<Option<QrBitmap>, GeneratorError> {
        self.render(&QrRequest::new(payload))
    }

    /// 为原始字节生成二维码，先做 UTF-8 校验。
    pub fn generate_from_bytes(&self, bytes: &[u8]) -> Result<Option<QrBitmap>, GeneratorError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        self.render(&QrRequest::from_utf8(bytes.to_vec())?)
    }

    /// 执行一次请求。
    pub fn render(&self, request: &QrRequest) -> Result<Option<QrBitmap>, GeneratorError> {
        if request.payload.is_empty() {
            log::info!("ℹ️ 载荷为空，跳过二维码生成");
            return Ok(None);
        }

        let start = Instant::now();
        let matrix = self
            .encoder
            .encode(request.payload.as_bytes(), request.correction_level)?;
        let bitmap = QrBitmap::rasterize(&matrix, request.module_scale, self.quiet_zone);

        log::info!(
            "✅ 二维码生成完成 - 载荷: {} 字节 模块: {}x{} 位图: {}x{} 耗时: {}ms",
            request.payload.len(),
            matrix.width(),
            matrix.width(),
            bitmap.width(),
            bitmap.height(),
            start.elapsed().as_millis()
        );

        Ok(Some(bitmap))
    }
}
