//! # 解码模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素上限与内存上限快速拒绝
//! 3. 完整解码，并对实际尺寸再校验一次

use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use super::source::RawImageData;
use super::{GeneratorConfig, GeneratorError, GeneratorHandler};

impl GeneratorHandler {
    /// 将原始字节解码为图像。
    pub(super) fn decode_source_image(
        &self,
        raw: RawImageData,
        config: &GeneratorConfig,
    ) -> Result<DynamicImage, GeneratorError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| GeneratorError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        Self::validate_pixel_limits(config, width, height)?;
        Self::validate_decoded_memory_limits(config, width, height)?;

        log::info!(
            "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            width,
            height
        );

        Ok(decoded)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), GeneratorError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| GeneratorError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| GeneratorError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(
        config: &GeneratorConfig,
        width: u32,
        height: u32,
    ) -> Result<(), GeneratorError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| GeneratorError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(GeneratorError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &GeneratorConfig,
        width: u32,
        height: u32,
    ) -> Result<(), GeneratorError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| GeneratorError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(GeneratorError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}
