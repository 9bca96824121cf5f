//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（Base64 / 本地文件 / 内存字节）的原始字节加载，
//! 并在“尽可能早”的阶段执行输入校验，尽快失败，减少不必要的内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - Base64：格式解析 + 解码前体积预估 + 解码后体积限制。
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - 所有来源最终都经过文件签名（magic bytes）校验。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::source::{ImageSource, RawImageData};
use super::{GeneratorConfig, GeneratorError, GeneratorHandler};

impl GeneratorHandler {
    /// 按来源加载原始字节。
    pub(super) fn load_source(
        &self,
        source: ImageSource,
        config: &GeneratorConfig,
    ) -> Result<RawImageData, GeneratorError> {
        match source {
            ImageSource::Base64(data) => self.load_from_base64(&data, config),
            ImageSource::FilePath(path) => self.load_from_file(&path, config),
            ImageSource::Bytes(bytes) => self.load_from_bytes(bytes, config),
        }
    }

    /// 从 Base64 字符串加载图片原始字节。
    pub(super) fn load_from_base64(
        &self,
        data: &str,
        config: &GeneratorConfig,
    ) -> Result<RawImageData, GeneratorError> {
        log::info!("📝 开始处理 base64 图片");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;

        if bytes.len() as u64 > config.max_file_size {
            return Err(Self::file_too_large("Base64 解码后体积过大", bytes.len() as u64, config));
        }
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "base64",
        })
    }

    /// 从本地路径加载图片原始字节。
    pub(super) fn load_from_file(
        &self,
        path: &Path,
        config: &GeneratorConfig,
    ) -> Result<RawImageData, GeneratorError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(GeneratorError::FileSystem(format!("文件不存在：{}", path.display())));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| GeneratorError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(Self::file_too_large("文件过大", metadata.len(), config));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| GeneratorError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "file",
        })
    }

    /// 直接使用内存中的已编码字节。
    pub(super) fn load_from_bytes(
        &self,
        bytes: Vec<u8>,
        config: &GeneratorConfig,
    ) -> Result<RawImageData, GeneratorError> {
        if bytes.len() as u64 > config.max_file_size {
            return Err(Self::file_too_large("图片数据过大", bytes.len() as u64, config));
        }
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: "memory",
        })
    }

    fn file_too_large(label: &str, size: u64, config: &GeneratorConfig) -> GeneratorError {
        GeneratorError::ResourceLimit(format!(
            "{}：{:.2} MB（限制：{:.2} MB）",
            label,
            size as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        ))
    }

    fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, GeneratorError> {
        let len = base64_data.trim().len() as u64;
        let groups = len
            .checked_add(3)
            .ok_or_else(|| GeneratorError::ResourceLimit("Base64 输入长度溢出".to_string()))?
            / 4;

        groups
            .checked_mul(3)
            .ok_or_else(|| GeneratorError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
    }

    /// 解析 Base64 输入（支持 Data URL / 纯 Base64），解码前先按体积上限拒绝。
    fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, GeneratorError> {
        let normalized = data.trim();

        let base64_data = if normalized.starts_with("data:image/") {
            let base64_start = normalized
                .find(";base64,")
                .ok_or_else(|| GeneratorError::InvalidFormat("缺少 base64 标记".to_string()))?;
            &normalized[base64_start + 8..]
        } else {
            normalized
        };

        let estimated_len = Self::estimate_base64_decoded_upper_bound_len(base64_data)?;
        if estimated_len > max_file_size {
            return Err(GeneratorError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(base64_data)
            .map_err(|e| GeneratorError::Decode(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), GeneratorError> {
        if bytes.is_empty() {
            return Err(GeneratorError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| GeneratorError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(GeneratorError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255])));
        let mut cursor = Cursor::new(Vec::new());
        image
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn handler() -> GeneratorHandler {
        GeneratorHandler::new(GeneratorConfig::default()).expect("handler init failed")
    }

    #[test]
    fn load_from_base64_rejects_non_image_payload() {
        let result = handler().load_from_base64("SGVsbG8=", &GeneratorConfig::default());

        assert!(matches!(result, Err(GeneratorError::InvalidFormat(_))));
    }

    #[test]
    fn load_from_base64_accepts_data_url() {
        let encoded = general_purpose::STANDARD.encode(png_bytes());
        let data_url = format!("data:image/png;base64,{}", encoded);

        let raw = handler()
            .load_from_base64(&data_url, &GeneratorConfig::default())
            .expect("data url should load");

        assert_eq!(raw.source_hint, "base64");
        assert_eq!(raw.bytes, png_bytes());
    }

    #[test]
    fn data_url_without_marker_is_rejected() {
        let result = GeneratorHandler::parse_base64_with_limit("data:image/png,AAAA", u64::MAX);

        assert!(matches!(result, Err(GeneratorError::InvalidFormat(_))));
    }

    #[test]
    fn parse_base64_with_limit_rejects_large_payload_before_decode() {
        let huge = "A".repeat(1024 * 1024);
        let result = GeneratorHandler::parse_base64_with_limit(&huge, 32);

        assert!(matches!(result, Err(GeneratorError::ResourceLimit(_))));
    }

    #[test]
    fn load_from_file_reports_missing_file() {
        let result = handler().load_from_file(
            Path::new("/definitely/not/here.png"),
            &GeneratorConfig::default(),
        );

        assert!(matches!(result, Err(GeneratorError::FileSystem(_))));
    }

    #[test]
    fn load_from_file_reads_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("red.png");
        std::fs::write(&path, png_bytes()).expect("write png");

        let raw = handler()
            .load_from_file(&path, &GeneratorConfig::default())
            .expect("file should load");

        assert_eq!(raw.source_hint, "file");
        assert_eq!(raw.bytes.len(), png_bytes().len());
    }

    #[test]
    fn load_from_bytes_enforces_size_limit() {
        let mut config = GeneratorConfig::default();
        config.max_file_size = 16;

        let result = handler().load_from_bytes(png_bytes(), &config);

        assert!(matches!(result, Err(GeneratorError::ResourceLimit(_))));
    }

    #[test]
    fn signature_check_rejects_empty_and_text() {
        assert!(matches!(
            GeneratorHandler::validate_image_signature(&[]),
            Err(GeneratorError::InvalidFormat(_))
        ));
        assert!(matches!(
            GeneratorHandler::validate_image_signature(b"plain text"),
            Err(GeneratorError::InvalidFormat(_))
        ));
        GeneratorHandler::validate_image_signature(&png_bytes()).expect("png signature");
    }
}
