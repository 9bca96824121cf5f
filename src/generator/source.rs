//! # 数据源与请求/响应模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示源图来源语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `GenerationRequest` / `GenerationOutcome` 是一次生成的完整输入与输出，
//!   核心在两次调用之间不保留任何状态

use std::path::PathBuf;

use crate::pixel_art::{PixelArt, ResampleStatus};
use crate::qr::{QrBitmap, QrRequest};

use super::GeneratorError;

/// 源图来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径。
    FilePath(PathBuf),
    /// 内存中的已编码图片字节。
    Bytes(Vec<u8>),
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 生成类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Text,
    Image,
}

impl GenerationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

/// 一次生成请求。
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    /// 直接编码文本。
    Text(String),
    /// 源图 → 像素画 → 二维码。
    PixelArt(ImageSource),
}

impl GenerationRequest {
    /// 从原始字节构造文本请求，字节必须是合法 UTF-8。
    pub fn text_from_bytes(bytes: Vec<u8>) -> Result<Self, GeneratorError> {
        let request = QrRequest::from_utf8(bytes)?;
        Ok(Self::Text(request.payload))
    }

    pub fn kind(&self) -> GenerationKind {
        match self {
            Self::Text(_) => GenerationKind::Text,
            Self::PixelArt(_) => GenerationKind::Image,
        }
    }
}

/// 一次成功生成的结果。
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub kind: GenerationKind,
    pub bitmap: QrBitmap,
    /// 图片请求的像素画（文本请求为 `None`）。
    pub pixel_art: Option<PixelArt>,
    /// 图片请求的降采样状态。
    pub resample_status: Option<ResampleStatus>,
}

impl GenerationOutcome {
    /// 降采样是否走了回退路径（调用方可据此提示用户）。
    pub fn is_degraded(&self) -> bool {
        self.resample_status
            .as_ref()
            .is_some_and(ResampleStatus::is_fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_from_bytes_validates_utf8() {
        let request = GenerationRequest::text_from_bytes("héllo".as_bytes().to_vec())
            .expect("valid utf-8 should parse");
        assert!(matches!(request, GenerationRequest::Text(ref text) if text == "héllo"));
        assert_eq!(request.kind(), GenerationKind::Text);

        let invalid = GenerationRequest::text_from_bytes(vec![0xc3, 0x28]);
        assert!(matches!(invalid, Err(GeneratorError::Encoding(_))));
    }

    #[test]
    fn pixel_art_request_reports_image_kind() {
        let request = GenerationRequest::PixelArt(ImageSource::Bytes(Vec::new()));
        assert_eq!(request.kind(), GenerationKind::Image);
        assert_eq!(request.kind().as_str(), "image");
    }
}
