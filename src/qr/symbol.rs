//! # 二维码符号编码服务
//!
//! ## 设计思路
//!
//! 二维码符号编码视为黑盒服务，核心只依赖 `SymbolEncoder` 契约：
//! 给定任意字节与纠错等级，返回能容纳载荷的最小版本符号矩阵，超出容量则失败。
//! 默认实现基于 `qrcode` crate，测试可以注入桩实现。

use std::str::FromStr;

use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::generator::GeneratorError;

/// 纠错等级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionLevel {
    /// 约 7% 可恢复。
    Low,
    /// 约 15% 可恢复。
    Medium,
    /// 约 25% 可恢复。
    Quartile,
    /// 约 30% 可恢复。
    High,
}

impl CorrectionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        }
    }

    fn to_ec_level(self) -> EcLevel {
        match self {
            Self::Low => EcLevel::L,
            Self::Medium => EcLevel::M,
            Self::Quartile => EcLevel::Q,
            Self::High => EcLevel::H,
        }
    }
}

impl FromStr for CorrectionLevel {
    type Err = GeneratorError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::Low),
            "M" => Ok(Self::Medium),
            "Q" => Ok(Self::Quartile),
            "H" => Ok(Self::High),
            other => Err(GeneratorError::QrGeneration(format!(
                "未知纠错等级：{}（可选：L / M / Q / H）",
                other
            ))),
        }
    }
}

/// 二维码符号矩阵（放大前），`true` 表示深色模块。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl SymbolMatrix {
    /// 由行优先的模块数组构造，长度必须为 `width * width`。
    pub fn new(width: usize, modules: Vec<bool>) -> Result<Self, GeneratorError> {
        let expected = width
            .checked_mul(width)
            .ok_or_else(|| GeneratorError::QrGeneration("符号矩阵尺寸溢出".to_string()))?;

        if width == 0 || modules.len() != expected {
            return Err(GeneratorError::QrGeneration(format!(
                "符号矩阵数据长度异常：{}（应为 {}）",
                modules.len(),
                expected
            )));
        }

        Ok(Self { width, modules })
    }

    /// 每边模块数。
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }
}

/// 二维码符号编码契约。
pub trait SymbolEncoder: Send + Sync {
    fn encode(&self, bytes: &[u8], level: CorrectionLevel) -> Result<SymbolMatrix, GeneratorError>;
}

/// 基于 `qrcode` crate 的默认编码器。
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEncoder;

impl SymbolEncoder for QrCodeEncoder {
    fn encode(&self, bytes: &[u8], level: CorrectionLevel) -> Result<SymbolMatrix, GeneratorError> {
        let code = QrCode::with_error_correction_level(bytes, level.to_ec_level()).map_err(|e| {
            GeneratorError::QrGeneration(format!(
                "载荷无法编码（{} 字节，纠错等级 {}）：{}",
                bytes.len(),
                level.as_str(),
                e
            ))
        })?;

        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();

        SymbolMatrix::new(width, modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correction_level_parses_case_insensitively() {
        assert_eq!("m".parse::<CorrectionLevel>().expect("parse m"), CorrectionLevel::Medium);
        assert_eq!(" H ".parse::<CorrectionLevel>().expect("parse h"), CorrectionLevel::High);
        assert_eq!(CorrectionLevel::Quartile.as_str(), "Q");
    }

    #[test]
    fn correction_level_rejects_unknown_value() {
        let result = "X".parse::<CorrectionLevel>();
        assert!(matches!(result, Err(GeneratorError::QrGeneration(_))));
    }

    #[test]
    fn matrix_rejects_mismatched_length() {
        assert!(SymbolMatrix::new(2, vec![true; 3]).is_err());
        assert!(SymbolMatrix::new(0, Vec::new()).is_err());
        assert!(SymbolMatrix::new(2, vec![true, false, false, true]).is_ok());
    }

    #[test]
    fn encoder_picks_smallest_version_for_short_text() {
        let matrix = QrCodeEncoder
            .encode(b"HELLO", CorrectionLevel::Medium)
            .expect("short text should encode");

        assert_eq!(matrix.width(), 21);
        // 左上角定位图案的外框为深色
        assert!(matrix.is_dark(0, 0));
        assert!(matrix.is_dark(6, 6));
        assert!(!matrix.is_dark(21, 0));
    }

    #[test]
    fn encoder_grows_version_with_payload() {
        let small = QrCodeEncoder.encode(b"a", CorrectionLevel::Medium).expect("small payload");
        let large = QrCodeEncoder
            .encode(&[b'a'; 500], CorrectionLevel::Medium)
            .expect("large payload");

        assert!(large.width() > small.width());
    }

    #[test]
    fn encoder_fails_beyond_capacity() {
        let payload = vec![b'a'; 4000];
        let result = QrCodeEncoder.encode(&payload, CorrectionLevel::Medium);

        assert!(matches!(result, Err(GeneratorError::QrGeneration(_))));
    }
}
