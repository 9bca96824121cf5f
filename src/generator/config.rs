//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `GeneratorConfig`，保证运行时行为可观测、可调整、可测试。
//! 网格尺寸、纠错等级、放大倍数与调色板都是固定的，不在配置中出现。
//! 降采样档位（quality / balanced / speed）作为高层语义，映射到具体滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `ResampleProfile` 负责档位字符串解析与反向输出。
//! - `apply_profile` / `infer_profile` 在档位与滤镜之间互相转换。
//! - `validate` 拒绝越界参数，配置文件与运行时修改都会经过它。

use serde::{Deserialize, Serialize};

use super::GeneratorError;
use crate::pixel_art::ResampleFilter;
use crate::qr::DEFAULT_QUIET_ZONE;

/// 生成流程配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 降采样滤镜。
    pub resize_filter: ResampleFilter,
    /// 二维码静区宽度（模块数）。
    pub quiet_zone_modules: u32,
    /// 写入剪贴板失败时最大重试次数。
    pub clipboard_retries: u32,
    /// 首次重试间隔（毫秒）。
    pub clipboard_retry_delay_ms: u64,
    /// 单次退避延迟上限（毫秒）。
    pub clipboard_retry_max_delay_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: ResampleFilter::Triangle,
            quiet_zone_modules: DEFAULT_QUIET_ZONE,
            clipboard_retries: 3,
            clipboard_retry_delay_ms: 100,
            clipboard_retry_max_delay_ms: 900,
        }
    }
}

/// 降采样档位。
///
/// - `Quality`：CatmullRom，边缘更锐利
/// - `Balanced`：双线性
/// - `Speed`：最近邻
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleProfile {
    Quality,
    Balanced,
    Speed,
}

impl ResampleProfile {
    /// 从外部字符串解析档位。
    pub fn parse(profile: &str) -> Result<Self, GeneratorError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(GeneratorError::Config(format!(
                "未知降采样档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl GeneratorConfig {
    /// 基于当前滤镜反推档位。
    pub fn infer_profile(&self) -> ResampleProfile {
        match self.resize_filter {
            ResampleFilter::Nearest => ResampleProfile::Speed,
            ResampleFilter::CatmullRom | ResampleFilter::Lanczos3 => ResampleProfile::Quality,
            ResampleFilter::Triangle | ResampleFilter::Gaussian => ResampleProfile::Balanced,
        }
    }

    pub fn apply_profile(&mut self, profile: ResampleProfile) {
        self.resize_filter = match profile {
            ResampleProfile::Quality => ResampleFilter::CatmullRom,
            ResampleProfile::Balanced => ResampleFilter::Triangle,
            ResampleProfile::Speed => ResampleFilter::Nearest,
        };
    }

    /// 校验参数范围。
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.max_file_size < 1024 {
            return Err(GeneratorError::Config("max_file_size 不能小于 1KB".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(GeneratorError::Config("max_decoded_pixels 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < 4 * 1024 * 1024 {
            return Err(GeneratorError::Config("max_decoded_bytes 不能小于 4MB".to_string()));
        }
        if self.quiet_zone_modules > 16 {
            return Err(GeneratorError::Config("quiet_zone_modules 必须在 0~16 之间".to_string()));
        }
        if self.clipboard_retries > 10 {
            return Err(GeneratorError::Config("clipboard_retries 不能大于 10".to_string()));
        }
        if !(10..=5_000).contains(&self.clipboard_retry_delay_ms) {
            return Err(GeneratorError::Config(
                "clipboard_retry_delay_ms 必须在 10~5000 毫秒之间".to_string(),
            ));
        }
        if self.clipboard_retry_max_delay_ms < self.clipboard_retry_delay_ms {
            return Err(GeneratorError::Config(
                "clipboard_retry_max_delay_ms 不能小于 clipboard_retry_delay_ms".to_string(),
            ));
        }
        Ok(())
    }
}
