//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载生成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 空输入不是错误（返回 `Ok(None)`），降采样失败也不是错误
//! （由 `ResampleStatus::Fallback` 标记），因此都不在此枚举中。

/// 生成链路统一错误类型。
///
/// 该类型会在应用层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("编码错误：{0}")]
    Encoding(String),

    #[error("二维码生成失败：{0}")]
    QrGeneration(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    #[error("已取消：{0}")]
    Cancelled(String),

    #[error("配置错误：{0}")]
    Config(String),

    /// 后台任务崩溃（panic）等内部故障，与用户取消区分。
    #[error("内部错误：{0}")]
    Internal(String),
}

impl GeneratorError {
    /// 稳定错误码，供调用方做分支处理或埋点。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Encoding(_) => "E_ENCODING",
            Self::QrGeneration(_) => "E_QR_GENERATION",
            Self::Decode(_) => "E_DECODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::Clipboard(_) => "E_CLIPBOARD",
            Self::Cancelled(_) => "E_CANCELLED",
            Self::Config(_) => "E_CONFIG",
            Self::Internal(_) => "E_INTERNAL",
        }
    }

    /// 出错所在阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileSystem(_) | Self::InvalidFormat(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Encoding(_) | Self::QrGeneration(_) => "qr",
            Self::Clipboard(_) => "export",
            Self::Cancelled(_) => "cancel",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}
