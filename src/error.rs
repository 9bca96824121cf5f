//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! 生成链路内部使用 `GeneratorError`，到达应用层（设置、存储、流程状态、CLI）
//! 后统一上转为 `AppError`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `GeneratorError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于以 JSON 形式输出。

use serde::Serialize;

use crate::generator::GeneratorError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 生成流水线错误（加载 / 解码 / 二维码 / 剪贴板）
    #[error("{0}")]
    Generator(#[from] GeneratorError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 输出目录不可用或写入失败
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 设置文件解析或序列化失败
    #[error("设置错误: {0}")]
    Config(String),

    /// 非法的流程状态迁移
    #[error("流程状态错误: {0}")]
    Flow(String),
}

impl AppError {
    /// 稳定错误码，生成链路错误沿用 `GeneratorError::code`。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Generator(e) => e.code(),
            Self::Io(_) => "E_IO",
            Self::Storage(_) => "E_STORAGE",
            Self::Config(_) => "E_SETTINGS",
            Self::Flow(_) => "E_FLOW",
        }
    }
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
