//! # 生成模块（generator）
//!
//! ## 设计思路
//!
//! 该模块将“来源加载 → 解码 → 像素画 → 二维码 → 导出”串成完整链路，
//! 并按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：异步入口，负责请求取代与显式取消
//! - `handler`：编排整条处理流水线（同步、无请求级状态）
//! - `loader`：负责 Base64/文件/内存字节加载与安全校验
//! - `decode`：负责解码与像素、内存上限
//! - `clipboard_writer`：负责写入剪贴板与重试
//! - `config/error/source`：配置、错误、请求与结果模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! CLI / 调用方
//!    ↓
//! service.rs（票号、取消标志、spawn_blocking）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积/签名校验）
//!    ├─ decode.rs（解码 + 像素限制）
//!    ├─ pixel_art（降采样 → 分类 → 编码）
//!    └─ qr（编码 → 栅格化）
//!    ↓
//! GenerationOutcome → storage / clipboard_writer
//! ```

mod clipboard_writer;
mod config;
mod decode;
mod error;
mod handler;
mod loader;
mod service;
mod source;

pub use clipboard_writer::copy_bitmap_to_clipboard;
pub use config::{GeneratorConfig, ResampleProfile};
pub use error::GeneratorError;
pub use handler::GeneratorHandler;
pub use service::GeneratorService;
pub use source::{GenerationKind, GenerationOutcome, GenerationRequest, ImageSource};
