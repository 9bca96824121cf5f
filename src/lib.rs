//! # QRMatrix — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 CLI (clap + env_logger)                  │
//! │        text / image 子命令 ── FlowState 流程状态         │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕               库 (Rust)                          │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ generator ── 服务 · 编排 · 加载 · 解码 · 剪贴板       │
//! │  │   ├─ pixel_art   降采样 15×15 → 调色板分类 → emoji 文本 │
//! │  │   └─ qr          二维码编码 (M 级) → ×10 栅格化         │
//! │  │                                                       │
//! │  ├─ flow           Idle → Configuring → Generated        │
//! │  ├─ settings       JSON 设置文件                          │
//! │  └─ storage        二维码 PNG 输出目录                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 应用级错误类型 `AppError` |
//! | [`generator`] | 生成请求的异步服务、同步编排、来源加载与剪贴板导出 |
//! | [`pixel_art`] | 源图降采样、颜色分类、emoji 网格编码 |
//! | [`qr`] | 文本 → 二维码符号 → 灰度位图 |
//! | [`flow`] | 调用方持有的交互流程状态机 |
//! | [`settings`] | 生成配置的 JSON 读写 |
//! | [`storage`] | 输出目录与 PNG 保存 |

pub mod error;
pub mod flow;
pub mod generator;
pub mod pixel_art;
pub mod qr;
pub mod settings;
pub mod storage;
