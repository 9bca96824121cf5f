//! 二维码输出目录管理模块
//!
//! # 设计思路
//!
//! 统一管理二维码 PNG 的持久化路径，支持用户自定义目录，
//! 并在目录不存在时自动创建。
//!
//! # 实现思路
//!
//! - 优先使用调用方传入的自定义目录。
//! - 未设置时回退到当前目录下的 `qrmatrix-output`。
//! - 文件名使用本地时间戳（精确到纳秒小数位），连续保存不会互相覆盖。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::AppError;
use crate::qr::QrBitmap;

/// 默认输出目录名。
pub const DEFAULT_OUTPUT_DIR: &str = "qrmatrix-output";

/// 获取输出目录，不存在时自动创建。
///
/// # 参数
/// * `custom_dir` - 用户自定义目录（可选，空路径视为未设置）
///
/// # 返回
/// - `Ok(PathBuf)` — 可用的输出目录
/// - `Err(AppError::Storage)` — 无法创建目录
pub fn output_dir(custom_dir: Option<PathBuf>) -> Result<PathBuf, AppError> {
    let dir = custom_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(format!("创建输出目录 '{}' 失败: {}", dir.display(), e))
        })?;
    }

    Ok(dir)
}

/// 将二维码位图保存为 `qr_<时间戳>.png`，返回完整路径。
pub fn save_bitmap(dir: &Path, bitmap: &QrBitmap) -> Result<PathBuf, AppError> {
    let dir = output_dir(Some(dir.to_path_buf()))?;

    let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
    let file_path = dir.join(format!("qr_{}.png", timestamp));

    let png = bitmap.to_png_bytes()?;
    fs::write(&file_path, png)
        .map_err(|e| AppError::Storage(format!("保存二维码失败: {}", e)))?;

    log::info!("💾 二维码已保存: {}", file_path.display());
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QrPayloadPipeline;

    #[test]
    fn custom_dir_is_created() {
        let root = tempfile::tempdir().expect("tempdir");
        let target = root.path().join("a").join("b");

        let dir = output_dir(Some(target.clone())).expect("output dir");

        assert_eq!(dir, target);
        assert!(dir.is_dir());
    }

    #[test]
    fn saved_bitmap_is_a_png_with_matching_size() {
        let root = tempfile::tempdir().expect("tempdir");
        let bitmap = QrPayloadPipeline::default()
            .generate("HELLO")
            .expect("qr generation")
            .expect("non-empty payload");

        let path = save_bitmap(root.path(), &bitmap).expect("save bitmap");

        let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
        assert!(name.starts_with("qr_") && name.ends_with(".png"));

        let reloaded = image::open(&path).expect("saved file should decode");
        assert_eq!(reloaded.width(), bitmap.width());
        assert_eq!(reloaded.height(), bitmap.height());
    }
}
