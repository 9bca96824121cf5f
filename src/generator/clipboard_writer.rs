//! # 剪贴板写入模块
//!
//! ## 设计思路
//!
//! 将与操作系统剪贴板交互的逻辑独立出来，便于隔离平台不稳定因素。
//! 使用阻塞线程执行写入，避免阻塞 async 运行时。
//!
//! ## 实现思路
//!
//! - 二维码位图先在锁外展开为 RGBA，写入窗口只做一次 `set_image`。
//! - 剪贴板被其他进程占用时做有限次重试，间隔为指数退避加随机抖动。
//! - 无法打开剪贴板视为“忙”，可重试；写入失败视为瞬时错误，同样可重试。

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{GeneratorConfig, GeneratorError};
use crate::qr::QrBitmap;

static JITTER_STATE: AtomicU64 = AtomicU64::new(0);

fn seed_jitter_state() -> u64 {
    let time_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let state = time_seed ^ ((std::process::id() as u64) << 32) ^ 0x9E37_79B9_7F4A_7C15;
    if state == 0 { 0xA5A5_5A5A_0123_4567 } else { state }
}

/// xorshift64，无锁更新全局状态。
fn next_jitter_u64() -> u64 {
    let mut current = JITTER_STATE.load(Ordering::Relaxed);

    loop {
        let mut next = if current == 0 { seed_jitter_state() } else { current };
        next ^= next << 13;
        next ^= next >> 7;
        next ^= next << 17;

        match JITTER_STATE.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => current = observed,
        }
    }
}

fn compute_backoff_delay_with_jitter(base_delay_ms: u64, attempt: u32, max_delay_ms: u64) -> u64 {
    let exp = base_delay_ms.saturating_mul(1_u64 << attempt.saturating_sub(1).min(8));
    let capped = exp.min(max_delay_ms.max(base_delay_ms));
    let jitter_bound = (capped / 3).max(1);
    let jitter = next_jitter_u64() % (jitter_bound + 1);
    capped.saturating_add(jitter)
}

#[derive(Debug)]
struct WriteFailure {
    busy: bool,
    message: String,
}

/// 将二维码位图复制到系统剪贴板（含重试）。
///
/// # 示例
/// ```rust,no_run
/// use qr_matrix::generator::{copy_bitmap_to_clipboard, GeneratorConfig};
/// use qr_matrix::qr::QrPayloadPipeline;
///
/// # async fn demo() -> Result<(), qr_matrix::generator::GeneratorError> {
/// let bitmap = QrPayloadPipeline::default().generate("HELLO")?.expect("non-empty");
/// copy_bitmap_to_clipboard(&bitmap, &GeneratorConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn copy_bitmap_to_clipboard(
    bitmap: &QrBitmap,
    config: &GeneratorConfig,
) -> Result<(), GeneratorError> {
    let rgba = bitmap.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    let bytes = rgba.into_raw();

    log::debug!("📋 准备复制二维码到剪贴板 - {}x{}", width, height);

    let retries = config.clipboard_retries;
    let retry_delay = config.clipboard_retry_delay_ms;
    let retry_max_delay = config.clipboard_retry_max_delay_ms;

    let mut last_error = None;
    for attempt in 1..=retries.saturating_add(1) {
        if attempt > 1 {
            let wait_ms = compute_backoff_delay_with_jitter(retry_delay.max(1), attempt - 1, retry_max_delay);
            log::debug!("🔄 重试 {}/{}，等待 {}ms（指数退避+抖动）", attempt - 1, retries, wait_ms);
            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
        }

        let attempt_bytes = bytes.clone();
        let result = tokio::task::spawn_blocking(move || write_image(width, height, attempt_bytes))
            .await
            .map_err(|e| GeneratorError::Clipboard(format!("线程执行失败：{}", e)))?;

        match result {
            Ok(()) => {
                log::info!("✅ 复制成功 (尝试 {})", attempt);
                return Ok(());
            }
            Err(failure) => {
                log::warn!(
                    "❌ 尝试 {} 失败: {}（busy={}）",
                    attempt,
                    failure.message,
                    failure.busy
                );
                last_error = Some(failure.message);
            }
        }
    }

    Err(GeneratorError::Clipboard(
        last_error.unwrap_or_else(|| "未知错误".to_string()),
    ))
}

fn write_image(width: usize, height: usize, bytes: Vec<u8>) -> Result<(), WriteFailure> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| WriteFailure {
        busy: true,
        message: format!("无法访问剪贴板：{}", e),
    })?;

    let image_data = arboard::ImageData {
        width,
        height,
        bytes: Cow::Owned(bytes),
    };

    clipboard.set_image(image_data).map_err(|e| WriteFailure {
        busy: false,
        message: format!("复制失败：{}", e),
    })
}
