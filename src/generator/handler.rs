//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `GeneratorHandler` 只负责流程编排与配置管理，不持有任何请求级状态。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 文本请求：直接进入二维码流水线
//! 3. 图片请求：加载 → 解码 → 降采样 → 分类 → 编码 → 二维码流水线
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<GeneratorConfig>>` 支持运行时切档。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 每个阶段边界检查取消标志，被取消的请求不产出任何部分结果。
//! - 记录 `load/decode/pixel/qr/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use image::DynamicImage;

use super::source::{GenerationOutcome, GenerationRequest, ImageSource};
use super::{GeneratorConfig, GeneratorError, ResampleProfile};
use crate::pixel_art::{self, ImageResampler, PixelArt, ResampleStatus};
use crate::qr::{QrCodeEncoder, QrPayloadPipeline, SymbolEncoder};

/// 生成处理器。
pub struct GeneratorHandler {
    config: Arc<RwLock<GeneratorConfig>>,
    encoder: Arc<dyn SymbolEncoder>,
}

impl GeneratorHandler {
    /// 根据初始配置创建处理器，使用默认 `qrcode` 编码器。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use qr_matrix::generator::{GeneratorConfig, GeneratorHandler};
    ///
    /// let handler = GeneratorHandler::new(GeneratorConfig::default())?;
    /// # Ok::<(), qr_matrix::generator::GeneratorError>(())
    /// ```
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        Self::with_encoder(config, Arc::new(QrCodeEncoder))
    }

    /// 注入自定义符号编码器。
    pub fn with_encoder(
        config: GeneratorConfig,
        encoder: Arc<dyn SymbolEncoder>,
    ) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            encoder,
        })
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<GeneratorConfig, GeneratorError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| GeneratorError::Config("配置读取锁已中毒".to_string()))
    }

    /// 整体替换配置（先校验）。
    pub fn set_config(&self, new_config: GeneratorConfig) -> Result<(), GeneratorError> {
        new_config.validate()?;
        let mut config = self
            .config
            .write()
            .map_err(|_| GeneratorError::Config("配置写入锁已中毒".to_string()))?;
        *config = new_config;
        Ok(())
    }

    /// 设置降采样档位。
    pub fn set_profile(&self, profile: ResampleProfile) -> Result<(), GeneratorError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| GeneratorError::Config("配置写入锁已中毒".to_string()))?;
        config.apply_profile(profile);

        log::info!(
            "⚙️ 已切换降采样档位：{:?}（filter={:?}）",
            profile,
            config.resize_filter
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn get_profile(&self) -> Result<ResampleProfile, GeneratorError> {
        Ok(self.config_snapshot()?.infer_profile())
    }

    /// 处理主入口：空文本返回 `Ok(None)`。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use qr_matrix::generator::{GenerationRequest, GeneratorConfig, GeneratorHandler};
    ///
    /// let handler = GeneratorHandler::new(GeneratorConfig::default())?;
    /// let outcome = handler.generate(GenerationRequest::Text("HELLO".into()))?;
    /// assert!(outcome.is_some());
    /// # Ok::<(), qr_matrix::generator::GeneratorError>(())
    /// ```
    pub fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Option<GenerationOutcome>, GeneratorError> {
        self.generate_with_cancel(request, &|| false)
    }

    /// 带取消检查的处理入口。
    pub fn generate_with_cancel<C>(
        &self,
        request: GenerationRequest,
        is_cancelled: &C,
    ) -> Result<Option<GenerationOutcome>, GeneratorError>
    where
        C: Fn() -> bool + ?Sized,
    {
        let config = self.config_snapshot()?;
        let kind = request.kind();
        let total_start = Instant::now();

        let (payload, pixel_art, resample_status) = match request {
            GenerationRequest::Text(text) => (text, None, None),
            GenerationRequest::PixelArt(source) => {
                let (art, status) = self.render_pixel_art_with_cancel(source, &config, is_cancelled)?;
                (art.payload.clone(), Some(art), Some(status))
            }
        };

        Self::ensure_not_cancelled(is_cancelled, "qr")?;

        let qr_start = Instant::now();
        let pipeline = QrPayloadPipeline::with_encoder(Arc::clone(&self.encoder), config.quiet_zone_modules);
        let Some(bitmap) = pipeline.generate(&payload)? else {
            return Ok(None);
        };
        let qr_elapsed = qr_start.elapsed();

        Self::ensure_not_cancelled(is_cancelled, "complete")?;

        log::info!(
            "✅ 生成完成 - 类型: {} qr={}ms total={}ms",
            kind.as_str(),
            qr_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(Some(GenerationOutcome {
            kind,
            bitmap,
            pixel_art,
            resample_status,
        }))
    }

    /// 只生成像素画（不编码二维码），用于预览。
    pub fn render_pixel_art(
        &self,
        source: ImageSource,
    ) -> Result<(PixelArt, ResampleStatus), GeneratorError> {
        let config = self.config_snapshot()?;
        self.render_pixel_art_with_cancel(source, &config, &|| false)
    }

    fn render_pixel_art_with_cancel<C>(
        &self,
        source: ImageSource,
        config: &GeneratorConfig,
        is_cancelled: &C,
    ) -> Result<(PixelArt, ResampleStatus), GeneratorError>
    where
        C: Fn() -> bool + ?Sized,
    {
        let load_start = Instant::now();
        let raw = self.load_source(source, config)?;
        let load_elapsed = load_start.elapsed();
        Self::ensure_not_cancelled(is_cancelled, "decode")?;

        let decode_start = Instant::now();
        let image: DynamicImage = self.decode_source_image(raw, config)?;
        let decode_elapsed = decode_start.elapsed();
        Self::ensure_not_cancelled(is_cancelled, "resample")?;

        let pixel_start = Instant::now();
        let resampler = ImageResampler::new(config.resize_filter);
        let (art, status) = pixel_art::render_pixel_art(&resampler, &image);
        let pixel_elapsed = pixel_start.elapsed();

        if let ResampleStatus::Fallback { reason } = &status {
            log::warn!("⚠️ 像素画基于未缩放源图生成，结果可能不准确：{}", reason);
        }

        log::info!(
            "🎨 像素画生成完成 - load={}ms decode={}ms pixel={}ms 载荷={}字节",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            pixel_elapsed.as_millis(),
            art.payload.len()
        );

        Ok((art, status))
    }

    fn ensure_not_cancelled<C>(is_cancelled: &C, stage: &str) -> Result<(), GeneratorError>
    where
        C: Fn() -> bool + ?Sized,
    {
        if is_cancelled() {
            log::info!("🛑 请求已取消（阶段：{}）", stage);
            return Err(GeneratorError::Cancelled(format!("请求在 {} 阶段前被取消", stage)));
        }
        Ok(())
    }
}
