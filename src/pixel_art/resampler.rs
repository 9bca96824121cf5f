//! # 降采样模块
//!
//! ## 设计思路
//!
//! 把任意尺寸、任意宽高比的源图直接栅格化到 `GRID_SIZE × GRID_SIZE` 画布，
//! 每个画布像素即为一个网格采样，不再做额外的格内平均。
//!
//! ## 实现思路
//!
//! 1. 统一缩放比 `min(N / 宽, N / 高)`，保持宽高比
//! 2. 缩放结果四舍五入到整像素，并钳制在 `[1, N]`
//! 3. 居中贴到全透明画布（信箱留白 alpha = 0）
//! 4. 逐像素读回 `ColorSample`
//!
//! 渲染失败不会中断请求：返回 `ResampleStatus::Fallback`，
//! 网格取自未缩放源图左上角 N×N 区域，由调用方决定是否提示用户。

use fast_image_resize as fr;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::color::{ColorGrid, ColorSample, GRID_SIZE};

/// 降采样滤镜。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

/// 降采样结果标记。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResampleStatus {
    /// 已按目标尺寸渲染。
    Resized,
    /// 渲染失败，网格来自未缩放的源图。
    Fallback { reason: String },
}

impl ResampleStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// 降采样输出：网格 + 状态标记。
#[derive(Debug, Clone)]
pub struct Resampled {
    pub grid: ColorGrid,
    pub status: ResampleStatus,
}

/// 缩放后图像在画布中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 计算等比缩放后居中放置的矩形。
///
/// 源尺寸含 0 时无法计算缩放比，返回 `None`。
pub fn fit_rect(source_width: u32, source_height: u32, target: u32) -> Option<FitRect> {
    if source_width == 0 || source_height == 0 || target == 0 {
        return None;
    }

    let scale = (target as f64 / source_width as f64).min(target as f64 / source_height as f64);
    let width = ((source_width as f64 * scale).round() as u32).clamp(1, target);
    let height = ((source_height as f64 * scale).round() as u32).clamp(1, target);

    Some(FitRect {
        x: (target - width) / 2,
        y: (target - height) / 2,
        width,
        height,
    })
}

/// 图像降采样器。
#[derive(Debug, Clone, Copy)]
pub struct ImageResampler {
    filter: ResampleFilter,
}

impl Default for ImageResampler {
    fn default() -> Self {
        Self::new(ResampleFilter::Triangle)
    }
}

impl ImageResampler {
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    /// 将源图降采样为固定尺寸的颜色网格。
    pub fn resample(&self, image: &DynamicImage) -> Resampled {
        let (width, height) = image.dimensions();

        match self.render_canvas(image) {
            Ok(canvas) => {
                log::info!(
                    "🧩 像素画降采样：{}x{} -> {}x{}（filter={:?}）",
                    width,
                    height,
                    GRID_SIZE,
                    GRID_SIZE,
                    self.filter
                );
                Resampled {
                    grid: Self::grid_from_canvas(&canvas),
                    status: ResampleStatus::Resized,
                }
            }
            Err(reason) => {
                log::warn!("⚠️ 降采样渲染失败，回退为未缩放源图采样：{}", reason);
                Resampled {
                    grid: Self::grid_from_unscaled(image),
                    status: ResampleStatus::Fallback { reason },
                }
            }
        }
    }

    /// 渲染 N×N 画布：等比缩放后居中，四周透明。
    fn render_canvas(&self, image: &DynamicImage) -> Result<RgbaImage, String> {
        let (width, height) = image.dimensions();
        let target = GRID_SIZE as u32;
        let rect = fit_rect(width, height, target)
            .ok_or_else(|| format!("源图尺寸无效：{}x{}", width, height))?;

        let scaled = self.resize_with_fast_image_resize(image, rect.width, rect.height)?;

        let mut canvas = RgbaImage::new(target, target);
        image::imageops::replace(&mut canvas, &scaled, rect.x as i64, rect.y as i64);
        Ok(canvas)
    }

    fn resize_with_fast_image_resize(
        &self,
        image: &DynamicImage,
        target_width: u32,
        target_height: u32,
    ) -> Result<RgbaImage, String> {
        let src = image.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| format!("构建源图像缓冲失败：{}", e))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(self.to_resize_alg());

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| format!("fast_image_resize 执行失败：{}", e))?;

        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| "fast_image_resize 输出缓冲长度异常".to_string())
    }

    fn to_resize_alg(&self) -> fr::ResizeAlg {
        match self.filter {
            ResampleFilter::Nearest => fr::ResizeAlg::Nearest,
            ResampleFilter::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            ResampleFilter::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            ResampleFilter::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Mitchell),
            ResampleFilter::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }

    fn grid_from_canvas(canvas: &RgbaImage) -> ColorGrid {
        let mut grid = [[ColorSample::TRANSPARENT; GRID_SIZE]; GRID_SIZE];
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = ColorSample::from_rgba8(canvas.get_pixel(x as u32, y as u32).0);
            }
        }
        grid
    }

    /// 回退路径：直接读取源图左上角 N×N，越界部分为透明。
    fn grid_from_unscaled(image: &DynamicImage) -> ColorGrid {
        let (width, height) = image.dimensions();
        let mut grid = [[ColorSample::TRANSPARENT; GRID_SIZE]; GRID_SIZE];
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let (px, py) = (x as u32, y as u32);
                if px < width && py < height {
                    *cell = ColorSample::from_rgba8(image.get_pixel(px, py).0);
                }
            }
        }
        grid
    }
}
