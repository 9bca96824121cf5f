//! # 二维码位图
//!
//! 单色灰度位图：0 为深色模块，255 为浅色。对外只交付不可变对象，
//! 保存与分享均从这里取字节。

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbaImage};

use super::symbol::SymbolMatrix;
use crate::generator::GeneratorError;

pub const DARK: Luma<u8> = Luma([0]);
pub const LIGHT: Luma<u8> = Luma([255]);

/// 放大后的二维码位图。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrBitmap {
    image: GrayImage,
    modules: usize,
    module_scale: u32,
    quiet_zone: u32,
}

impl QrBitmap {
    /// 最近邻放大：每个模块变成 `module_scale × module_scale` 的纯色块，四周留静区。
    pub fn rasterize(matrix: &SymbolMatrix, module_scale: u32, quiet_zone: u32) -> Self {
        let module_scale = module_scale.max(1);
        let modules = matrix.width();
        let side_modules = modules as u32 + quiet_zone * 2;
        let side = side_modules * module_scale;

        let image = GrayImage::from_fn(side, side, |x, y| {
            let mx = x / module_scale;
            let my = y / module_scale;
            if mx < quiet_zone || my < quiet_zone {
                return LIGHT;
            }

            if matrix.is_dark((mx - quiet_zone) as usize, (my - quiet_zone) as usize) {
                DARK
            } else {
                LIGHT
            }
        });

        Self {
            image,
            modules,
            module_scale,
            quiet_zone,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 符号每边模块数（不含静区）。
    pub fn modules(&self) -> usize {
        self.modules
    }

    pub fn module_scale(&self) -> u32 {
        self.module_scale
    }

    pub fn quiet_zone(&self) -> u32 {
        self.quiet_zone
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// 原始灰度字节（行优先）。
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// 转为 RGBA，供剪贴板写入。
    pub fn to_rgba8(&self) -> RgbaImage {
        DynamicImage::ImageLuma8(self.image.clone()).to_rgba8()
    }

    /// 编码为 PNG 字节。
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, GeneratorError> {
        let mut cursor = Cursor::new(Vec::new());
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| GeneratorError::Encoding(format!("PNG 编码失败：{}", e)))?;
        Ok(cursor.into_inner())
    }
}
