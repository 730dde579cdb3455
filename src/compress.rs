//! 尺寸受限的图像压缩管线
//!
//! 流程：超限降采样 → 按质量上限编码JPEG → 超过字节阈值时
//! 降质重编码一次（只重试一次，不循环）。

use crate::error::Result;
use crate::raster::RasterImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 压缩参数。默认值为手工调校的常量，可经配置覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// 长边上限（超过则等比缩小到该值）
    pub max_dimension: u32,
    /// JPEG质量上限
    pub quality_ceiling: f32,
    /// 编码结果的字节阈值
    pub size_threshold: usize,
    /// 超阈值时的降质系数
    pub fallback_multiplier: f32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_dimension: 800,
            quality_ceiling: 0.4,
            size_threshold: 300_000,
            fallback_multiplier: 0.7,
        }
    }
}

/// 压缩结果：最终JPEG字节与缩放后的像素尺寸
#[derive(Debug, Clone)]
pub struct CompressedPhoto {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// 压缩一张位图。quality_ceiling取调用方与配置上限中较小者。
///
/// 源位图不会被修改；失败时由调用方把该格位当作无图处理。
pub fn compress<I: RasterImage>(
    image: &I,
    quality_ceiling: f32,
    config: &CompressionConfig,
) -> Result<CompressedPhoto> {
    let scaled = image.scaled(config.max_dimension);
    let quality = quality_ceiling.min(config.quality_ceiling);

    let mut jpeg = scaled.encode_jpeg(quality)?;

    if jpeg.len() > config.size_threshold {
        // 仅重试一次，结果无论大小都采用
        let fallback_quality = quality * config.fallback_multiplier;
        debug!(
            size = jpeg.len(),
            threshold = config.size_threshold,
            fallback_quality,
            "超过字节阈值，降质重编码"
        );
        jpeg = scaled.encode_jpeg(fallback_quality)?;
    }

    Ok(CompressedPhoto {
        jpeg,
        width: scaled.width(),
        height: scaled.height(),
    })
}
