//! 位图抽象
//!
//! 布局计算与压缩管线只依赖这组最小能力，
//! 不直接绑定具体的图像库类型。

use crate::error::{ReportError, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;

/// 渲染所需的位图能力
pub trait RasterImage: Sized {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// 等比缩放，使长边等于max_long_side（原图更小则原样返回）
    fn scaled(&self, max_long_side: u32) -> Self;

    /// 以给定质量（0.0〜1.0]重编码为JPEG
    fn encode_jpeg(&self, quality: f32) -> Result<Vec<u8>>;
}

/// image库支撑的位图实现
pub struct Bitmap(DynamicImage);

impl Bitmap {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|e| ReportError::ImageDecode(e.to_string()))?;
        Ok(Self(img))
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        Self(img)
    }
}

impl RasterImage for Bitmap {
    fn width(&self) -> u32 {
        self.0.width()
    }

    fn height(&self) -> u32 {
        self.0.height()
    }

    fn scaled(&self, max_long_side: u32) -> Self {
        if self.0.width() <= max_long_side && self.0.height() <= max_long_side {
            return Self(self.0.clone());
        }
        // resize在(max, max)框内等比缩放，长边即为max
        Self(self.0.resize(max_long_side, max_long_side, FilterType::Triangle))
    }

    fn encode_jpeg(&self, quality: f32) -> Result<Vec<u8>> {
        let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
        let rgb = DynamicImage::ImageRgb8(self.0.to_rgb8());

        let mut buf = Vec::new();
        let mut cursor = Cursor::new(&mut buf);
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, q);
        rgb.write_with_encoder(encoder)
            .map_err(|e| ReportError::ImageEncode(e.to_string()))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn bitmap(width: u32, height: u32) -> Bitmap {
        Bitmap::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(width, height)))
    }

    #[test]
    fn test_scaled_long_side() {
        let img = bitmap(4000, 3000);
        let scaled = img.scaled(800);
        assert_eq!(scaled.width(), 800);
        assert_eq!(scaled.height(), 600);
    }

    #[test]
    fn test_scaled_no_upscale() {
        let img = bitmap(400, 300);
        let scaled = img.scaled(800);
        assert_eq!(scaled.width(), 400);
        assert_eq!(scaled.height(), 300);
    }

    #[test]
    fn test_scaled_portrait_aspect() {
        let img = bitmap(1500, 3000);
        let scaled = img.scaled(800);
        assert_eq!(scaled.height(), 800);
        assert_eq!(scaled.width(), 400);
    }

    #[test]
    fn test_encode_jpeg_produces_bytes() {
        let img = bitmap(100, 80);
        let jpeg = img.encode_jpeg(0.4).unwrap();
        assert!(!jpeg.is_empty());
        // JPEG魔数
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Bitmap::from_bytes(b"not an image").is_err());
    }
}
