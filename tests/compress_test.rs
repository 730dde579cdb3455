//! 压缩管线性质测试

use scene_report::compress::{compress, CompressionConfig};
use scene_report::raster::{Bitmap, RasterImage};

fn noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(13).wrapping_add(y.wrapping_mul(7))) as u8;
        image::Rgb([v, v.wrapping_add(61), v.wrapping_mul(5)])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[test]
fn test_4000x3000_downscales_to_800x600() {
    let bitmap = Bitmap::from_bytes(&noisy_jpeg(4000, 3000)).unwrap();
    let result = compress(&bitmap, 1.0, &CompressionConfig::default()).unwrap();
    assert_eq!(result.width, 800);
    assert_eq!(result.height, 600);
}

#[test]
fn test_long_side_bound_and_ratio_kept() {
    let config = CompressionConfig::default();
    for (w, h) in [(1600u32, 1000u32), (900, 2700), (801, 800)] {
        let bitmap = Bitmap::from_bytes(&noisy_jpeg(w, h)).unwrap();
        let result = compress(&bitmap, 1.0, &config).unwrap();

        assert_eq!(result.width.max(result.height), 800, "{}x{}", w, h);
        let ratio_in = w as f32 / h as f32;
        let ratio_out = result.width as f32 / result.height as f32;
        assert!((ratio_in - ratio_out).abs() / ratio_in < 0.01, "{}x{}", w, h);
    }
}

#[test]
fn test_within_bounds_keeps_dimensions() {
    let bitmap = Bitmap::from_bytes(&noisy_jpeg(640, 480)).unwrap();
    let result = compress(&bitmap, 1.0, &CompressionConfig::default()).unwrap();
    assert_eq!((result.width, result.height), (640, 480));
}

#[test]
fn test_source_not_mutated() {
    let bitmap = Bitmap::from_bytes(&noisy_jpeg(2000, 1500)).unwrap();
    let _ = compress(&bitmap, 1.0, &CompressionConfig::default()).unwrap();
    // compress之后源位图尺寸不变
    assert_eq!((bitmap.width(), bitmap.height()), (2000, 1500));
}

#[test]
fn test_threshold_triggers_single_requality() {
    // 阈值1字节必然触发降质分支；仍产出可解码的JPEG
    let config = CompressionConfig { size_threshold: 1, ..Default::default() };
    let bitmap = Bitmap::from_bytes(&noisy_jpeg(800, 600)).unwrap();
    let result = compress(&bitmap, 1.0, &config).unwrap();

    let decoded = Bitmap::from_bytes(&result.jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (800, 600));
}

#[test]
fn test_overridden_max_dimension() {
    let config = CompressionConfig { max_dimension: 400, ..Default::default() };
    let bitmap = Bitmap::from_bytes(&noisy_jpeg(1600, 800)).unwrap();
    let result = compress(&bitmap, 1.0, &config).unwrap();
    assert_eq!((result.width, result.height), (400, 200));
}
