//! 网格布局引擎
//!
//! 纯几何计算：给定一页内的照片（≤3张）算出每个格位的
//! 绘制矩形与题注文本，不接触任何绘制表面。

use crate::render::geometry::PageGeometry;
use chrono::NaiveDateTime;

/// 题注字号与行高（pt）
pub const CAPTION_FONT_SIZE_PT: f32 = 10.0;
pub const CAPTION_LINE_HEIGHT_PT: f32 = 16.0;
pub const NOTE_FONT_SIZE_PT: f32 = 9.0;
pub const NOTE_LINE_HEIGHT_PT: f32 = 12.0;

/// pt矩形，(x, y)为左下角（PDF坐标系）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPt {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// 布局输入：一张照片的元数据。dims为None表示解码失败，
/// 该格位只绘制题注。
#[derive(Debug, Clone)]
pub struct PhotoSlot {
    pub captured_at: NaiveDateTime,
    pub note: Option<String>,
    pub dims: Option<(u32, u32)>,
}

/// 布局输出：一个格位的完整摆放
#[derive(Debug, Clone)]
pub struct PlacedPhoto {
    /// 全局序号（从1起，跨页连续）
    pub index: usize,
    pub cell: RectPt,
    /// 等比适配后的图像绘制矩形；无图格位为None
    pub image: Option<RectPt>,
    /// 题注首行基线位置
    pub caption_x: f32,
    pub caption_y: f32,
    /// “序号. 拍摄时间”
    pub caption_line: String,
    /// “备注: …”按题注栏剩余空间换行并尾部截断
    pub note_lines: Vec<String>,
}

/// 总页数 = ceil(n / 每页格位数)
pub fn page_count(total_photos: usize, geo: &PageGeometry) -> usize {
    total_photos.div_ceil(geo.cells_per_row)
}

/// 第page_index页（从0起）对应的照片下标区间
pub fn page_range(total_photos: usize, page_index: usize, geo: &PageGeometry) -> std::ops::Range<usize> {
    let start = page_index * geo.cells_per_row;
    let end = (start + geo.cells_per_row).min(total_photos);
    start..end
}

/// 布局一页。slots为该页的照片切片（已按拍摄时间升序），
/// page_index只用于计算全局序号。
pub fn layout_page(slots: &[PhotoSlot], page_index: usize, geo: &PageGeometry) -> Vec<PlacedPhoto> {
    let cell_y = geo.cell_bottom_y();
    let caption_y = geo.caption_bottom_y() + geo.caption_height - CAPTION_LINE_HEIGHT_PT;

    slots
        .iter()
        .take(geo.cells_per_row)
        .enumerate()
        .map(|(slot, photo)| {
            let cell = RectPt {
                x: geo.cell_x(slot),
                y: cell_y,
                width: geo.cell_width,
                height: geo.cell_height,
            };
            let image = photo.dims.map(|(w, h)| aspect_fit(w, h, &cell));
            let index = page_index * geo.cells_per_row + slot + 1;

            PlacedPhoto {
                index,
                cell,
                image,
                caption_x: cell.x,
                caption_y,
                caption_line: format!(
                    "{}. {}",
                    index,
                    photo.captured_at.format("%Y-%m-%d %H:%M")
                ),
                note_lines: note_lines(photo.note.as_deref(), geo),
            }
        })
        .collect()
}

/// 等比“contain”适配：图像比格位更宽则以宽度为界，
/// 否则以高度为界，两个方向都居中。
pub fn aspect_fit(img_width: u32, img_height: u32, cell: &RectPt) -> RectPt {
    let scale = (cell.width / img_width as f32).min(cell.height / img_height as f32);
    let width = img_width as f32 * scale;
    let height = img_height as f32 * scale;

    RectPt {
        x: cell.x + (cell.width - width) / 2.0,
        y: cell.y + (cell.height - height) / 2.0,
        width,
        height,
    }
}

// ============================================
// 题注文本
// ============================================

/// 备注按格位宽换行，超出题注栏剩余高度时尾部截断加省略号
fn note_lines(note: Option<&str>, geo: &PageGeometry) -> Vec<String> {
    let Some(note) = note.filter(|n| !n.is_empty()) else {
        return Vec::new();
    };

    let max_lines =
        ((geo.caption_height - CAPTION_LINE_HEIGHT_PT) / NOTE_LINE_HEIGHT_PT).floor() as usize;
    if max_lines == 0 {
        return Vec::new();
    }

    let text = format!("备注: {}", note);
    let chars: Vec<char> = text.chars().collect();
    let mut lines: Vec<String> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() && lines.len() < max_lines {
        let mut line = String::new();
        let mut width = 0.0;
        while pos < chars.len() {
            let w = char_width(chars[pos], NOTE_FONT_SIZE_PT);
            if width + w > geo.cell_width && !line.is_empty() {
                break;
            }
            line.push(chars[pos]);
            width += w;
            pos += 1;
        }
        lines.push(line);
    }

    // 没放下的部分整体丢弃，末行以省略号收尾
    if pos < chars.len() {
        if let Some(last) = lines.last_mut() {
            last.pop();
            last.push('…');
        }
    }

    lines
}

/// 近似文本宽度：CJK全宽、ASCII半宽。内置字体拿不到精确
/// 度量，截断只需保守估计。
fn char_width(c: char, font_size: f32) -> f32 {
    if c.is_ascii() {
        font_size * 0.5
    } else {
        font_size
    }
}

/// 近似一行文本的宽度（居中绘制用）
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(|c| char_width(c, font_size)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn geo() -> PageGeometry {
        PageGeometry::default()
    }

    fn slot(ts_minute: u32, dims: Option<(u32, u32)>, note: Option<&str>) -> PhotoSlot {
        PhotoSlot {
            captured_at: NaiveDate::from_ymd_opt(2026, 5, 1)
                .unwrap()
                .and_hms_opt(9, ts_minute, 0)
                .unwrap(),
            note: note.map(|s| s.to_string()),
            dims,
        }
    }

    #[test]
    fn test_page_count() {
        let geo = geo();
        assert_eq!(page_count(0, &geo), 0);
        assert_eq!(page_count(3, &geo), 1);
        assert_eq!(page_count(4, &geo), 2);
        assert_eq!(page_count(9, &geo), 3);
    }

    #[test]
    fn test_page_range() {
        let geo = geo();
        assert_eq!(page_range(5, 0, &geo), 0..3);
        assert_eq!(page_range(5, 1, &geo), 3..5);
    }

    #[test]
    fn test_layout_indices_cross_pages() {
        let geo = geo();
        let slots = vec![slot(0, Some((800, 600)), None), slot(1, Some((800, 600)), None)];
        let placed = layout_page(&slots, 1, &geo);
        assert_eq!(placed[0].index, 4);
        assert_eq!(placed[1].index, 5);
    }

    #[test]
    fn test_aspect_fit_wide_image() {
        // 横图：以宽度为界，垂直居中
        let cell = RectPt { x: 100.0, y: 100.0, width: 250.0, height: 400.0 };
        let fit = aspect_fit(800, 600, &cell);
        assert!((fit.width - 250.0).abs() < 0.01);
        assert!((fit.height - 187.5).abs() < 0.01);
        assert!((fit.x - 100.0).abs() < 0.01);
        assert!((fit.y - (100.0 + (400.0 - 187.5) / 2.0)).abs() < 0.01);
    }

    #[test]
    fn test_aspect_fit_tall_image() {
        // 竖图：以高度为界，水平居中
        let cell = RectPt { x: 0.0, y: 0.0, width: 250.0, height: 400.0 };
        let fit = aspect_fit(600, 1200, &cell);
        assert!((fit.height - 400.0).abs() < 0.01);
        assert!((fit.width - 200.0).abs() < 0.01);
        assert!((fit.x - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_missing_image_keeps_caption() {
        let geo = geo();
        let placed = layout_page(&[slot(0, None, Some("雨天备选"))], 0, &geo);
        assert!(placed[0].image.is_none());
        assert_eq!(placed[0].caption_line, "1. 2026-05-01 09:00");
        assert_eq!(placed[0].note_lines, vec!["备注: 雨天备选"]);
    }

    #[test]
    fn test_no_note_no_lines() {
        let geo = geo();
        let placed = layout_page(&[slot(0, Some((100, 100)), None)], 0, &geo);
        assert!(placed[0].note_lines.is_empty());
    }

    #[test]
    fn test_long_note_tail_truncated() {
        let geo = geo();
        let long_note = "这里是一段非常长的备注".repeat(20);
        let placed = layout_page(&[slot(0, Some((100, 100)), Some(&long_note))], 0, &geo);
        let lines = &placed[0].note_lines;

        let max_lines =
            ((geo.caption_height - CAPTION_LINE_HEIGHT_PT) / NOTE_LINE_HEIGHT_PT).floor() as usize;
        assert_eq!(lines.len(), max_lines);
        assert!(lines.last().unwrap().ends_with('…'));
        // 每行不超过格位宽
        for line in lines {
            assert!(text_width(line, NOTE_FONT_SIZE_PT) <= geo.cell_width + NOTE_FONT_SIZE_PT);
        }
    }

    #[test]
    fn test_layout_caps_at_cells_per_row() {
        let geo = geo();
        let slots: Vec<PhotoSlot> =
            (0..5).map(|i| slot(i, Some((100, 100)), None)).collect();
        assert_eq!(layout_page(&slots, 0, &geo).len(), 3);
    }
}
