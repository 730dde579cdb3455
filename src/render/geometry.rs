//! 页面几何定义
//!
//! pt基准的版面常量（Source of Truth）。与既有报告字节级
//! 兼容性相关的数值都集中在这里，不要散落到绘制代码中。

// ============================================
// 页面常量（pt）
// ============================================

/// 横向A4页面（pt）
pub const PAGE_WIDTH_PT: f32 = 841.8;
pub const PAGE_HEIGHT_PT: f32 = 595.2;

/// 页边距（pt）
pub const MARGIN_PT: f32 = 50.0;

/// 页眉/页脚栏高度（pt）
pub const HEADER_HEIGHT_PT: f32 = 80.0;
pub const FOOTER_HEIGHT_PT: f32 = 40.0;

/// 照片格位（pt）
pub const CELL_WIDTH_PT: f32 = 250.0;
pub const CELL_HEIGHT_PT: f32 = 400.0;

/// 每行格位数
pub const CELLS_PER_ROW: usize = 3;

/// 格位间距（pt）
pub const CELL_SPACING_PT: f32 = 30.0;

/// 题注栏高度（pt）
pub const CAPTION_HEIGHT_PT: f32 = 60.0;

/// mm ↔ pt 变换（1mm = 72/25.4 pt）
pub const MM_TO_PT: f32 = 72.0 / 25.4;

// ============================================
// 版面结构体
// ============================================

/// 页面版面参数。默认值即上方常量，结构化持有以便
/// 布局引擎与绘制代码共享同一份数值。
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub header_height: f32,
    pub footer_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub cells_per_row: usize,
    pub cell_spacing: f32,
    pub caption_height: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: PAGE_WIDTH_PT,
            page_height: PAGE_HEIGHT_PT,
            margin: MARGIN_PT,
            header_height: HEADER_HEIGHT_PT,
            footer_height: FOOTER_HEIGHT_PT,
            cell_width: CELL_WIDTH_PT,
            cell_height: CELL_HEIGHT_PT,
            cells_per_row: CELLS_PER_ROW,
            cell_spacing: CELL_SPACING_PT,
            caption_height: CAPTION_HEIGHT_PT,
        }
    }
}

impl PageGeometry {
    /// 内容带高度（页高减去页眉页脚）
    pub fn content_band_height(&self) -> f32 {
        self.page_height - self.header_height - self.footer_height
    }

    /// 整行宽度（格位 + 间距）
    pub fn row_width(&self) -> f32 {
        self.cells_per_row as f32 * self.cell_width
            + (self.cells_per_row as f32 - 1.0) * self.cell_spacing
    }

    /// 行在页面上水平居中的起始X
    pub fn row_origin_x(&self) -> f32 {
        (self.page_width - self.row_width()) / 2.0
    }

    /// 格位块（照片 + 题注）的高度
    pub fn block_height(&self) -> f32 {
        self.cell_height + self.caption_height
    }

    /// 题注栏底边Y（块在内容带内垂直居中，PDF坐标系Y向上）
    pub fn caption_bottom_y(&self) -> f32 {
        self.footer_height + (self.content_band_height() - self.block_height()) / 2.0
    }

    /// 照片格位底边Y
    pub fn cell_bottom_y(&self) -> f32 {
        self.caption_bottom_y() + self.caption_height
    }

    /// 第slot个格位的左边X（slot从0起）
    pub fn cell_x(&self, slot: usize) -> f32 {
        self.row_origin_x() + slot as f32 * (self.cell_width + self.cell_spacing)
    }
}

/// pt → mm 变换
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_band() {
        let geo = PageGeometry::default();
        assert!((geo.content_band_height() - 475.2).abs() < 0.01);
    }

    #[test]
    fn test_row_fits_on_page() {
        let geo = PageGeometry::default();
        // 3×250 + 2×30 = 810 ≤ 841.8
        assert!((geo.row_width() - 810.0).abs() < 0.01);
        assert!(geo.row_width() <= geo.page_width);
        assert!((geo.row_origin_x() - 15.9).abs() < 0.01);
    }

    #[test]
    fn test_block_centered_in_band() {
        let geo = PageGeometry::default();
        // 块高460在475.2的带内居中，底边 = 40 + 7.6
        assert!((geo.block_height() - 460.0).abs() < 0.01);
        assert!((geo.caption_bottom_y() - 47.6).abs() < 0.01);
        assert!((geo.cell_bottom_y() - 107.6).abs() < 0.01);
    }

    #[test]
    fn test_cell_positions_ascending() {
        let geo = PageGeometry::default();
        assert!(geo.cell_x(0) < geo.cell_x(1));
        assert!((geo.cell_x(1) - geo.cell_x(0) - 280.0).abs() < 0.01);
    }

    #[test]
    fn test_pt_mm_conversion() {
        assert!((pt_to_mm(MM_TO_PT) - 1.0).abs() < 1e-6);
        assert!((pt_to_mm(841.8) - 296.98).abs() < 0.05);
    }
}
