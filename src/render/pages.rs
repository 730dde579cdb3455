//! 页面组装器：封面、页眉、页脚、占位页、汇总页
//!
//! 只负责往给定图层上绘制，页面顺序由builder掌控。

use crate::compress::CompressedPhoto;
use crate::model::{NormalizedLocation, NormalizedProject, ThemeColor};
use crate::render::geometry::{pt_to_mm, PageGeometry};
use crate::render::grid::{
    aspect_fit, text_width, PlacedPhoto, RectPt, CAPTION_FONT_SIZE_PT, CAPTION_LINE_HEIGHT_PT,
    NOTE_FONT_SIZE_PT, NOTE_LINE_HEIGHT_PT,
};
use printpdf::path::PaintMode;
use printpdf::*;

/// 字号（pt）
pub const TITLE_FONT_SIZE: f32 = 28.0;
pub const HEADING_FONT_SIZE: f32 = 14.0;
pub const BODY_FONT_SIZE: f32 = 11.0;
pub const SMALL_FONT_SIZE: f32 = 9.0;

/// 封面Logo最大尺寸（pt）
const COVER_LOGO_MAX: (f32, f32) = (120.0, 72.0);
/// 页眉Logo最大尺寸（pt）
const HEADER_LOGO_MAX: (f32, f32) = (66.0, 44.0);

/// 页面组装器。持有字体引用与版面参数，供单次生成使用。
pub struct Composer<'a> {
    pub geo: &'a PageGeometry,
    pub font: &'a IndirectFontRef,
    pub theme: ThemeColor,
}

impl<'a> Composer<'a> {
    // ============================================
    // 封面
    // ============================================

    /// 封面：满版底色、标题带、项目信息块，单场地报告附
    /// 场地信息块，有Logo时绘制在右下角（无Logo不画占位）。
    pub fn draw_cover(
        &self,
        layer: &PdfLayerReference,
        title: &str,
        generated_on: &str,
        project: &NormalizedProject,
        location: Option<&NormalizedLocation>,
        logo: Option<&CompressedPhoto>,
    ) {
        let geo = self.geo;

        // 满版浅色底
        self.fill_rect(
            layer,
            RectPt { x: 0.0, y: 0.0, width: geo.page_width, height: geo.page_height },
            tint(self.theme, 0.92),
        );

        // 标题带
        let band_height = 90.0;
        let band_y = geo.page_height - 200.0;
        self.fill_rect(
            layer,
            RectPt { x: 0.0, y: band_y, width: geo.page_width, height: band_height },
            self.theme,
        );

        layer.set_fill_color(color(ThemeColor { r: 1.0, g: 1.0, b: 1.0 }));
        self.text(layer, title, TITLE_FONT_SIZE, geo.margin, band_y + 34.0);

        // 生成日期
        layer.set_fill_color(gray(0.35));
        self.text(
            layer,
            &format!("生成日期: {}", generated_on),
            BODY_FONT_SIZE,
            geo.margin,
            band_y - 26.0,
        );

        // 项目信息块
        let block_top = band_y - 70.0;
        layer.set_fill_color(color(self.theme));
        self.text(layer, "项目信息", HEADING_FONT_SIZE, geo.margin, block_top);
        layer.set_fill_color(gray(0.15));
        let lines = [
            format!("项目名称: {}", project.name),
            format!("导演: {}", project.director),
            format!("制片: {}", project.producer),
            format!("开机日期: {}", project.start_date),
        ];
        for (i, line) in lines.iter().enumerate() {
            self.text(
                layer,
                line,
                BODY_FONT_SIZE,
                geo.margin,
                block_top - 24.0 - i as f32 * 20.0,
            );
        }

        // 场地信息块（仅单场地报告）
        if let Some(location) = location {
            let block_x = geo.page_width / 2.0;
            layer.set_fill_color(color(self.theme));
            self.text(layer, "场地信息", HEADING_FONT_SIZE, block_x, block_top);
            layer.set_fill_color(gray(0.15));
            let lines = [
                format!("场地名称: {}", location.name),
                format!("类别: {}", location.category),
                format!("地址: {}", location.address),
            ];
            for (i, line) in lines.iter().enumerate() {
                self.text(
                    layer,
                    line,
                    BODY_FONT_SIZE,
                    block_x,
                    block_top - 24.0 - i as f32 * 20.0,
                );
            }
        }

        if let Some(logo) = logo {
            let bounds = RectPt {
                x: geo.page_width - geo.margin - COVER_LOGO_MAX.0,
                y: geo.margin,
                width: COVER_LOGO_MAX.0,
                height: COVER_LOGO_MAX.1,
            };
            draw_jpeg(layer, logo, &aspect_fit(logo.width, logo.height, &bounds));
        }
    }

    // ============================================
    // 页眉 / 页脚
    // ============================================

    /// 内容页页眉：主题色横带 + 标题，有Logo时绘制在右上角
    pub fn draw_header(
        &self,
        layer: &PdfLayerReference,
        title: &str,
        logo: Option<&CompressedPhoto>,
    ) {
        let geo = self.geo;
        let band_y = geo.page_height - geo.header_height;

        self.fill_rect(
            layer,
            RectPt { x: 0.0, y: band_y, width: geo.page_width, height: geo.header_height },
            self.theme,
        );

        layer.set_fill_color(color(ThemeColor { r: 1.0, g: 1.0, b: 1.0 }));
        self.text(layer, title, HEADING_FONT_SIZE, geo.margin, band_y + 34.0);

        if let Some(logo) = logo {
            let bounds = RectPt {
                x: geo.page_width - geo.margin - HEADER_LOGO_MAX.0,
                y: band_y + (geo.header_height - HEADER_LOGO_MAX.1) / 2.0,
                width: HEADER_LOGO_MAX.0,
                height: HEADER_LOGO_MAX.1,
            };
            draw_jpeg(layer, logo, &aspect_fit(logo.width, logo.height, &bounds));
        }
    }

    /// 内容页页脚：居中页码标签，总数为该节的网格页数
    pub fn draw_footer(&self, layer: &PdfLayerReference, page: usize, total: usize) {
        let geo = self.geo;
        let label = footer_label(page, total);
        let x = (geo.page_width - text_width(&label, SMALL_FONT_SIZE)) / 2.0;

        layer.set_outline_color(color_rgb(0.8, 0.8, 0.8));
        layer.set_outline_thickness(0.5);
        self.line(layer, geo.margin, geo.footer_height, geo.page_width - geo.margin, geo.footer_height);

        layer.set_fill_color(gray(0.4));
        self.text(layer, &label, SMALL_FONT_SIZE, x, geo.footer_height / 2.0 - 3.0);
    }

    /// 格位下方的题注行与备注行（图像本身由draw_jpeg绘制）
    pub fn draw_caption(&self, layer: &PdfLayerReference, placement: &PlacedPhoto) {
        layer.set_fill_color(gray(0.15));
        self.text(
            layer,
            &placement.caption_line,
            CAPTION_FONT_SIZE_PT,
            placement.caption_x,
            placement.caption_y,
        );

        layer.set_fill_color(gray(0.45));
        for (i, line) in placement.note_lines.iter().enumerate() {
            let y = placement.caption_y
                - CAPTION_LINE_HEIGHT_PT
                - i as f32 * NOTE_LINE_HEIGHT_PT;
            self.text(layer, line, NOTE_FONT_SIZE_PT, placement.caption_x, y);
        }
    }

    // ============================================
    // 占位页 / 汇总页
    // ============================================

    /// 无照片时的占位内容（页眉页脚由builder另行绘制）
    pub fn draw_placeholder(&self, layer: &PdfLayerReference) {
        let geo = self.geo;
        let label = "暂无照片";
        let x = (geo.page_width - text_width(label, HEADING_FONT_SIZE)) / 2.0;
        let y = geo.footer_height + geo.content_band_height() / 2.0;

        layer.set_fill_color(gray(0.5));
        self.text(layer, label, HEADING_FONT_SIZE, x, y);
    }

    /// 多场地报告的汇总页内容
    pub fn draw_summary(&self, layer: &PdfLayerReference, location_count: usize, photo_count: usize) {
        let geo = self.geo;
        let top = geo.page_height - geo.header_height - 60.0;

        layer.set_fill_color(color(self.theme));
        self.text(layer, "项目汇总", HEADING_FONT_SIZE, geo.margin, top);

        layer.set_fill_color(gray(0.15));
        self.text(
            layer,
            &format!("场地数量: {}", location_count),
            BODY_FONT_SIZE,
            geo.margin,
            top - 28.0,
        );
        self.text(
            layer,
            &format!("照片数量: {}", photo_count),
            BODY_FONT_SIZE,
            geo.margin,
            top - 48.0,
        );
    }

    // ============================================
    // 基础绘制
    // ============================================

    fn text(&self, layer: &PdfLayerReference, text: &str, size: f32, x_pt: f32, y_pt: f32) {
        layer.use_text(text, size, mm(x_pt), mm(y_pt), self.font);
    }

    fn fill_rect(&self, layer: &PdfLayerReference, rect: RectPt, fill: ThemeColor) {
        layer.set_fill_color(color(fill));
        let shape = Rect::new(
            mm(rect.x),
            mm(rect.y),
            mm(rect.x + rect.width),
            mm(rect.y + rect.height),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(shape);
    }

    fn line(&self, layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
        let line = Line {
            points: vec![
                (Point::new(mm(x1), mm(y1)), false),
                (Point::new(mm(x2), mm(y2)), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }
}

/// 把压缩后的JPEG按目标矩形嵌入图层（DCT直嵌，不再解码）
pub fn draw_jpeg(layer: &PdfLayerReference, photo: &CompressedPhoto, rect: &RectPt) {
    let image = Image::from(ImageXObject {
        width: Px(photo.width as usize),
        height: Px(photo.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: photo.jpeg.clone(),
        image_filter: Some(ImageFilter::DCT),
        smask: None,
        clipping_bbox: None,
    });

    // dpi换算出目标物理宽度，高度随像素纵横比自洽
    let dpi = photo.width as f32 / (pt_to_mm(rect.width) / 25.4);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(rect.x)),
            translate_y: Some(mm(rect.y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

/// 页脚标签。每节独立计数，页码从1起
pub fn footer_label(page: usize, total: usize) -> String {
    format!("第 {} 页，共 {} 页", page, total)
}

#[inline]
pub fn mm(pt: f32) -> Mm {
    Mm(pt_to_mm(pt))
}

fn color(c: ThemeColor) -> Color {
    color_rgb(c.r, c.g, c.b)
}

fn color_rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn gray(level: f32) -> Color {
    color_rgb(level, level, level)
}

/// 主题色提亮（amount: 0不变，1变白）
fn tint(c: ThemeColor, amount: f32) -> ThemeColor {
    ThemeColor {
        r: c.r + (1.0 - c.r) * amount,
        g: c.g + (1.0 - c.g) * amount,
        b: c.b + (1.0 - c.b) * amount,
    }
}
