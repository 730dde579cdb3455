//! 报告构建器
//!
//! 单趟状态机：校验 → 封面 → （单场地网格页 | 汇总页 + 各场地
//! 网格页 | 占位页）→ 序列化。任何致命错误都在generate()边界
//! 统一转换为失败输出，绝不返回残缺文档。

use crate::compress::{compress, CompressedPhoto, CompressionConfig};
use crate::error::{ReportError, Result};
use crate::model::{
    group_by_location, sorted_by_capture, LocationInfo, PhotoRecord, ProjectInfo,
    RenderedReport, ReportRequest, APP_NAME,
};
use crate::raster::Bitmap;
use crate::render::geometry::PageGeometry;
use crate::render::grid::{layout_page, page_count, page_range, PhotoSlot};
use crate::render::metadata::{apply_info, DocumentMeta};
use crate::render::pages::{draw_jpeg, mm, Composer};
use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use printpdf::*;
use regex::Regex;
use std::io::Cursor;
use tracing::{debug, warn};

/// 多场地报告文件名中的场地占位
const ALL_LOCATIONS_LABEL: &str = "全部场地";

/// PDF元数据中的固定主题
const SUBJECT_LABEL: &str = "场景报告";

lazy_static! {
    // 文件名白名单：汉字、ASCII字母、数字，其余替换为下划线
    static ref NON_NAME_CHAR: Regex = Regex::new(r"[^\p{Han}A-Za-z0-9]").unwrap();
}

/// 报告构建器。一次generate()调用是其ReportRequest的纯函数，
/// 不与其他调用共享可变状态。
pub struct ReportBuilder {
    geo: PageGeometry,
    compression: CompressionConfig,
    font_data: Option<Vec<u8>>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            geo: PageGeometry::default(),
            compression: CompressionConfig::default(),
            font_data: None,
        }
    }

    /// 外部TTF字体（中文显示必需；未设置时使用内置Helvetica）
    pub fn with_font(mut self, font_data: Vec<u8>) -> Self {
        self.font_data = Some(font_data);
        self
    }

    pub fn with_compression(mut self, config: CompressionConfig) -> Self {
        self.compression = config;
        self
    }

    /// 生成报告。失败时返回(None, "")，调用方据此提示用户。
    ///
    /// 调用内部是同步的，一旦开始不支持中途取消；
    /// 调用方只能丢弃结果。
    pub fn generate(&self, request: &ReportRequest) -> RenderedReport {
        match self.generate_inner(request) {
            Ok((bytes, file_name)) => RenderedReport { bytes: Some(bytes), file_name },
            Err(e) => {
                warn!(error = %e, "报告生成失败");
                RenderedReport::failure()
            }
        }
    }

    fn generate_inner(&self, request: &ReportRequest) -> Result<(Vec<u8>, String)> {
        // 1. 校验
        let project = request_project(request);
        if project.name.is_empty() {
            return Err(ReportError::Validation("项目名称为空".into()));
        }
        if let ReportRequest::SingleLocation { location, .. } = request {
            if location.name.is_empty() {
                return Err(ReportError::Validation("场地名称为空".into()));
            }
        }

        let generated_on = match request {
            ReportRequest::SingleLocation { .. } => Local::now().date_naive(),
            ReportRequest::MultiLocation { generated_on, .. } => *generated_on,
        };

        let normalized = project.normalized();
        let title = match request {
            ReportRequest::SingleLocation { .. } => format!("{} 场景报告", normalized.name),
            ReportRequest::MultiLocation { .. } => normalized
                .report_title
                .clone()
                .unwrap_or_else(|| format!("{} 场景报告", normalized.name)),
        };
        let file_name = self.file_name(request, generated_on);

        // 2. 文档与封面页
        let (doc, cover_page, cover_layer) = PdfDocument::new(
            &file_name,
            mm(self.geo.page_width),
            mm(self.geo.page_height),
            "内容",
        );
        let doc = doc.with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            ..Default::default()
        }));

        let font = match &self.font_data {
            Some(bytes) => doc
                .add_external_font(Cursor::new(bytes.as_slice()))
                .map_err(|e| ReportError::FontLoad(format!("{:?}", e)))?,
            None => doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| ReportError::PdfGeneration(format!("{:?}", e)))?,
        };
        let composer = Composer {
            geo: &self.geo,
            font: &font,
            theme: normalized.theme_color,
        };

        // Logo整个文档压缩一次复用；失败只是没有Logo，不中断
        let logo = normalized.logo.as_deref().and_then(|bytes| {
            Bitmap::from_bytes(bytes)
                .and_then(|bitmap| {
                    compress(&bitmap, self.compression.quality_ceiling, &self.compression)
                })
                .map_err(|e| warn!(error = %e, "Logo处理失败，封面不绘制Logo"))
                .ok()
        });

        let cover = doc.get_page(cover_page).get_layer(cover_layer);
        let single_location = match request {
            ReportRequest::SingleLocation { location, .. } => Some(location.normalized()),
            ReportRequest::MultiLocation { .. } => None,
        };
        composer.draw_cover(
            &cover,
            &title,
            &generated_on.format("%Y-%m-%d").to_string(),
            &normalized,
            single_location.as_ref(),
            logo.as_ref(),
        );

        // 3. 内容页
        match request {
            ReportRequest::SingleLocation { photos, .. } => {
                let sorted = sorted_by_capture(photos);
                self.emit_section(&doc, &composer, &title, &sorted, logo.as_ref())?;
            }
            ReportRequest::MultiLocation { entries, .. } => {
                let groups = group_by_location(entries);
                if groups.is_empty() {
                    self.emit_placeholder(&doc, &composer, &title, logo.as_ref());
                } else {
                    // 汇总页：独立页脚“第 1 页，共 1 页”
                    let photo_total: usize = groups.iter().map(|(_, p)| p.len()).sum();
                    let (page, layer_idx) =
                        doc.add_page(mm(self.geo.page_width), mm(self.geo.page_height), "内容");
                    let layer = doc.get_page(page).get_layer(layer_idx);
                    composer.draw_header(&layer, &title, logo.as_ref());
                    composer.draw_summary(&layer, groups.len(), photo_total);
                    composer.draw_footer(&layer, 1, 1);

                    for (location, photos) in &groups {
                        let header = section_title(&title, location);
                        let mut sorted: Vec<&PhotoRecord> = photos.clone();
                        sorted.sort_by_key(|p| p.captured_at);
                        self.emit_section(&doc, &composer, &header, &sorted, logo.as_ref())?;
                    }
                }
            }
        }

        // 4. 序列化 + 元数据
        let bytes = doc
            .save_to_bytes()
            .map_err(|e| ReportError::PdfGeneration(format!("{:?}", e)))?;
        let meta = DocumentMeta {
            title: file_name.clone(),
            author: APP_NAME.to_string(),
            subject: SUBJECT_LABEL.to_string(),
            keywords: keywords(request),
        };
        let bytes = apply_info(&bytes, &meta)?;

        Ok((bytes, file_name))
    }

    /// 输出一个节：有照片则逐网格页绘制，否则占位页。
    /// 每张照片的解码/压缩缓冲在其格位处理完后立即释放，
    /// 峰值内存以一页照片为界。
    fn emit_section(
        &self,
        doc: &PdfDocumentReference,
        composer: &Composer,
        header_title: &str,
        photos: &[&PhotoRecord],
        logo: Option<&CompressedPhoto>,
    ) -> Result<()> {
        if photos.is_empty() {
            self.emit_placeholder(doc, composer, header_title, logo);
            return Ok(());
        }

        let total_pages = page_count(photos.len(), &self.geo);
        for page_index in 0..total_pages {
            let (page, layer_idx) =
                doc.add_page(mm(self.geo.page_width), mm(self.geo.page_height), "内容");
            let layer = doc.get_page(page).get_layer(layer_idx);
            composer.draw_header(&layer, header_title, logo);

            let range = page_range(photos.len(), page_index, &self.geo);
            let mut slots = Vec::with_capacity(range.len());
            let mut images: Vec<Option<CompressedPhoto>> = Vec::with_capacity(range.len());

            for photo in &photos[range] {
                // 解码位图只在本块内存活，压缩完即释放
                let compressed = Bitmap::from_bytes(&photo.data).and_then(|bitmap| {
                    compress(&bitmap, self.compression.quality_ceiling, &self.compression)
                });
                let compressed = match compressed {
                    Ok(c) => Some(c),
                    Err(e) => {
                        // 该格位按无图处理，页面继续
                        warn!(photo = %photo.id, error = %e, "照片处理失败，仅绘制题注");
                        None
                    }
                };
                slots.push(PhotoSlot {
                    captured_at: photo.captured_at,
                    note: photo.note.clone(),
                    dims: compressed.as_ref().map(|c| (c.width, c.height)),
                });
                images.push(compressed);
            }

            let placed = layout_page(&slots, page_index, &self.geo);
            for (placement, image) in placed.iter().zip(images.into_iter()) {
                if let (Some(rect), Some(photo)) = (placement.image, image) {
                    draw_jpeg(&layer, &photo, &rect);
                }
                composer.draw_caption(&layer, placement);
            }

            composer.draw_footer(&layer, page_index + 1, total_pages);
            debug!(page = page_index + 1, total = total_pages, "网格页完成");
        }

        Ok(())
    }

    /// 零照片时的占位页：页眉 + 居中提示 + “第 1 页，共 1 页”
    fn emit_placeholder(
        &self,
        doc: &PdfDocumentReference,
        composer: &Composer,
        header_title: &str,
        logo: Option<&CompressedPhoto>,
    ) {
        let (page, layer_idx) =
            doc.add_page(mm(self.geo.page_width), mm(self.geo.page_height), "内容");
        let layer = doc.get_page(page).get_layer(layer_idx);
        composer.draw_header(&layer, header_title, logo);
        composer.draw_placeholder(&layer);
        composer.draw_footer(&layer, 1, 1);
    }

    /// 文件名: sanitize(项目名)_sanitize(场地名或“全部场地”)_yyyyMMdd.pdf
    fn file_name(&self, request: &ReportRequest, generated_on: NaiveDate) -> String {
        let project = request_project(request);
        let location_part = match request {
            ReportRequest::SingleLocation { location, .. } => location.name.as_str(),
            ReportRequest::MultiLocation { .. } => ALL_LOCATIONS_LABEL,
        };
        format!(
            "{}_{}_{}.pdf",
            sanitize(&project.name),
            sanitize(location_part),
            generated_on.format("%Y%m%d"),
        )
    }
}

/// 场地节的页眉标题：报告标题 - 场地名 - 地址（缺项已归一化）
fn section_title(title: &str, location: &LocationInfo) -> String {
    let loc = location.normalized();
    format!("{} - {} - {}", title, loc.name, loc.address)
}

fn request_project(request: &ReportRequest) -> &ProjectInfo {
    match request {
        ReportRequest::SingleLocation { project, .. } => project,
        ReportRequest::MultiLocation { project, .. } => project,
    }
}

/// 元数据关键词：项目名 + 各场地名
fn keywords(request: &ReportRequest) -> String {
    let mut parts = vec![request_project(request).name.clone()];
    match request {
        ReportRequest::SingleLocation { location, .. } => parts.push(location.name.clone()),
        ReportRequest::MultiLocation { entries, .. } => {
            for (location, _) in group_by_location(entries) {
                parts.push(location.name);
            }
        }
    }
    parts.retain(|p| !p.is_empty());
    parts.join(",")
}

/// 汉字/字母/数字以外的字符替换为下划线
pub fn sanitize(name: &str) -> String {
    NON_NAME_CHAR.replace_all(name, "_").into_owned()
}
