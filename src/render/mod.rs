//! 报告渲染引擎
//!
//! 数据单向流动：builder为每一页调用grid布局，grid的结果由
//! pages绘制到printpdf图层，照片经compress管线压缩后直嵌。

pub mod builder;
pub mod geometry;
pub mod grid;
pub mod metadata;
pub mod pages;

pub use builder::ReportBuilder;
pub use geometry::PageGeometry;
