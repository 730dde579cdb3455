//! scene-report
//!
//! 勘景照片的场景报告PDF生成引擎。调用方准备好项目/场地/
//! 照片数据构成ReportRequest，generate()返回文档字节与文件名。

pub mod compress;
pub mod config;
pub mod error;
pub mod model;
pub mod raster;
pub mod render;
pub mod scanner;

pub mod cli;

pub use compress::{compress, CompressedPhoto, CompressionConfig};
pub use config::Config;
pub use error::{ReportError, Result};
pub use model::{
    LocationInfo, PhotoRecord, ProjectInfo, RenderedReport, ReportRequest, ThemeColor,
};
pub use render::{PageGeometry, ReportBuilder};
