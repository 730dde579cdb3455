//! 照片文件夹扫描（CLI侧）
//!
//! 引擎本身不做任何IO，这里负责把文件夹里的照片读成
//! PhotoRecord列表交给引擎。

mod exif;

use crate::error::{ReportError, Result};
use crate::model::PhotoRecord;
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::Path;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// 扫描文件夹直下的照片（不递归），按拍摄时间交给引擎排序，
/// 这里只按文件名稳定排序方便复现。
pub fn scan_folder(folder: &Path) -> Result<Vec<PhotoRecord>> {
    if !folder.exists() {
        return Err(ReportError::FolderNotFound(folder.display().to_string()));
    }

    let mut photos = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(ext) = path.extension() else { continue };
        let ext_str = ext.to_string_lossy();
        if !IMAGE_EXTENSIONS.iter().any(|&e| e == ext_str) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let data = std::fs::read(path)?;
        let captured_at = exif::capture_time(path).unwrap_or_else(|| file_mtime(path));

        photos.push(PhotoRecord {
            id: file_name,
            data,
            captured_at,
            note: None,
        });
    }

    photos.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(photos)
}

/// EXIF缺失时回退到文件修改时间
fn file_mtime(path: &Path) -> NaiveDateTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).naive_local())
        .unwrap_or_else(|_| Local::now().naive_local())
}
