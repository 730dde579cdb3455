use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 从EXIF读取拍摄时间（DateTimeOriginal优先，其次DateTime）
pub fn capture_time(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    for tag in [exif::Tag::DateTimeOriginal, exif::Tag::DateTime] {
        if let Some(field) = exif.get_field(tag, exif::In::PRIMARY) {
            if let Some(parsed) = parse_exif_datetime(&field.display_value().to_string()) {
                return Some(parsed);
            }
        }
    }
    None
}

/// EXIF时间文本 → NaiveDateTime（"2026-05-01 09:30:00"格式）
fn parse_exif_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value.trim(), "%Y:%m:%d %H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash_format() {
        let dt = parse_exif_datetime("2026-05-01 09:30:00").unwrap();
        assert_eq!(dt.format("%Y%m%d").to_string(), "20260501");
    }

    #[test]
    fn test_parse_colon_format() {
        // EXIF原始格式用冒号分隔日期
        assert!(parse_exif_datetime("2026:05:01 09:30:00").is_some());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_exif_datetime("昨天下午").is_none());
    }
}
