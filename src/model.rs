//! 报告引擎的输入数据模型
//!
//! 所有类型都是调用方在生成前构建好的只读快照，
//! 引擎内部不会修改它们。

use chrono::{NaiveDate, NaiveDateTime};

/// PDF元数据中的创建者/作者
pub const APP_NAME: &str = "勘景助手";

/// 可选字段缺省时的占位文本
pub const NOT_SET: &str = "未设置";

/// 主题色（0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ThemeColor {
    fn default() -> Self {
        // 深蓝
        Self { r: 0.16, g: 0.24, b: 0.38 }
    }
}

/// 项目信息
#[derive(Debug, Clone, Default)]
pub struct ProjectInfo {
    /// 项目名称（必填，不能为空）
    pub name: String,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub theme_color: Option<ThemeColor>,
    /// 封面右下角Logo（编码后的图像字节）
    pub logo: Option<Vec<u8>>,
    /// 多场地报告的标题覆盖
    pub report_title: Option<String>,
}

/// 场地信息
#[derive(Debug, Clone, Default)]
pub struct LocationInfo {
    pub name: String,
    pub address: Option<String>,
    pub category: Option<String>,
}

/// 单张照片记录
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    pub id: String,
    /// 编码后的图像字节（JPEG/PNG）
    pub data: Vec<u8>,
    pub captured_at: NaiveDateTime,
    pub note: Option<String>,
}

/// 报告生成请求
#[derive(Debug, Clone)]
pub enum ReportRequest {
    /// 单场地报告
    SingleLocation {
        project: ProjectInfo,
        location: LocationInfo,
        photos: Vec<PhotoRecord>,
    },
    /// 多场地汇总报告（引擎按场地分组）
    MultiLocation {
        project: ProjectInfo,
        generated_on: NaiveDate,
        entries: Vec<(LocationInfo, PhotoRecord)>,
    },
}

/// 生成结果。bytes为None当且仅当file_name为空（生成失败）。
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Option<Vec<u8>>,
    pub file_name: String,
}

impl RenderedReport {
    pub fn failure() -> Self {
        Self { bytes: None, file_name: String::new() }
    }

    pub fn is_success(&self) -> bool {
        self.bytes.is_some()
    }
}

// ============================================
// 构建期归一化
// ============================================
//
// 渲染代码不对Option做分支判断：进入绘制前把所有可选
// 展示字段一次性填为“未设置”。Logo是例外，缺失时封面
// 不绘制任何占位内容。

/// 归一化后的项目信息（绘制用）
#[derive(Debug, Clone)]
pub struct NormalizedProject {
    pub name: String,
    pub director: String,
    pub producer: String,
    pub start_date: String,
    pub theme_color: ThemeColor,
    pub logo: Option<Vec<u8>>,
    pub report_title: Option<String>,
}

/// 归一化后的场地信息（绘制用）
#[derive(Debug, Clone)]
pub struct NormalizedLocation {
    pub name: String,
    pub address: String,
    pub category: String,
}

impl ProjectInfo {
    pub fn normalized(&self) -> NormalizedProject {
        NormalizedProject {
            name: self.name.clone(),
            director: fill(&self.director),
            producer: fill(&self.producer),
            start_date: self
                .start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NOT_SET.to_string()),
            theme_color: self.theme_color.unwrap_or_default(),
            logo: self.logo.clone(),
            report_title: self.report_title.clone(),
        }
    }
}

impl LocationInfo {
    pub fn normalized(&self) -> NormalizedLocation {
        NormalizedLocation {
            name: if self.name.is_empty() { NOT_SET.to_string() } else { self.name.clone() },
            address: fill(&self.address),
            category: fill(&self.category),
        }
    }
}

fn fill(value: &Option<String>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => NOT_SET.to_string(),
    }
}

// ============================================
// 排序与分组
// ============================================

/// 按拍摄时间升序排列的照片引用（不修改原列表）
pub fn sorted_by_capture(photos: &[PhotoRecord]) -> Vec<&PhotoRecord> {
    let mut sorted: Vec<&PhotoRecord> = photos.iter().collect();
    sorted.sort_by_key(|p| p.captured_at);
    sorted
}

/// 按场地分组（场地顺序 = 首次出现顺序，以场地名为键）
pub fn group_by_location(
    entries: &[(LocationInfo, PhotoRecord)],
) -> Vec<(LocationInfo, Vec<&PhotoRecord>)> {
    let mut groups: Vec<(LocationInfo, Vec<&PhotoRecord>)> = Vec::new();

    for (location, photo) in entries {
        match groups.iter_mut().find(|(l, _)| l.name == location.name) {
            Some((_, photos)) => photos.push(photo),
            None => groups.push((location.clone(), vec![photo])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn photo(id: &str, ts: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            data: Vec::new(),
            captured_at: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            note: None,
        }
    }

    #[test]
    fn test_normalized_fills_not_set() {
        let project = ProjectInfo { name: "夜航".to_string(), ..Default::default() };
        let n = project.normalized();
        assert_eq!(n.director, NOT_SET);
        assert_eq!(n.producer, NOT_SET);
        assert_eq!(n.start_date, NOT_SET);
    }

    #[test]
    fn test_normalized_keeps_values() {
        let project = ProjectInfo {
            name: "夜航".to_string(),
            director: Some("陈一".to_string()),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            ..Default::default()
        };
        let n = project.normalized();
        assert_eq!(n.director, "陈一");
        assert_eq!(n.start_date, "2026-03-01");
    }

    #[test]
    fn test_sorted_by_capture_does_not_mutate() {
        let photos = vec![
            photo("b", "2026-05-02 10:00:00"),
            photo("a", "2026-05-01 10:00:00"),
            photo("c", "2026-05-03 10:00:00"),
        ];
        let sorted = sorted_by_capture(&photos);
        assert_eq!(sorted[0].id, "a");
        assert_eq!(sorted[2].id, "c");
        // 原列表顺序不变
        assert_eq!(photos[0].id, "b");
    }

    #[test]
    fn test_group_by_location_first_seen_order() {
        let loc_a = LocationInfo { name: "码头".to_string(), ..Default::default() };
        let loc_b = LocationInfo { name: "老街区".to_string(), ..Default::default() };
        let entries = vec![
            (loc_b.clone(), photo("1", "2026-05-01 09:00:00")),
            (loc_a.clone(), photo("2", "2026-05-01 10:00:00")),
            (loc_b.clone(), photo("3", "2026-05-01 11:00:00")),
        ];

        let groups = group_by_location(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.name, "老街区");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0.name, "码头");
    }

    #[test]
    fn test_failure_report() {
        let report = RenderedReport::failure();
        assert!(!report.is_success());
        assert!(report.file_name.is_empty());
    }
}
