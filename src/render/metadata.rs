//! PDF文档元数据
//!
//! printpdf不提供作者/主题/关键词的写入口，序列化后用lopdf
//! 直接改写trailer的Info字典。

use crate::error::{ReportError, Result};
use lopdf::{dictionary, Document, Object, StringFormat};

/// 输出文档的Info字典内容
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    /// 标题 = 生成的文件名
    pub title: String,
    /// 创建者/作者 = 应用名常量
    pub author: String,
    /// 固定“场景报告”
    pub subject: String,
    /// 项目名与场地名的逗号列表
    pub keywords: String,
}

/// 重写Info字典后重新序列化
pub fn apply_info(bytes: &[u8], meta: &DocumentMeta) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|e| ReportError::PdfGeneration(format!("解析输出文档失败: {}", e)))?;

    let info = doc.add_object(dictionary! {
        "Title" => pdf_string(&meta.title),
        "Author" => pdf_string(&meta.author),
        "Creator" => pdf_string(&meta.author),
        "Subject" => pdf_string(&meta.subject),
        "Keywords" => pdf_string(&meta.keywords),
    });
    doc.trailer.set("Info", info);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| ReportError::PdfGeneration(format!("写出文档失败: {}", e)))?;
    Ok(out)
}

/// PDF文本串：纯ASCII走字面量，含中文时编码为带BOM的UTF-16BE
fn pdf_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}
