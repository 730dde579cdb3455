use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("校验失败: {0}")]
    Validation(String),

    #[error("文件夹不存在: {0}")]
    FolderNotFound(String),

    #[error("图像解码失败: {0}")]
    ImageDecode(String),

    #[error("图像压缩失败: {0}")]
    ImageEncode(String),

    #[error("字体加载失败: {0}")]
    FontLoad(String),

    #[error("PDF生成失败: {0}")]
    PdfGeneration(String),

    #[error("JSON解析错误: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
