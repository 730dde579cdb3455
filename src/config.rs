use crate::compress::CompressionConfig;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置（~/.config/scene-report/config.json）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// 中文字体文件路径（TTF）。未设置时使用PDF内置字体，
    /// 中文文本在部分阅读器中无法正常显示。
    pub font_path: Option<PathBuf>,

    /// 压缩参数。阈值经手工调校，一般无需修改。
    #[serde(default)]
    pub compression: CompressionConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReportError::Config("找不到用户主目录".into()))?;
        Ok(home.join(".config").join("scene-report").join("config.json"))
    }

    pub fn set_font_path(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(ReportError::FontLoad(path.display().to_string()));
        }
        self.font_path = Some(path);
        self.save()
    }

    /// 读取配置的字体文件内容（未配置时返回None）
    pub fn load_font(&self) -> Result<Option<Vec<u8>>> {
        match &self.font_path {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .map_err(|e| ReportError::FontLoad(format!("{}: {}", path.display(), e)))?;
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.font_path.is_none());
        assert_eq!(config.compression.max_dimension, 800);
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.compression.size_threshold, config.compression.size_threshold);
    }

    #[test]
    fn test_compression_defaults_when_absent() {
        // 旧配置文件没有compression字段时回退到默认值
        let parsed: Config = serde_json::from_str(r#"{"font_path": null}"#).unwrap();
        assert_eq!(parsed.compression.max_dimension, 800);
        assert!((parsed.compression.quality_ceiling - 0.4).abs() < f32::EPSILON);
    }
}
