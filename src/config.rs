use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::params::{DocumentParams, GenerationParams};
use crate::services::preserve_renderer::DEFAULT_BOILERPLATE;
use crate::services::text_cleaner::DEFAULT_CLEANUP_PATTERNS;

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 生成文件的输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 页眉默认值 ---
    pub exam_title: String,
    pub subject: String,
    pub time: String,
    pub total_marks: u32,
    // --- 出题数量 ---
    pub mcq_count: u32,
    pub one_liner_count: u32,
    pub short_count: u32,
    pub long_count: u32,
    // --- 文本过滤 ---
    /// 保留格式模式下过滤的固定行
    pub boilerplate_patterns: Vec<String>,
    /// 切分前清洗 AI 输出的规则
    pub cleanup_patterns: Vec<String>,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            verbose_logging: false,
            exam_title: "LJ Polytechnic".to_string(),
            subject: "Fundamentals of AI".to_string(),
            time: "2 Hours".to_string(),
            total_marks: 50,
            mcq_count: 5,
            one_liner_count: 5,
            short_count: 5,
            long_count: 2,
            boilerplate_patterns: DEFAULT_BOILERPLATE.iter().map(|p| p.to_string()).collect(),
            cleanup_patterns: DEFAULT_CLEANUP_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai/".to_string(),
            llm_model_name: "gemini-2.0-flash".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置或无法解析时使用默认值
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// 从 TOML 文件加载，文件中缺省的字段使用默认值；环境变量仍然优先
    pub async fn from_toml_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config.overlay_env())
    }

    fn overlay_env(self) -> Self {
        Self {
            output_dir: env_or("OUTPUT_DIR", self.output_dir),
            verbose_logging: env_parse("VERBOSE_LOGGING", self.verbose_logging),
            exam_title: env_or("EXAM_TITLE", self.exam_title),
            subject: env_or("SUBJECT", self.subject),
            time: env_or("EXAM_TIME", self.time),
            total_marks: env_parse("TOTAL_MARKS", self.total_marks),
            mcq_count: env_parse("MCQ_COUNT", self.mcq_count),
            one_liner_count: env_parse("ONE_LINER_COUNT", self.one_liner_count),
            short_count: env_parse("SHORT_COUNT", self.short_count),
            long_count: env_parse("LONG_COUNT", self.long_count),
            boilerplate_patterns: self.boilerplate_patterns,
            cleanup_patterns: self.cleanup_patterns,
            llm_api_key: env_or("LLM_API_KEY", self.llm_api_key),
            llm_api_base_url: env_or("LLM_API_BASE_URL", self.llm_api_base_url),
            llm_model_name: env_or("LLM_MODEL_NAME", self.llm_model_name),
        }
    }

    /// 页眉参数
    pub fn document_params(&self) -> DocumentParams {
        DocumentParams::new(
            self.exam_title.clone(),
            self.subject.clone(),
            self.time.clone(),
            self.total_marks,
        )
    }

    /// 出题参数
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            total_marks: self.total_marks,
            mcq_count: self.mcq_count,
            one_liner_count: self.one_liner_count,
            short_count: self.short_count,
            long_count: self.long_count,
        }
    }
}

fn env_or(var: &str, default: String) -> String {
    std::env::var(var).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.document_params().exam_title, "LJ Polytechnic");
        assert_eq!(config.generation_params(), GenerationParams::default());
        assert!(config.llm_api_key.is_empty());
        assert_eq!(config.boilerplate_patterns.len(), 2);
    }

    #[tokio::test]
    async fn test_from_toml_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "subject = \"Machine Learning\"\nmcq_count = 10\n")
            .await
            .unwrap();

        let config = Config::from_toml_file(&path).await.unwrap();
        assert_eq!(config.mcq_count, 10);
        assert_eq!(config.time, "2 Hours");
        assert_eq!(config.cleanup_patterns.len(), DEFAULT_CLEANUP_PATTERNS.len());
    }

    #[tokio::test]
    async fn test_from_toml_file_rejects_bad_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "total_marks = \"fifty\"\n").await.unwrap();

        assert!(Config::from_toml_file(&path).await.is_err());
    }
}
