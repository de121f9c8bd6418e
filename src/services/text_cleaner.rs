//! AI 输出清洗 - 业务能力层
//!
//! 模型返回的试卷前后常带寒暄和重复的页眉信息，切分前先去掉。

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{AppResult, LlmError};
use crate::utils::compile_line_patterns;

/// 默认清洗规则（整行、不区分大小写，匹配前先去首尾空白）
pub const DEFAULT_CLEANUP_PATTERNS: [&str; 8] = [
    r"^okay,? here is.*question paper.*$",
    r"^here is a question paper based on the provided material.*$",
    r"^lj polytechnic$",
    r"^fundamentals of ai.*question paper$",
    r"^subject:.*$",
    r"^exam title:.*$",
    r"^total marks:.*$",
    r"^time:.*$",
];

/// 文本清洗器
///
/// 职责：
/// - 丢弃空行
/// - 丢弃匹配清洗规则的整行
/// - 识别上游返回的错误文本
pub struct TextCleaner {
    patterns: Vec<Regex>,
}

impl TextCleaner {
    pub fn new() -> AppResult<Self> {
        let defaults: Vec<String> = DEFAULT_CLEANUP_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect();
        Self::with_patterns(&defaults)
    }

    pub fn with_patterns(patterns: &[String]) -> AppResult<Self> {
        Ok(Self {
            patterns: compile_line_patterns(patterns)?,
        })
    }

    /// 清洗文本，返回以 `\n` 连接的剩余行（保留行内原样）
    pub fn clean(&self, raw_text: &str) -> String {
        let mut removed = 0usize;
        let kept: Vec<&str> = raw_text
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                if self.patterns.iter().any(|p| p.is_match(trimmed)) {
                    debug!("清洗掉: {}", trimmed);
                    removed += 1;
                    return false;
                }
                true
            })
            .collect();

        if removed > 0 {
            debug!("共清洗 {} 行", removed);
        }
        kept.join("\n")
    }

    /// 检查上游返回是否可用
    ///
    /// 空文本或以 `error` 开头（不区分大小写）的文本视为上游失败。
    pub fn check_upstream(raw_text: &str) -> Result<(), LlmError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            warn!("⚠️ 上游返回为空");
            return Err(LlmError::UpstreamError {
                message: "empty response".to_string(),
            });
        }
        if trimmed.to_lowercase().starts_with("error") {
            warn!("⚠️ 上游返回错误: {}", trimmed);
            return Err(LlmError::UpstreamError {
                message: trimmed.to_string(),
            });
        }
        Ok(())
    }
}
