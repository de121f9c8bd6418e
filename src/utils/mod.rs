pub mod logger;
pub mod logging;
pub mod text_wrap;

use regex::Regex;

use crate::error::{AppResult, ConfigError};

pub use text_wrap::word_wrap;

/// 编译正则，失败时带上原始表达式
pub fn compile_pattern(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|source| {
        ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
        .into()
    })
}

/// 编译一组不区分大小写的整行匹配规则
pub fn compile_line_patterns(patterns: &[String]) -> AppResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| compile_pattern(&format!("(?i){}", p)))
        .collect()
}
