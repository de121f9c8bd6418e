//! 试卷处理上下文
//!
//! 封装"我正在处理哪一份试卷、用什么页眉参数"这一信息

use std::fmt::Display;

use chrono::NaiveDate;

use crate::models::params::DocumentParams;

/// 试卷处理上下文
///
/// 包含处理单份试卷所需的所有上下文信息，显式传入流程，不依赖任何全局状态
#[derive(Debug, Clone)]
pub struct PaperCtx {
    /// 试卷序号（仅用于日志显示）
    pub paper_index: usize,

    /// 来源说明（文件名等）
    pub source: String,

    /// 页眉参数
    pub params: DocumentParams,

    /// 输出文件名中的日期
    pub date: NaiveDate,
}

impl PaperCtx {
    /// 创建新的试卷上下文，日期取本地当天
    pub fn new(paper_index: usize, source: impl Into<String>, params: DocumentParams) -> Self {
        Self {
            paper_index,
            source: source.into(),
            params,
            date: chrono::Local::now().date_naive(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// 输出文件名：`question_paper_YYYYMMDD{suffix}.{extension}`
    pub fn file_name(&self, suffix: &str, extension: &str) -> String {
        format!(
            "question_paper_{}{}.{}",
            self.date.format("%Y%m%d"),
            suffix,
            extension
        )
    }
}

impl Display for PaperCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[试卷 #{} 来源#{} 科目#{}]",
            self.paper_index,
            self.source,
            self.params.sanitized_subject()
        )
    }
}
