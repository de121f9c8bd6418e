use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// 渲染参数（对一次渲染调用只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentParams {
    /// 考试名称（页眉左侧）
    pub exam_title: String,
    /// 科目 / 文件标题（页眉居中）
    pub subject: String,
    /// 考试时长（页眉右侧）
    pub time: String,
    /// 总分
    pub total_marks: u32,
}

impl DocumentParams {
    pub fn new(
        exam_title: impl Into<String>,
        subject: impl Into<String>,
        time: impl Into<String>,
        total_marks: u32,
    ) -> Self {
        Self {
            exam_title: exam_title.into(),
            subject: subject.into(),
            time: time.into(),
            total_marks,
        }
    }

    /// 页眉显示的科目：只保留第一个 `#` 之前的内容
    pub fn sanitized_subject(&self) -> &str {
        self.subject.split('#').next().unwrap_or_default().trim()
    }

    /// 校验参数结构
    ///
    /// 渲染器假设参数合法，调用方应在调用前完成校验；渲染入口也会再检查一次。
    pub fn validate(&self) -> AppResult<()> {
        if self.exam_title.trim().is_empty() {
            return Err(AppError::invalid_params("exam_title", "不能为空"));
        }
        if self.sanitized_subject().is_empty() {
            return Err(AppError::invalid_params("subject", "不能为空"));
        }
        if self.time.trim().is_empty() {
            return Err(AppError::invalid_params("time", "不能为空"));
        }
        if self.total_marks == 0 {
            return Err(AppError::invalid_params("total_marks", "必须大于等于 1"));
        }
        Ok(())
    }
}

/// AI 出题参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub total_marks: u32,
    pub mcq_count: u32,
    pub one_liner_count: u32,
    pub short_count: u32,
    pub long_count: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            total_marks: 50,
            mcq_count: 5,
            one_liner_count: 5,
            short_count: 5,
            long_count: 2,
        }
    }
}
