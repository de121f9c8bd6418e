use serde::{Deserialize, Serialize};

use super::params::DocumentParams;
use super::question::{Category, ClassifiedQuestion, Sections};

/// 手动录入的试卷（TOML 文件）
///
/// ```toml
/// exam_title = "LJ Polytechnic"
/// subject = "Fundamentals of AI"
/// time = "2 Hours"
/// total_marks = 50
/// mcqs = ["What is AI?\na) Rule-based\nb) Learning"]
/// one_liners = ["Define an agent."]
/// shorts = []
/// longs = []
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualPaper {
    #[serde(flatten)]
    pub params: DocumentParams,
    /// 每道选择题：第一行是题干，之后每行一个选项
    #[serde(default)]
    pub mcqs: Vec<String>,
    #[serde(default)]
    pub one_liners: Vec<String>,
    #[serde(default)]
    pub shorts: Vec<String>,
    #[serde(default)]
    pub longs: Vec<String>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ManualPaper {
    /// 转换为四个分区
    ///
    /// 空白条目会被跳过；编号由渲染器在手动样式下添加。
    pub fn to_sections(&self) -> Sections {
        let mut sections = Sections::new();

        for entry in &self.mcqs {
            let mut lines = entry
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty());
            if let Some(prompt) = lines.next() {
                let options = lines.map(str::to_string).collect();
                sections.push(ClassifiedQuestion::mcq(prompt, options));
            }
        }

        let plain = [
            (Category::OneLiner, &self.one_liners),
            (Category::Short, &self.shorts),
            (Category::Long, &self.longs),
        ];
        for (category, entries) in plain {
            for entry in entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
                sections.push(ClassifiedQuestion::new(category, entry));
            }
        }

        sections
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
