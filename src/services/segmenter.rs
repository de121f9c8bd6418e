//! 题目切分服务 - 业务能力层
//!
//! 只负责"把一段原始文本切成四个分区"的能力，不关心排版
//!
//! 单遍、从左到右、不回溯。当前分区是一个显式状态机：
//!
//! ```text
//!            规则2 (编号题干)      规则3 (一句话)    规则4 (简答)     规则5 (论述)
//! 任意状态 ───────────────→ A   ──────────→ B   ─────────→ C   ─────────→ D
//! ```
//!
//! 选项行（规则1）和兜底行（规则6）不会改变状态。

use regex::Regex;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::question::{Category, ClassifiedQuestion, SectionId, Sections};
use crate::utils::compile_pattern;

/// 当前分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentSection {
    #[default]
    None,
    Open(SectionId),
}

/// 单行的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDisposition {
    /// 新的选择题题干（含行内拆出的选项数）
    McqPrompt { inline_options: usize },
    /// 挂到当前选择题下的选项行（一行可能拆出多个选项）
    McqOption { options: usize },
    /// 按关键字归入 B / C / D
    Marked(SectionId),
    /// 没有命中任何规则，追加到当前分区（A 区时作为当前题目的附加行）
    Fallback(SectionId),
    /// 没有打开的选择题，选项行被丢弃
    DroppedOption,
    /// 还没有打开任何分区，行被丢弃
    DroppedFallback,
}

impl LineDisposition {
    pub fn is_dropped(self) -> bool {
        matches!(
            self,
            LineDisposition::DroppedOption | LineDisposition::DroppedFallback
        )
    }
}

/// 切分报告：每个非空行（去掉首尾空白后）及其去向
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentReport {
    pub lines: Vec<(String, LineDisposition)>,
}

impl SegmentReport {
    pub fn dropped(&self) -> usize {
        self.lines.iter().filter(|(_, d)| d.is_dropped()).count()
    }
}

/// 题目切分器
///
/// 职责：
/// - 按固定规则逐行分类
/// - 维护"当前分区"状态
/// - 对无法归类的行静默降级（追加或丢弃），从不报错
pub struct Segmenter {
    numbered_line: Regex,
    inline_option: Regex,
}

impl Segmenter {
    /// 创建切分器
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            numbered_line: compile_pattern(r"^\d+[).:\- ]+")?,
            inline_option: compile_pattern(r"\s([a-d])\)\s")?,
        })
    }

    /// 切分原始文本
    pub fn segment(&self, raw_text: &str) -> Sections {
        self.segment_with_report(raw_text).0
    }

    /// 切分原始文本，并返回每行的去向
    pub fn segment_with_report(&self, raw_text: &str) -> (Sections, SegmentReport) {
        let normalized = raw_text.replace("\r\n", "\n").replace('\r', "\n");

        let mut sections = Sections::new();
        let mut report = SegmentReport::default();
        let mut state = CurrentSection::None;

        for line in normalized.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            let disposition = self.classify(line, &mut state, &mut sections);
            debug!("{:?} ← {}", disposition, line);
            report.lines.push((line.to_string(), disposition));
        }

        info!(
            "✓ 切分完成: A={} B={} C={} D={}，丢弃 {} 行",
            sections.get(SectionId::A).len(),
            sections.get(SectionId::B).len(),
            sections.get(SectionId::C).len(),
            sections.get(SectionId::D).len(),
            report.dropped()
        );

        (sections, report)
    }

    /// 对单行应用规则 1-6（先命中者生效）
    fn classify(
        &self,
        line: &str,
        state: &mut CurrentSection,
        sections: &mut Sections,
    ) -> LineDisposition {
        let lower = line.to_lowercase();

        // 规则1：选项行 a) / b. / c- ...
        if is_option_line(line) {
            return match (*state, sections.get_mut(SectionId::A).last_mut()) {
                (CurrentSection::Open(SectionId::A), Some(question)) => {
                    let pieces = self.split_inline(line);
                    let count = pieces.len();
                    question.options.extend(pieces);
                    LineDisposition::McqOption { options: count }
                }
                _ => LineDisposition::DroppedOption,
            };
        }

        // 规则2：编号题干，且不带分值 / 题型关键字
        if self.numbered_line.is_match(line)
            && !["mark", "short", "long"].iter().any(|k| lower.contains(k))
        {
            let question = self.build_mcq(line);
            let inline_options = question.options.len();
            sections.push(question);
            *state = CurrentSection::Open(SectionId::A);
            return LineDisposition::McqPrompt { inline_options };
        }

        // 规则3-5：按关键字归入 B / C / D，以 "section" 开头的分区标题不参与
        if !lower.starts_with("section") {
            let marked = if ["one-liner", "very short", "1 mark"]
                .iter()
                .any(|k| lower.contains(k))
            {
                Some(Category::OneLiner)
            } else if ["2 mark", "short"].iter().any(|k| lower.contains(k)) {
                Some(Category::Short)
            } else if ["5 mark", "long", "descriptive"]
                .iter()
                .any(|k| lower.contains(k))
            {
                Some(Category::Long)
            } else {
                None
            };

            if let Some(category) = marked {
                sections.push(ClassifiedQuestion::new(category, line));
                *state = CurrentSection::Open(category.section());
                return LineDisposition::Marked(category.section());
            }
        }

        // 规则6：兜底，追加到当前分区
        match *state {
            CurrentSection::None => LineDisposition::DroppedFallback,
            CurrentSection::Open(SectionId::A) => {
                match sections.get_mut(SectionId::A).last_mut() {
                    Some(question) => {
                        question.options.push(line.to_string());
                        LineDisposition::Fallback(SectionId::A)
                    }
                    None => LineDisposition::DroppedFallback,
                }
            }
            CurrentSection::Open(id) => {
                sections.push(ClassifiedQuestion::new(id.category(), line));
                LineDisposition::Fallback(id)
            }
        }
    }

    /// 构建选择题：题干里带有 `a) ... b) ...` 时拆出行内选项
    fn build_mcq(&self, line: &str) -> ClassifiedQuestion {
        let markers: Vec<_> = self
            .inline_option
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .collect();

        let starts_with_a = markers.first().is_some_and(|m| m.as_str() == "a");
        if markers.len() < 2 || !starts_with_a {
            return ClassifiedQuestion::mcq(line, Vec::new());
        }

        let prompt = line[..markers[0].start()].trim();
        let options = split_at(line, markers.iter().map(|m| m.start()));
        ClassifiedQuestion::mcq(prompt, options)
    }

    /// 选项行中可能还带有后续选项：`a) x b) y`
    fn split_inline(&self, line: &str) -> Vec<String> {
        let starts = self
            .inline_option
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.start());
        split_at(line, std::iter::once(0).chain(starts))
    }
}

/// 以 a-d 开头，紧跟 `)`、`.` 或 `-`
fn is_option_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('a'..='d'), Some(')' | '.' | '-'))
    )
}

/// 按起始位置切片，去掉首尾空白，丢掉空片段
fn split_at(line: &str, starts: impl Iterator<Item = usize>) -> Vec<String> {
    let starts: Vec<usize> = starts.collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(line.len());
            line[start..end].trim()
        })
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
