//! 保留格式排版服务 - 业务能力层
//!
//! 不做题目分类，只把原文重新折行分页：去掉强调标记、过滤固定的机构 / 标题行，
//! 识别 "Section X" 标题并居中加粗。

use regex::Regex;
use tracing::{debug, info};

use super::paper_renderer::draw_header;
use crate::error::AppResult;
use crate::infrastructure::{FontFace, LayoutCursor, PdfCanvas, RenderedDocument, A4_HEIGHT, A4_WIDTH};
use crate::models::params::DocumentParams;
use crate::utils::{compile_line_patterns, compile_pattern, word_wrap};

/// 默认过滤的固定行（整行、不区分大小写）
pub const DEFAULT_BOILERPLATE: [&str; 2] = [
    r"^lj polytechnic$",
    r"^fundamentals of ai.*question paper$",
];

const BODY_FACE: FontFace = FontFace::TimesRoman;
const BODY_SIZE: f32 = 12.0;
const BODY_LINE: f32 = 16.0;
const HEADING_SIZE: f32 = 14.0;
const HEADING_LINE: f32 = 22.0;
const BOTTOM: f32 = 60.0;
const RESUME: f32 = 40.0;
const MARGIN: f32 = 30.0;

/// 去掉 `**` 和 `##` 强调标记
pub fn strip_emphasis(raw_text: &str) -> String {
    raw_text.replace("**", "").replace("##", "")
}

/// 保留格式排版器
pub struct PreserveRenderer {
    skip_patterns: Vec<Regex>,
    section_header: Regex,
    page_width: f32,
    page_height: f32,
}

impl PreserveRenderer {
    /// 使用默认过滤规则
    pub fn new() -> AppResult<Self> {
        let defaults: Vec<String> = DEFAULT_BOILERPLATE.iter().map(|p| p.to_string()).collect();
        Self::with_skip_patterns(&defaults)
    }

    /// 使用自定义过滤规则（整行匹配，不区分大小写）
    pub fn with_skip_patterns(patterns: &[String]) -> AppResult<Self> {
        Ok(Self {
            skip_patterns: compile_line_patterns(patterns)?,
            section_header: compile_pattern(r"(?i)^\s*section\b\s*[-:]?\s*[a-z]\b")?,
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
        })
    }

    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// 是否是分区标题行（如 `Section A:`、`Section - B`、`section c`）
    pub fn is_section_header(&self, line: &str) -> bool {
        self.section_header.is_match(line.trim())
    }

    /// 是否是需要过滤的固定行
    pub fn is_boilerplate(&self, line: &str) -> bool {
        let normalized = line.trim().to_lowercase();
        self.skip_patterns.iter().any(|p| p.is_match(&normalized))
    }

    /// 预处理：去强调标记、切行、过滤固定行
    pub fn prepare_lines(&self, raw_text: &str) -> Vec<String> {
        let stripped = strip_emphasis(raw_text);
        let normalized = stripped.replace("\r\n", "\n").replace('\r', "\n");
        normalized
            .split('\n')
            .filter(|line| {
                let skip = self.is_boilerplate(line);
                if skip {
                    debug!("过滤固定行: {}", line.trim());
                }
                !skip
            })
            .map(str::to_string)
            .collect()
    }

    /// 渲染为 PDF 字节
    pub fn render(&self, raw_text: &str, params: &DocumentParams) -> AppResult<Vec<u8>> {
        Ok(self.layout(raw_text, params)?.to_pdf_bytes())
    }

    /// 排版为显示列表
    pub fn layout(&self, raw_text: &str, params: &DocumentParams) -> AppResult<RenderedDocument> {
        params.validate()?;

        let mut canvas = PdfCanvas::new(self.page_width, self.page_height);
        let mut cursor = LayoutCursor::new(draw_header(&mut canvas, params)?);
        let max_width = self.page_width - 2.0 * MARGIN;
        let resume = self.page_height - RESUME;

        cursor.set_font(&mut canvas, BODY_FACE, BODY_SIZE);

        let mut headers = 0usize;
        for line in self.prepare_lines(raw_text) {
            if self.is_section_header(&line) {
                cursor.ensure_space(&mut canvas, BOTTOM, resume);
                cursor.set_font(&mut canvas, FontFace::HelveticaBold, HEADING_SIZE);
                canvas.draw_centered_string(cursor.y(), line.trim())?;
                cursor.advance(HEADING_LINE);
                cursor.set_font(&mut canvas, BODY_FACE, BODY_SIZE);
                headers += 1;
                continue;
            }

            for wrapped in word_wrap(&line, BODY_FACE, BODY_SIZE, max_width) {
                cursor.ensure_space(&mut canvas, BOTTOM, resume);
                canvas.draw_string(MARGIN, cursor.y(), &wrapped)?;
                cursor.advance(BODY_LINE);
            }
        }

        let document = canvas.finish();
        info!(
            "✓ 保留格式排版完成: {} 个分区标题, {} 页",
            headers,
            document.page_count()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PreserveRenderer {
        PreserveRenderer::new().unwrap()
    }

    fn params() -> DocumentParams {
        DocumentParams::new("LJ Polytechnic", "Question Paper", "2 Hours", 50)
    }

    #[test]
    fn test_section_header_detection() {
        let r = renderer();
        assert!(r.is_section_header("Section - B: One-liners"));
        assert!(r.is_section_header("  Section A:"));
        assert!(r.is_section_header("SECTION c"));
        assert!(r.is_section_header("Section:D"));
        assert!(!r.is_section_header("Sections are listed below"));
        assert!(!r.is_section_header("Section Alpha"));
        assert!(!r.is_section_header("1. Section A covers MCQs"));
    }

    #[test]
    fn test_boilerplate_is_whole_line_and_case_insensitive() {
        let r = renderer();
        assert!(r.is_boilerplate("LJ Polytechnic"));
        assert!(r.is_boilerplate("  Fundamentals of AI - Question Paper "));
        assert!(!r.is_boilerplate("LJ Polytechnic, Ahmedabad"));
    }

    #[test]
    fn test_prepare_lines_strips_markers_and_boilerplate() {
        let lines = renderer().prepare_lines("**LJ Polytechnic**\n## Section A\nWhat is **AI**?");
        assert_eq!(lines, vec![" Section A", "What is AI?"]);
    }

    #[test]
    fn test_header_is_centered_bold_and_not_wrapped() {
        let doc = renderer()
            .layout("LJ Polytechnic\nSection - B: One-liners\nDefine an agent.", &params())
            .unwrap();

        let texts: Vec<_> = doc.texts().collect();
        let heading = texts
            .iter()
            .find(|t| t.text == "Section - B: One-liners")
            .unwrap();
        assert_eq!(heading.face, FontFace::HelveticaBold);
        assert_eq!(heading.size, HEADING_SIZE);
        let width = FontFace::HelveticaBold.string_width(&heading.text, HEADING_SIZE);
        assert!((heading.x - (A4_WIDTH - width) / 2.0).abs() < 1e-3);

        let body = texts.iter().find(|t| t.text == "Define an agent.").unwrap();
        assert_eq!((body.face, body.x), (BODY_FACE, MARGIN));
        assert!((heading.y - body.y - HEADING_LINE).abs() < 1e-3);

        // 页眉里的考试名称保留，正文里的固定行被过滤
        assert_eq!(texts.iter().filter(|t| t.text == "LJ Polytechnic").count(), 1);
    }

    #[test]
    fn test_blank_lines_take_no_space() {
        let doc = renderer().layout("first\n\n\nsecond", &params()).unwrap();
        let texts: Vec<_> = doc.texts().collect();
        let first = texts.iter().find(|t| t.text == "first").unwrap();
        let second = texts.iter().find(|t| t.text == "second").unwrap();
        assert!((first.y - second.y - BODY_LINE).abs() < 1e-3);
    }

    #[test]
    fn test_long_text_breaks_pages_and_restores_font() {
        let raw = (1..=120)
            .map(|i| format!("{}. A line of ordinary question text.", i))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = renderer().layout(&raw, &params()).unwrap();
        assert!(doc.page_count() >= 3);
        for page in &doc.pages[1..] {
            let first = page.texts().next().unwrap();
            assert_eq!((first.face, first.size), (BODY_FACE, BODY_SIZE));
            assert!((first.y - (A4_HEIGHT - RESUME)).abs() < 1e-3);
        }
        assert!(doc.texts().all(|t| t.y >= BOTTOM));
    }

    #[test]
    fn test_custom_patterns_replace_defaults() {
        let r = PreserveRenderer::with_skip_patterns(&["^draft$".to_string()]).unwrap();
        assert!(r.is_boilerplate("DRAFT"));
        assert!(!r.is_boilerplate("LJ Polytechnic"));
        assert!(PreserveRenderer::with_skip_patterns(&["(".to_string()]).is_err());
    }
}
