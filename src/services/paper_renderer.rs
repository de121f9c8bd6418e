//! 试卷排版服务 - 业务能力层（结构化模式）
//!
//! 把四个分区排到固定大小的页面上：页眉色带、注意事项框、分区标题、
//! 折行后的题目，纵向空间不足时换页。

use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::{
    FontFace, LayoutCursor, PdfCanvas, RenderedDocument, Rgb, A4_HEIGHT, A4_WIDTH,
};
use crate::models::params::DocumentParams;
use crate::models::question::{ClassifiedQuestion, SectionId, Sections};
use crate::utils::word_wrap;

/// 页眉主色 #003366
pub const BRAND: u32 = 0x003366;

/// 页眉以下内容的起始位置（相对页高）
const HEADER_BOTTOM: f32 = 105.0;
/// 正文行的换页阈值
const BODY_BOTTOM: f32 = 60.0;
/// 选项行的换页阈值
const OPTION_BOTTOM: f32 = 40.0;
/// 行内换页后从页顶往下的距离
const LINE_RESUME: f32 = 40.0;
/// 分区标题换页后从页顶往下的距离
const SECTION_RESUME: f32 = 60.0;

const BODY_SIZE: f32 = 12.0;
const LEFT: f32 = 30.0;
const OPTION_LEFT: f32 = 70.0;
/// 题干折行宽度
const PROMPT_WIDTH: f32 = 500.0;
/// 选项折行宽度
const OPTION_WIDTH: f32 = 470.0;

const INSTRUCTION_LINE: &str =
    "1. Answer all questions.  2. Marks are indicated against each question.";

/// 排版样式常量
///
/// AI 切分出来的题目自带编号；手动录入的题目由排版器按分区编号。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutStyle {
    /// 注意事项框之后的下移量
    pub after_instructions: f32,
    /// 分区前的间距
    pub section_gap: f32,
    /// 分区开始时低于此值换页
    pub section_break_at: f32,
    pub title_size: f32,
    /// 标题到副标题
    pub title_advance: f32,
    pub subtitle_face: FontFace,
    /// 副标题 / 分区说明的行高
    pub subtitle_advance: f32,
    pub mcq_line: f32,
    pub option_line: f32,
    pub body_line: f32,
    /// 分区结束后的间距
    pub after_section: f32,
    /// 是否按分区添加 `1.` `2.` 编号
    pub numbered: bool,
}

impl LayoutStyle {
    /// AI 生成文本切分后的样式
    pub const fn segmented() -> Self {
        Self {
            after_instructions: 60.0,
            section_gap: 25.0,
            section_break_at: 100.0,
            title_size: 15.0,
            title_advance: 20.0,
            subtitle_face: FontFace::HelveticaBold,
            subtitle_advance: 16.0,
            mcq_line: 16.0,
            option_line: 14.0,
            body_line: 18.0,
            after_section: 10.0,
            numbered: false,
        }
    }

    /// 手动录入题目的样式
    pub const fn manual() -> Self {
        Self {
            after_instructions: 70.0,
            section_gap: 20.0,
            section_break_at: 120.0,
            title_size: 14.0,
            title_advance: 18.0,
            subtitle_face: FontFace::Helvetica,
            subtitle_advance: 16.0,
            mcq_line: 16.0,
            option_line: 14.0,
            body_line: 18.0,
            after_section: 20.0,
            numbered: true,
        }
    }
}

/// 试卷排版器
///
/// 职责：
/// - 绘制页眉和注意事项
/// - 按 A→B→C→D 顺序排版题目
/// - 不做题目分类
#[derive(Debug, Clone, Copy)]
pub struct PaperRenderer {
    style: LayoutStyle,
    page_width: f32,
    page_height: f32,
}

impl PaperRenderer {
    pub fn new(style: LayoutStyle) -> Self {
        Self {
            style,
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
        }
    }

    pub fn segmented() -> Self {
        Self::new(LayoutStyle::segmented())
    }

    pub fn manual() -> Self {
        Self::new(LayoutStyle::manual())
    }

    /// 自定义纸张大小（默认 A4）
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// 渲染为 PDF 字节
    pub fn render(&self, sections: &Sections, params: &DocumentParams) -> AppResult<Vec<u8>> {
        let document = self.layout(sections, params)?;
        Ok(document.to_pdf_bytes())
    }

    /// 排版为显示列表
    pub fn layout(
        &self,
        sections: &Sections,
        params: &DocumentParams,
    ) -> AppResult<RenderedDocument> {
        params.validate()?;

        let mut canvas = PdfCanvas::new(self.page_width, self.page_height);
        let header_bottom = draw_header(&mut canvas, params)?;
        let mut cursor = LayoutCursor::new(header_bottom);
        draw_instructions(&mut canvas, &mut cursor)?;
        cursor.advance(self.style.after_instructions);

        for (id, questions) in sections.iter() {
            self.draw_section(&mut canvas, &mut cursor, id, questions)?;
        }

        let document = canvas.finish();
        info!(
            "✓ 排版完成: {} 道题, {} 页",
            sections.total(),
            document.page_count()
        );
        Ok(document)
    }

    fn draw_section(
        &self,
        canvas: &mut PdfCanvas,
        cursor: &mut LayoutCursor,
        id: SectionId,
        questions: &[ClassifiedQuestion],
    ) -> AppResult<()> {
        let style = &self.style;

        cursor.advance(style.section_gap);
        if cursor.y() < style.section_break_at {
            cursor.break_page(canvas, self.page_height - SECTION_RESUME);
        }

        canvas.set_fill_color(Rgb::from_hex(BRAND));
        cursor.set_font(canvas, FontFace::HelveticaBold, style.title_size);
        canvas.draw_string(LEFT, cursor.y(), id.title())?;
        cursor.advance(style.title_advance);

        canvas.set_fill_color(Rgb::BLACK);
        cursor.set_font(canvas, style.subtitle_face, BODY_SIZE);
        canvas.draw_string(LEFT, cursor.y(), id.subtitle())?;
        cursor.advance(style.subtitle_advance);

        if let Some(instruction) = id.instruction() {
            cursor.set_font(canvas, FontFace::HelveticaOblique, 11.0);
            canvas.draw_string(LEFT, cursor.y(), instruction)?;
            cursor.advance(style.subtitle_advance);
        }

        debug!("{}: {} 道题", id, questions.len());

        cursor.set_font(canvas, FontFace::Helvetica, BODY_SIZE);
        let is_mcq = id == SectionId::A;
        let prompt_width = PROMPT_WIDTH.min(self.page_width - 2.0 * LEFT);
        let option_width = OPTION_WIDTH.min(prompt_width - LEFT);
        let resume = self.page_height - LINE_RESUME;

        for (index, question) in questions.iter().enumerate() {
            let prompt = if style.numbered {
                format!("{}. {}", index + 1, question.prompt.trim())
            } else {
                question.prompt.clone()
            };
            let advance = if is_mcq { style.mcq_line } else { style.body_line };

            for line in word_wrap(&prompt, FontFace::Helvetica, BODY_SIZE, prompt_width) {
                cursor.ensure_space(canvas, BODY_BOTTOM, resume);
                canvas.draw_string(LEFT, cursor.y(), &line)?;
                cursor.advance(advance);
            }

            if !is_mcq {
                continue;
            }
            for option in &question.options {
                for line in word_wrap(option, FontFace::Helvetica, BODY_SIZE, option_width) {
                    cursor.ensure_space(canvas, OPTION_BOTTOM, resume);
                    canvas.draw_string(OPTION_LEFT, cursor.y(), &line)?;
                    cursor.advance(style.option_line);
                }
            }
        }

        cursor.advance(style.after_section);
        Ok(())
    }
}

/// 绘制页眉色带：左侧考试名称、右侧时长、居中科目和总分
///
/// # 返回
/// 页眉下方内容的起始纵坐标
pub(crate) fn draw_header(canvas: &mut PdfCanvas, params: &DocumentParams) -> AppResult<f32> {
    let width = canvas.width();
    let height = canvas.height();

    canvas.set_fill_color(Rgb::from_hex(BRAND));
    canvas.rect(0.0, height - 90.0, width, 70.0, true, false);

    canvas.set_fill_color(Rgb::WHITE);
    canvas.set_font(FontFace::HelveticaBold, 20.0);
    canvas.draw_string(35.0, height - 40.0, &params.exam_title)?;

    canvas.set_font(FontFace::Helvetica, 13.0);
    canvas.draw_right_string(width - 35.0, height - 40.0, &format!("Time: {}", params.time))?;

    canvas.set_font(FontFace::HelveticaBold, 16.0);
    canvas.draw_centered_string(height - 60.0, params.sanitized_subject())?;

    canvas.set_font(FontFace::HelveticaBold, 13.0);
    canvas.draw_centered_string(
        height - 78.0,
        &format!("Total Marks: {}", params.total_marks),
    )?;

    canvas.set_fill_color(Rgb::BLACK);
    Ok(height - HEADER_BOTTOM)
}

/// 绘制注意事项圆角框（不移动游标）
fn draw_instructions(canvas: &mut PdfCanvas, cursor: &mut LayoutCursor) -> AppResult<()> {
    let y = cursor.y();
    let box_width = canvas.width() - 50.0;
    canvas.set_stroke_color(Rgb::from_hex(BRAND));
    canvas.set_line_width(1.0);
    canvas.round_rect(25.0, y - 40.0, box_width, 40.0, 8.0);

    cursor.set_font(canvas, FontFace::HelveticaBold, BODY_SIZE);
    canvas.draw_string(35.0, y - 18.0, "Instructions:")?;
    cursor.set_font(canvas, FontFace::Helvetica, BODY_SIZE);
    canvas.draw_string(55.0, y - 32.0, INSTRUCTION_LINE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::TextOp;
    use crate::models::question::Category;

    fn params() -> DocumentParams {
        DocumentParams::new("LJ Polytechnic", "Fundamentals of AI # draft", "2 Hours", 50)
    }

    fn one_per_section() -> Sections {
        let mut sections = Sections::new();
        sections.push(ClassifiedQuestion::mcq(
            "1. What is AI?",
            vec!["a) Rule-based".into(), "b) Learning".into()],
        ));
        sections.push(ClassifiedQuestion::new(Category::OneLiner, "Define an agent."));
        sections.push(ClassifiedQuestion::new(Category::Short, "2 mark: Define ML."));
        sections.push(ClassifiedQuestion::new(Category::Long, "Explain A* search."));
        sections
    }

    fn find<'a>(doc: &'a RenderedDocument, text: &str) -> &'a TextOp {
        doc.texts()
            .find(|t| t.text == text)
            .unwrap_or_else(|| panic!("missing text {:?}", text))
    }

    #[test]
    fn test_header_contents() {
        let doc = PaperRenderer::segmented()
            .layout(&Sections::new(), &params())
            .unwrap();

        let title = find(&doc, "LJ Polytechnic");
        assert_eq!((title.x, title.face, title.size), (35.0, FontFace::HelveticaBold, 20.0));

        let time = find(&doc, "Time: 2 Hours");
        let time_width = FontFace::Helvetica.string_width("Time: 2 Hours", 13.0);
        assert!((time.x + time_width - (A4_WIDTH - 35.0)).abs() < 1e-3);

        let subject = find(&doc, "Fundamentals of AI");
        assert!((subject.y - (A4_HEIGHT - 60.0)).abs() < 1e-3);
        find(&doc, "Total Marks: 50");
        find(&doc, "Instructions:");
    }

    #[test]
    fn test_sections_render_in_fixed_order_even_when_empty() {
        let doc = PaperRenderer::segmented()
            .layout(&Sections::new(), &params())
            .unwrap();
        let titles: Vec<&str> = doc
            .texts()
            .filter(|t| t.text.starts_with("Section - "))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(titles, vec!["Section - A", "Section - B", "Section - C", "Section - D"]);
    }

    #[test]
    fn test_segmented_style_keeps_source_numbering() {
        let doc = PaperRenderer::segmented()
            .layout(&one_per_section(), &params())
            .unwrap();
        find(&doc, "1. What is AI?");
        find(&doc, "Define an agent.");
        assert!(doc.texts().all(|t| t.text != "1. Define an agent."));
    }

    #[test]
    fn test_manual_style_numbers_each_section() {
        let mut sections = Sections::new();
        sections.push(ClassifiedQuestion::mcq("What is AI?", vec!["a) x".into()]));
        sections.push(ClassifiedQuestion::new(Category::Short, "Define ML."));
        sections.push(ClassifiedQuestion::new(Category::Short, "Define DL."));

        let doc = PaperRenderer::manual().layout(&sections, &params()).unwrap();
        find(&doc, "1. What is AI?");
        find(&doc, "1. Define ML.");
        find(&doc, "2. Define DL.");
    }

    #[test]
    fn test_options_are_indented() {
        let doc = PaperRenderer::segmented()
            .layout(&one_per_section(), &params())
            .unwrap();
        let prompt = find(&doc, "1. What is AI?");
        let option = find(&doc, "a) Rule-based");
        assert_eq!(prompt.x, LEFT);
        assert_eq!(option.x, OPTION_LEFT);
        assert!((prompt.y - option.y - 16.0).abs() < 1e-3);
        let next = find(&doc, "b) Learning");
        assert!((option.y - next.y - 14.0).abs() < 1e-3);
    }

    #[test]
    fn test_questions_use_body_font_after_instructions() {
        let doc = PaperRenderer::manual()
            .layout(&one_per_section(), &params())
            .unwrap();
        let short = find(&doc, "1. 2 mark: Define ML.");
        assert_eq!((short.face, short.size), (FontFace::Helvetica, 12.0));
    }

    #[test]
    fn test_four_questions_fit_on_one_a4_page() {
        let doc = PaperRenderer::segmented()
            .layout(&one_per_section(), &params())
            .unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_short_page_overflows_to_more_pages() {
        let doc = PaperRenderer::segmented()
            .with_page_size(300.0, 400.0)
            .layout(&one_per_section(), &params())
            .unwrap();
        assert!(doc.page_count() > 1);
        // 换页后字体被显式恢复，每一行都带着正文字体
        let last_page = doc.pages.last().unwrap();
        assert!(last_page.texts().count() > 0);
    }

    #[test]
    fn test_line_breaks_resume_at_top_with_font_restored() {
        let mut sections = Sections::new();
        for i in 0..80 {
            sections.push(ClassifiedQuestion::new(
                Category::Long,
                format!("Q{} Explain something at length.", i),
            ));
        }
        let doc = PaperRenderer::segmented().layout(&sections, &params()).unwrap();
        assert!(doc.page_count() >= 2);

        let second = &doc.pages[1];
        let first_text = second.texts().next().unwrap();
        assert!((first_text.y - (A4_HEIGHT - LINE_RESUME)).abs() < 1e-3);
        assert_eq!(first_text.face, FontFace::Helvetica);
        for text in doc.texts().filter(|t| t.text.starts_with('Q')) {
            assert!(text.y >= BODY_BOTTOM);
        }
    }

    #[test]
    fn test_long_prompt_wraps_within_width() {
        let mut sections = Sections::new();
        let prompt = "Explain ".repeat(60);
        sections.push(ClassifiedQuestion::new(Category::Long, prompt.trim()));
        let doc = PaperRenderer::segmented().layout(&sections, &params()).unwrap();
        let lines: Vec<&TextOp> = doc.texts().filter(|t| t.text.starts_with("Explain")).collect();
        assert!(lines.len() > 1);
        for line in lines {
            assert!(FontFace::Helvetica.string_width(&line.text, 12.0) <= PROMPT_WIDTH);
        }
    }

    #[test]
    fn test_invalid_params_fail_before_drawing() {
        let mut bad = params();
        bad.exam_title.clear();
        assert!(PaperRenderer::segmented().render(&one_per_section(), &bad).is_err());
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = PaperRenderer::segmented();
        let a = renderer.render(&one_per_section(), &params()).unwrap();
        let b = renderer.render(&one_per_section(), &params()).unwrap();
        assert!(a.starts_with(b"%PDF-"));
        assert_eq!(a, b);
    }
}
