//! 试卷处理流程 - 流程层
//!
//! 核心职责：定义"一份试卷"的完整处理流程
//!
//! 流程顺序：
//! 1. （可选）LLM 出题 → 检查上游错误
//! 2. 清洗 AI 输出
//! 3. 切分为四个分区
//! 4. 渲染分区试卷 + 保留格式试卷

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::RenderedDocument;
use crate::models::manual::ManualPaper;
use crate::models::question::Sections;
use crate::services::{
    render_docx, LlmService, PaperRenderer, PreserveRenderer, SegmentReport, Segmenter,
    TextCleaner,
};
use crate::workflow::paper_ctx::PaperCtx;

/// 一个生成的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 单份试卷的处理结果
#[derive(Debug, Default)]
pub struct PaperOutputs {
    pub files: Vec<OutputFile>,
    /// 分区结果（保留格式 / 手动模式没有切分报告）
    pub sections: Option<Sections>,
    pub report: Option<SegmentReport>,
}

impl PaperOutputs {
    fn push(&mut self, file_name: String, bytes: Vec<u8>) {
        debug!("生成文件: {} ({} 字节)", file_name, bytes.len());
        self.files.push(OutputFile { file_name, bytes });
    }

    pub fn file(&self, file_name: &str) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.file_name == file_name)
    }
}

/// 分区模式的中间结果
struct Segmented {
    sections: Sections,
    report: SegmentReport,
    exam: RenderedDocument,
    preserve: RenderedDocument,
}

/// 保留格式导出的目标格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatTargets {
    pub pdf: bool,
    pub docx: bool,
}

impl Default for FormatTargets {
    fn default() -> Self {
        Self {
            pdf: true,
            docx: false,
        }
    }
}

/// 试卷处理流程
///
/// - 编排完整的试卷处理流程
/// - 决定何时出题、何时清洗、何时渲染
/// - 不做文件 I/O，只返回字节
/// - 只依赖业务能力（services）
pub struct PaperFlow {
    cleaner: TextCleaner,
    segmenter: Segmenter,
    exam_renderer: PaperRenderer,
    manual_renderer: PaperRenderer,
    preserve_renderer: PreserveRenderer,
    llm_service: LlmService,
    config: Config,
}

impl PaperFlow {
    /// 创建新的试卷处理流程（配置里的正则在这里编译）
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            cleaner: TextCleaner::with_patterns(&config.cleanup_patterns)?,
            segmenter: Segmenter::new()?,
            exam_renderer: PaperRenderer::segmented(),
            manual_renderer: PaperRenderer::manual(),
            preserve_renderer: PreserveRenderer::with_skip_patterns(&config.boilerplate_patterns)?,
            llm_service: LlmService::new(config),
            config: config.clone(),
        })
    }

    /// 资料 → LLM 出题 → 分区试卷 + 保留格式试卷
    pub async fn run_generated(&self, ctx: &PaperCtx, material: &str) -> AppResult<PaperOutputs> {
        info!("{} 🤖 调用 {} 出题...", ctx, self.llm_service.model_name());
        let raw = self
            .llm_service
            .generate_questions(material, &self.config.generation_params())
            .await?;
        TextCleaner::check_upstream(&raw)?;
        self.run_segmented(ctx, &raw)
    }

    /// 已有试卷文本 → 分区试卷 + 保留格式试卷
    pub fn run_segmented(&self, ctx: &PaperCtx, raw_text: &str) -> AppResult<PaperOutputs> {
        let segmented = self.lay_out_segmented(ctx, raw_text)?;

        let mut outputs = PaperOutputs::default();
        outputs.push(ctx.file_name("", "pdf"), segmented.exam.to_pdf_bytes());
        outputs.push(
            ctx.file_name("_preserve", "pdf"),
            segmented.preserve.to_pdf_bytes(),
        );
        outputs.sections = Some(segmented.sections);
        outputs.report = Some(segmented.report);
        Ok(outputs)
    }

    /// 清洗 → 切分 → 两种排版；保留格式试卷同样使用清洗后的文本
    fn lay_out_segmented(&self, ctx: &PaperCtx, raw_text: &str) -> AppResult<Segmented> {
        ctx.params.validate()?;

        let cleaned = self.cleaner.clean(raw_text);
        let (sections, report) = self.segmenter.segment_with_report(&cleaned);
        self.log_sections(ctx, &sections, &report);

        Ok(Segmented {
            exam: self.exam_renderer.layout(&sections, &ctx.params)?,
            preserve: self.preserve_renderer.layout(&cleaned, &ctx.params)?,
            sections,
            report,
        })
    }

    /// 手动录入 → 编号试卷
    pub fn run_manual(&self, ctx: &PaperCtx, paper: &ManualPaper) -> AppResult<PaperOutputs> {
        paper.params.validate()?;

        let sections = paper.to_sections();
        if sections.is_empty() {
            warn!("{} ⚠️ 手动试卷没有任何题目", ctx);
        }
        info!("{} ✍️ 手动录入 {} 道题", ctx, sections.total());

        let mut outputs = PaperOutputs::default();
        outputs.push(
            ctx.file_name("_manual", "pdf"),
            self.manual_renderer.render(&sections, &paper.params)?,
        );
        outputs.sections = Some(sections);
        Ok(outputs)
    }

    /// 原文 → 保留格式 PDF 和 / 或 DOCX
    pub fn run_format(
        &self,
        ctx: &PaperCtx,
        raw_text: &str,
        targets: FormatTargets,
    ) -> AppResult<PaperOutputs> {
        ctx.params.validate()?;

        let mut outputs = PaperOutputs::default();
        if targets.pdf {
            outputs.push(
                ctx.file_name("_formatted", "pdf"),
                self.preserve_renderer.render(raw_text, &ctx.params)?,
            );
        }
        if targets.docx {
            outputs.push(
                ctx.file_name("_formatted", "docx"),
                render_docx(raw_text, ctx.params.sanitized_subject())?,
            );
        }
        if outputs.files.is_empty() {
            warn!("{} ⚠️ 没有选择任何导出格式", ctx);
        }
        Ok(outputs)
    }

    fn log_sections(&self, ctx: &PaperCtx, sections: &Sections, report: &SegmentReport) {
        for (id, questions) in sections.iter() {
            info!("{} {}: {} 道题", ctx, id.title(), questions.len());
        }
        let dropped = report.dropped();
        if dropped > 0 {
            warn!("{} ⚠️ {} 行未归入任何分区，已丢弃", ctx, dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::params::DocumentParams;
    use crate::models::question::SectionId;
    use chrono::NaiveDate;

    fn flow() -> PaperFlow {
        PaperFlow::new(&Config::default()).unwrap()
    }

    fn ctx() -> PaperCtx {
        PaperCtx::new(
            1,
            "test",
            DocumentParams::new("LJ Polytechnic", "Fundamentals of AI", "2 Hours", 50),
        )
        .with_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
    }

    #[test]
    fn test_run_segmented_cleans_then_renders_both() {
        let raw = "Okay, here is the question paper:\n\
                   Section A\n\
                   1. What is AI? a) Rule-based b) Learning c) Both d) None\n\
                   2 mark: Define ML.";
        let outputs = flow().run_segmented(&ctx(), raw).unwrap();

        let names: Vec<_> = outputs.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["question_paper_20240102.pdf", "question_paper_20240102_preserve.pdf"]
        );
        assert!(outputs.files.iter().all(|f| f.bytes.starts_with(b"%PDF")));

        let sections = outputs.sections.unwrap();
        assert_eq!(sections.get(SectionId::A).len(), 1);
        assert_eq!(sections.get(SectionId::A)[0].options.len(), 4);
        assert_eq!(sections.get(SectionId::C).len(), 1);
        assert_eq!(outputs.report.unwrap().dropped(), 1);
    }

    #[test]
    fn test_preserve_layout_uses_cleaned_text() {
        let raw = "Okay, here is a question paper for you:\n\
                   Subject: Fundamentals of AI\n\
                   Total Marks: 50\n\
                   1. What is AI?\n\
                   a) Logic";
        let segmented = flow().lay_out_segmented(&ctx(), raw).unwrap();

        let texts: Vec<_> = segmented.preserve.texts().map(|t| t.text.clone()).collect();
        assert!(texts.iter().all(|t| !t.starts_with("Okay, here is")));
        assert!(texts.iter().all(|t| !t.starts_with("Subject:")));
        assert!(texts.iter().any(|t| t == "1. What is AI?"));
        assert!(texts.iter().any(|t| t == "a) Logic"));
        // 页眉里的总分只出现一次
        assert_eq!(texts.iter().filter(|t| t.starts_with("Total Marks")).count(), 1);
    }

    #[test]
    fn test_run_manual_names_output() {
        let paper: ManualPaper = toml::from_str(
            "exam_title = \"LJ Polytechnic\"\nsubject = \"AI\"\ntime = \"1 Hour\"\ntotal_marks = 20\nlongs = [\"Explain A*.\"]\n",
        )
        .unwrap();
        let outputs = flow().run_manual(&ctx(), &paper).unwrap();
        assert!(outputs.file("question_paper_20240102_manual.pdf").is_some());
        assert_eq!(outputs.sections.unwrap().get(SectionId::D).len(), 1);
    }

    #[test]
    fn test_run_format_targets() {
        let both = FormatTargets {
            pdf: true,
            docx: true,
        };
        let outputs = flow().run_format(&ctx(), "Section A\n1. Q", both).unwrap();
        assert!(outputs.file("question_paper_20240102_formatted.pdf").is_some());
        let docx = outputs.file("question_paper_20240102_formatted.docx").unwrap();
        assert!(docx.bytes.starts_with(b"PK"));

        let none = FormatTargets {
            pdf: false,
            docx: false,
        };
        assert!(flow().run_format(&ctx(), "x", none).unwrap().files.is_empty());
    }

    #[test]
    fn test_docx_title_uses_sanitized_subject() {
        let mut ctx = ctx();
        ctx.params.subject = "Fundamentals of AI ## unit 1".to_string();
        let docx = FormatTargets {
            pdf: false,
            docx: true,
        };
        let outputs = flow().run_format(&ctx, "1. What is AI?", docx).unwrap();

        let bytes = &outputs.files[0].bytes;
        let text = crate::services::material_loader::docx_text(bytes).unwrap();
        assert_eq!(text.lines().next(), Some("Fundamentals of AI"));
    }

    #[test]
    fn test_invalid_params_produce_no_output() {
        let mut ctx = ctx();
        ctx.params.total_marks = 0;
        assert!(flow().run_segmented(&ctx, "Section A").is_err());
    }
}
