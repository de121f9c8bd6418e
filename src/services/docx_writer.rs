//! DOCX 导出 - 业务能力层
//!
//! 保留原文的分行，只做最少的处理：去强调标记、制表符展开。

use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run};
use tracing::info;

use super::preserve_renderer::strip_emphasis;
use crate::error::{AppResult, RenderError};

/// 标题字号（半磅，即 18pt）
const TITLE_SIZE: usize = 36;
/// 正文字号（半磅，即 12pt）
const BODY_SIZE: usize = 24;

/// 生成 DOCX 字节
///
/// # 参数
/// - `raw_text`: 原始试卷文本
/// - `title`: 文档标题（加粗、居中）
///
/// # 返回
/// 打包好的 `.docx` 文件内容
pub fn render_docx(raw_text: &str, title: &str) -> AppResult<Vec<u8>> {
    let mut docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(title).bold().size(TITLE_SIZE))
                .align(AlignmentType::Center),
        )
        .add_paragraph(Paragraph::new());

    let cleaned = strip_emphasis(raw_text);
    let mut count = 0usize;
    for line in cleaned.lines() {
        let text = line.replace('\t', "    ");
        docx = docx.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(text).size(BODY_SIZE)),
        );
        count += 1;
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| RenderError::DocxPack(e.to_string()))?;

    info!("✓ DOCX 生成完成: {} 段正文", count);
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    fn paragraph_texts(bytes: &[u8]) -> Vec<String> {
        let docx = docx_rs::read_docx(bytes).unwrap();
        docx.document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(p),
                _ => None,
            })
            .map(|p| {
                p.children
                    .iter()
                    .filter_map(|c| match c {
                        ParagraphChild::Run(run) => Some(run),
                        _ => None,
                    })
                    .flat_map(|run| run.children.iter())
                    .filter_map(|rc| match rc {
                        RunChild::Text(t) => Some(t.text.clone()),
                        _ => None,
                    })
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_docx_keeps_lines_and_title() {
        let bytes = render_docx("**Section A**\n1.\tWhat is AI?", "Question Paper").unwrap();
        assert!(bytes.starts_with(b"PK"));

        let texts = paragraph_texts(&bytes);
        assert_eq!(texts[0], "Question Paper");
        assert_eq!(texts[1], "");
        assert_eq!(texts[2], "Section A");
        assert_eq!(texts[3], "1.    What is AI?");
    }
}
