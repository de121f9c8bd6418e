//! 学习资料读取 - 业务能力层
//!
//! 支持 `.txt`（UTF-8）和 `.docx`。PDF 文本提取不在支持范围内。

use std::io::ErrorKind;
use std::path::Path;

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::{debug, info};

use crate::error::{AppError, AppResult, FileError};

/// 读取资料文件为纯文本
pub async fn load_material(path: &Path) -> AppResult<String> {
    let shown = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let text = match extension.as_deref() {
        Some("txt") => {
            let bytes = read_bytes(path, &shown).await?;
            String::from_utf8(bytes).map_err(|e| AppError::file_read_failed(&shown, e))?
        }
        Some("docx") => {
            let bytes = read_bytes(path, &shown).await?;
            docx_text(&bytes).map_err(|message| {
                AppError::file_read_failed(&shown, std::io::Error::other(message))
            })?
        }
        _ => return Err(FileError::UnsupportedFormat { path: shown }.into()),
    };

    info!("📄 已读取资料: {} ({} 字符)", shown, text.chars().count());
    Ok(text)
}

async fn read_bytes(path: &Path, shown: &str) -> AppResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => FileError::NotFound {
            path: shown.to_string(),
        }
        .into(),
        _ => AppError::file_read_failed(shown, e),
    })
}

/// 提取 DOCX 中所有非空段落，以换行连接
pub fn docx_text(bytes: &[u8]) -> Result<String, String> {
    let docx = read_docx(bytes).map_err(|e| format!("docx 解析失败: {:?}", e))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    debug!("DOCX 段落数: {}", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut parts = Vec::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    parts.push(t.text.as_str());
                }
            }
        }
    }
    parts.concat()
}
