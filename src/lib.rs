//! # Question Paper
//!
//! 把学习资料或手动录入的题目排版成分区试卷 PDF 的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有绘制状态，只暴露能力
//! - `PdfCanvas` - 唯一的绘制状态 owner，序列化为 PDF
//! - `LayoutCursor` - 纵向游标 + 当前字体，负责分页后恢复字体
//! - `FontFace` - 标准 14 字体的宽度表
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单份文本
//! - `TextCleaner` - 清洗 AI 输出
//! - `Segmenter` - 把文本切成四个分区
//! - `PaperRenderer` - 分区试卷排版
//! - `PreserveRenderer` / `render_docx` - 保留格式导出
//! - `LlmService` - 根据资料出题
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份试卷"的完整处理流程
//! - `PaperCtx` - 上下文封装（序号 + 来源 + 页眉参数）
//! - `PaperFlow` - 流程编排（llm → clean → segment → render）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 命令分发、文件读写、统计
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{PdfCanvas, RenderedDocument};
pub use models::{DocumentParams, ManualPaper, SectionId, Sections};
pub use orchestrator::App;
pub use services::{PaperRenderer, PreserveRenderer, Segmenter};
pub use utils::logger;
pub use workflow::{PaperCtx, PaperFlow, PaperOutputs};
