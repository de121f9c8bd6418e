//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **命令分发**：把 CLI 子命令映射到对应的 `PaperFlow` 流程
//! 2. **文件 I/O**：读取输入、把生成的字节写入输出目录
//! 3. **全局统计**：汇总成功 / 失败数量和写出的文件

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{error, info, warn};

use crate::cli::{Commands, FormatArgs, ManualArgs};
use crate::config::Config;
use crate::error::AppError;
use crate::models::loaders::{load_all_toml_files, load_toml_to_manual_paper};
use crate::models::manual::ManualPaper;
use crate::models::question::Sections;
use crate::services::load_material;
use crate::utils::logging::{log_paper_complete, log_paper_start, log_startup, print_final_stats};
use crate::workflow::{FormatTargets, PaperCtx, PaperFlow, PaperOutputs};

/// 应用主结构
pub struct App {
    config: Config,
    flow: PaperFlow,
}

/// 处理统计
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub written: Vec<String>,
}

impl App {
    /// 初始化应用（编译配置里的正则）
    pub fn initialize(config: Config) -> Result<Self> {
        let flow = PaperFlow::new(&config).context("初始化试卷流程失败")?;
        Ok(Self { config, flow })
    }

    /// 执行一个子命令
    pub async fn run(&self, command: &Commands) -> Result<ProcessingStats> {
        log_startup(command.name(), &self.config.output_dir);

        let mut stats = ProcessingStats::default();
        match command {
            Commands::Generate(args) => {
                let ctx = self.ctx(1, &args.material);
                log_paper_start(ctx.paper_index, &ctx.source);
                let material = load_material(&args.material).await?;
                let outputs = self.flow.run_generated(&ctx, &material).await?;
                self.finish_paper(&ctx, outputs, self.output_dir(), &mut stats)
                    .await?;
            }
            Commands::Segment(args) => {
                let ctx = self.ctx(1, &args.input);
                log_paper_start(ctx.paper_index, &ctx.source);
                let raw = read_text(&args.input).await?;
                let outputs = self.flow.run_segmented(&ctx, &raw)?;
                if args.json {
                    if let Some(sections) = &outputs.sections {
                        println!("{}", sections_to_json(sections)?);
                    }
                }
                self.finish_paper(&ctx, outputs, self.output_dir(), &mut stats)
                    .await?;
            }
            Commands::Manual(args) => self.run_manual(args, &mut stats).await?,
            Commands::Format(args) => self.run_format(args, &mut stats).await?,
        }

        print_final_stats(stats.success, stats.failed, &stats.written);
        Ok(stats)
    }

    /// 手动录入：单个文件直接输出；目录下每个 TOML 输出到以文件名命名的子目录
    async fn run_manual(&self, args: &ManualArgs, stats: &mut ProcessingStats) -> Result<()> {
        if !args.path.is_dir() {
            let paper = load_toml_to_manual_paper(&args.path).await?;
            let ctx = PaperCtx::new(1, display_name(&args.path), paper.params.clone());
            log_paper_start(ctx.paper_index, &ctx.source);
            let outputs = self.flow.run_manual(&ctx, &paper)?;
            return self
                .finish_paper(&ctx, outputs, self.output_dir(), stats)
                .await;
        }

        info!("\n📁 正在扫描手动录入的试卷...");
        let folder = args.path.to_string_lossy();
        let papers = load_all_toml_files(&folder).await?;
        if papers.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(());
        }
        info!("✓ 找到 {} 个待处理的试卷", papers.len());

        for (idx, paper) in papers.iter().enumerate() {
            let paper_index = idx + 1;
            let source = paper_source(paper, paper_index);
            let ctx = PaperCtx::new(paper_index, source.clone(), paper.params.clone());
            log_paper_start(paper_index, &source);

            match self.flow.run_manual(&ctx, paper) {
                Ok(outputs) => {
                    let dir = self.output_dir().join(&source);
                    self.finish_paper(&ctx, outputs, dir, stats).await?;
                }
                Err(e) => {
                    error!("[试卷 {}] ❌ 处理过程中发生错误: {}", paper_index, e);
                    stats.failed += 1;
                }
            }
        }
        Ok(())
    }

    async fn run_format(&self, args: &FormatArgs, stats: &mut ProcessingStats) -> Result<()> {
        let ctx = self.ctx(1, &args.input);
        log_paper_start(ctx.paper_index, &ctx.source);
        let raw = read_text(&args.input).await?;
        let targets = FormatTargets {
            pdf: !args.no_pdf,
            docx: args.docx,
        };
        let outputs = self.flow.run_format(&ctx, &raw, targets)?;
        self.finish_paper(&ctx, outputs, self.output_dir(), stats)
            .await
    }

    /// 写出一份试卷的所有文件并计入统计
    async fn finish_paper(
        &self,
        ctx: &PaperCtx,
        outputs: PaperOutputs,
        dir: PathBuf,
        stats: &mut ProcessingStats,
    ) -> Result<()> {
        let written = write_outputs(&dir, &outputs).await?;
        log_paper_complete(ctx.paper_index, written.len());
        stats.success += 1;
        stats.written.extend(written);
        Ok(())
    }

    fn ctx(&self, paper_index: usize, source: &Path) -> PaperCtx {
        PaperCtx::new(
            paper_index,
            display_name(source),
            self.config.document_params(),
        )
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.output_dir)
    }
}

/// 把生成的文件写入目录（目录不存在时创建）
pub async fn write_outputs(dir: &Path, outputs: &PaperOutputs) -> Result<Vec<String>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output dir: {:?}", dir))?;

    let mut written = Vec::with_capacity(outputs.files.len());
    for file in &outputs.files {
        let path = dir.join(&file.file_name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
        written.push(path.display().to_string());
    }
    Ok(written)
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {:?}", path))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn paper_source(paper: &ManualPaper, paper_index: usize) -> String {
    paper
        .file_path
        .as_deref()
        .and_then(|p| Path::new(p).file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("paper_{}", paper_index))
}

/// 分区结果的 JSON 视图（按 A-D 顺序）
fn sections_to_json(sections: &Sections) -> Result<String> {
    let value: Vec<_> = sections
        .iter()
        .map(|(id, questions)| {
            json!({
                "section": id.title(),
                "questions": questions,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&value)?)
}
