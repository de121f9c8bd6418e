//! 命令行参数
//!
//! 只负责解析参数并覆盖配置，具体执行交给编排层的 `App`。

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "question_paper",
    version,
    about = "Turn study material or typed questions into a sectioned exam paper PDF."
)]
pub struct Cli {
    /// TOML 配置文件（缺省字段使用默认值）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出目录
    #[arg(long, short, global = true)]
    pub output_dir: Option<String>,

    /// 打开 debug 日志（逐行切分明细）
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub header: HeaderArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// 页眉覆盖参数
#[derive(Args, Debug, Default, Clone)]
pub struct HeaderArgs {
    /// 考试名称
    #[arg(long, global = true)]
    pub exam_title: Option<String>,

    /// 科目（`#` 之后的内容不显示）
    #[arg(long, global = true)]
    pub subject: Option<String>,

    /// 考试时长
    #[arg(long, global = true)]
    pub time: Option<String>,

    /// 总分
    #[arg(long, global = true)]
    pub total_marks: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 资料 → LLM 出题 → 分区试卷 + 保留格式试卷
    Generate(GenerateArgs),

    /// 已有试卷文本 → 分区试卷 + 保留格式试卷
    Segment(SegmentArgs),

    /// 手动录入的 TOML（单个文件或目录）→ 编号试卷
    Manual(ManualArgs),

    /// 原文 → 保留格式 PDF / DOCX
    Format(FormatArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Generate(_) => "generate",
            Commands::Segment(_) => "segment",
            Commands::Manual(_) => "manual",
            Commands::Format(_) => "format",
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// 学习资料（.txt 或 .docx）
    pub material: PathBuf,

    #[arg(long)]
    pub mcq_count: Option<u32>,

    #[arg(long)]
    pub one_liner_count: Option<u32>,

    #[arg(long)]
    pub short_count: Option<u32>,

    #[arg(long)]
    pub long_count: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// 试卷文本文件
    pub input: PathBuf,

    /// 把切分结果以 JSON 打印到标准输出
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ManualArgs {
    /// TOML 文件或包含 TOML 文件的目录
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// 试卷文本文件
    pub input: PathBuf,

    /// 同时导出 DOCX
    #[arg(long)]
    pub docx: bool,

    /// 不导出 PDF
    #[arg(long)]
    pub no_pdf: bool,
}

impl Cli {
    /// 用命令行参数覆盖配置
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        config.verbose_logging |= self.verbose;

        let header = self.header.clone();
        config.exam_title = header.exam_title.unwrap_or(config.exam_title);
        config.subject = header.subject.unwrap_or(config.subject);
        config.time = header.time.unwrap_or(config.time);
        config.total_marks = header.total_marks.unwrap_or(config.total_marks);

        if let Commands::Generate(args) = &self.command {
            config.mcq_count = args.mcq_count.unwrap_or(config.mcq_count);
            config.one_liner_count = args.one_liner_count.unwrap_or(config.one_liner_count);
            config.short_count = args.short_count.unwrap_or(config.short_count);
            config.long_count = args.long_count.unwrap_or(config.long_count);
        }
        config
    }
}
