//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `command`: 本次执行的子命令
/// - `output_dir`: 输出目录
pub fn log_startup(command: &str, output_dir: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {} 模式", command);
    info!("📁 输出目录: {}", output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录单份试卷开始处理
///
/// # 参数
/// - `paper_index`: 试卷序号（从 1 开始）
/// - `source`: 来源（文件名或说明）
pub fn log_paper_start(paper_index: usize, source: &str) {
    info!("\n{}", "─".repeat(60));
    info!("[试卷 {}] 📄 开始处理: {}", paper_index, source);
}

/// 记录单份试卷处理完成
///
/// # 参数
/// - `paper_index`: 试卷序号
/// - `files`: 生成的文件数量
pub fn log_paper_complete(paper_index: usize, files: usize) {
    info!("[试卷 {}] ✓ 处理完成，生成 {} 个文件", paper_index, files);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `written`: 写出的文件路径
pub fn print_final_stats(success: usize, failed: usize, written: &[String]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, success + failed);
    info!("❌ 失败: {}", failed);
    for path in written {
        info!("💾 {}", path);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
