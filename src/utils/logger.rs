//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 默认日志级别，可被 `RUST_LOG` 覆盖
const DEFAULT_FILTER: &str = "question_paper=info";

/// 初始化全局日志
///
/// 重复调用是安全的（测试里每个用例都可以调用）。
pub fn init() {
    init_with_verbose(false);
}

/// 初始化全局日志，`verbose` 时打开 debug 级别（逐行切分明细）
pub fn init_with_verbose(verbose: bool) {
    let default = if verbose {
        "question_paper=debug"
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
