//! # status 子命令 CLI 定义
//!
//! 只读地报告输出文件的弛豫状态。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/status.rs`

use clap::Args;
use std::path::PathBuf;

/// status 子命令参数
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Root directory to scan for SIESTA output files
    pub root: PathBuf,

    /// Glob pattern for SIESTA output files (matched case-insensitively)
    #[arg(long, default_value = "*.out")]
    pub pattern: String,

    /// Recurse into all subdirectories instead of just the run folders
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Optional CSV report output path
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}
