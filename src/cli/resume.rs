//! # resume 子命令 CLI 定义
//!
//! 从输出日志提取最终几何并更新 fdf 输入文件。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/resume.rs`

use clap::Args;
use std::path::PathBuf;

/// resume 子命令参数
#[derive(Args, Debug)]
pub struct ResumeArgs {
    /// Root directory containing SIESTA run folders (used directly when it has no subfolders)
    pub root: PathBuf,

    /// Glob pattern for SIESTA output files (matched case-insensitively)
    #[arg(long, default_value = "*.out")]
    pub pattern: String,

    /// Glob pattern for input files to rewrite
    #[arg(long, default_value = "*.fdf")]
    pub input_pattern: String,

    /// Rewrite matching input files without asking
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,
}
