//! # show 子命令 CLI 定义
//!
//! 打印单个输出文件的状态和最终几何。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/show.rs`

use clap::Args;
use std::path::PathBuf;

/// show 子命令参数
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Path to a SIESTA output file
    pub file: PathBuf,
}
