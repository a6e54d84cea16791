//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `resume`: 从输出中的最终几何更新未弛豫运行的 fdf 输入
//! - `status`: 报告目录下所有输出文件的弛豫状态
//! - `show`: 打印单个输出文件的最终几何
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: resume, status, show

pub mod resume;
pub mod show;
pub mod status;

use clap::{Parser, Subcommand};

/// Resiesta - SIESTA 弛豫续算工具
#[derive(Parser)]
#[command(name = "resiesta")]
#[command(version)]
#[command(about = "A SIESTA geometry relaxation continuation toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Update .fdf inputs of unrelaxed runs from the last geometry in their .out logs
    Resume(resume::ResumeArgs),

    /// Report the relaxation status of every output file under a directory
    Status(status::StatusArgs),

    /// Print the final geometry extracted from a single output file
    Show(show::ShowArgs),
}
