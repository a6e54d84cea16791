//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `utils/`
//! - 子模块: resume, status, show

pub mod resume;
pub mod show;
pub mod status;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resume(args) => resume::execute(args),
        Commands::Status(args) => status::execute(args),
        Commands::Show(args) => show::execute(args),
    }
}
