//! # Resiesta - SIESTA 弛豫续算工具
//!
//! 判断 SIESTA 结构优化是否收敛；未收敛时从输出日志中提取
//! 最后一组几何数据，重写 fdf 输入文件以便续算。
//!
//! ## 子命令
//! - `resume` - 从输出中的最终几何更新未弛豫运行的 fdf 输入
//! - `status` - 报告目录下所有输出文件的弛豫状态
//! - `show`   - 打印单个输出文件的最终几何
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (输出解析与 fdf 重写)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
