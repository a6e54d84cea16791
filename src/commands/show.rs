//! # show 命令实现
//!
//! 解析单个输出文件并打印其状态和格式化后的最终几何。
//!
//! ## 依赖关系
//! - 使用 `cli/show.rs` 定义的参数
//! - 使用 `parsers/siesta_out.rs`
//! - 使用 `utils/output.rs`

use crate::cli::show::ShowArgs;
use crate::error::Result;
use crate::parsers::siesta_out;
use crate::utils::output;

/// 执行 show 命令
pub fn execute(args: ShowArgs) -> Result<()> {
    let status = siesta_out::detect_status_file(&args.file)?;
    output::print_info(&format!("{}: {}", args.file.display(), status));

    let geometry = siesta_out::parse_output_file(&args.file)?;

    output::print_header("Atomic Coordinates");
    for row in geometry.formatted_coordinates() {
        println!("{}", row);
    }

    output::print_header("Unit Cell Vectors");
    for row in geometry.formatted_cell() {
        println!("{}", row);
    }

    Ok(())
}
