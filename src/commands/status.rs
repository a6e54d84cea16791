//! # status 命令实现
//!
//! 只读地分类目录下所有 SIESTA 输出文件的弛豫状态。
//!
//! ## 功能
//! - 扫描根目录及运行文件夹中的输出文件
//! - 生成终端表格和计数汇总
//! - 可选导出 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/status.rs` 定义的参数
//! - 使用 `parsers/siesta_out.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::status::StatusArgs;
use crate::error::{ResiestaError, Result};
use crate::models::RelaxationStatus;
use crate::parsers::siesta_out;
use crate::utils::{output, progress};

use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use walkdir::WalkDir;

/// 状态报告行
#[derive(Debug, Clone, Tabled)]
struct StatusRow {
    #[tabled(rename = "Folder")]
    folder: String,
    #[tabled(rename = "Output file")]
    file: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// 执行 status 命令
pub fn execute(args: StatusArgs) -> Result<()> {
    output::print_header("SIESTA Relaxation Status");

    if !args.root.is_dir() {
        return Err(ResiestaError::DirectoryNotFound {
            path: args.root.display().to_string(),
        });
    }

    let out_files = collect_output_files(&args.root, &args.pattern, args.recursive)?;
    if out_files.is_empty() {
        output::print_warning(&format!(
            "No files matched '{}' under {}",
            args.pattern,
            args.root.display()
        ));
        return Ok(());
    }

    output::print_info(&format!("Scanning {} output file(s)...", out_files.len()));
    let pb = progress::create_progress_bar(out_files.len() as u64, "Classifying");

    let mut rows = Vec::new();
    let mut relaxed = 0;
    let mut unrelaxed = 0;
    let mut unknown = 0;

    for path in &out_files {
        let status = match siesta_out::detect_status_file(path) {
            Ok(s) => s,
            Err(e) => {
                pb.suspend(|| output::print_error(&format!("{}", e)));
                pb.inc(1);
                continue;
            }
        };

        match status {
            RelaxationStatus::Relaxed => relaxed += 1,
            RelaxationStatus::Unrelaxed => unrelaxed += 1,
            RelaxationStatus::Unknown => unknown += 1,
        }

        rows.push(StatusRow {
            folder: path
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            file: path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string(),
            status: status.to_string(),
        });

        pb.inc(1);
    }

    pb.finish_and_clear();

    let table = Table::new(&rows);
    println!("{}", table);

    output::print_separator();
    output::print_info(&format!(
        "{} relaxed, {} unrelaxed, {} unknown",
        relaxed, unrelaxed, unknown
    ));

    if let Some(ref csv_path) = args.output_csv {
        save_status_csv(&rows, csv_path)?;
        output::print_success(&format!(
            "Status report saved to '{}'",
            csv_path.display()
        ));
    }

    Ok(())
}

/// 收集待分类的输出文件
///
/// 非递归时深度限制为 2：根目录及其直接子文件夹，
/// 与 resume 的文件夹模型一致。
fn collect_output_files(root: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let glob_pattern = glob::Pattern::new(&pattern.to_lowercase()).map_err(|e| {
        ResiestaError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
    })?;

    let walker = if recursive {
        WalkDir::new(root)
    } else {
        WalkDir::new(root).max_depth(2)
    };

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                if glob_pattern.matches(&name.to_lowercase()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// 保存状态报告到 CSV
fn save_status_csv(rows: &[StatusRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(|e| ResiestaError::CsvError(e))?;

    wtr.write_record(&["folder", "file", "status"])
        .map_err(|e| ResiestaError::CsvError(e))?;

    for row in rows {
        wtr.write_record(&[row.folder.as_str(), row.file.as_str(), row.status.as_str()])
            .map_err(|e| ResiestaError::CsvError(e))?;
    }

    wtr.flush().map_err(|e| ResiestaError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
