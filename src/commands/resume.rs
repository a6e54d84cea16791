//! # resume 命令实现
//!
//! 遍历运行文件夹，从未弛豫的输出日志中提取最终几何，
//! 经确认后重写对应的 fdf 输入文件。
//!
//! ## 功能
//! - 列出根目录下的运行文件夹（无子文件夹时用根目录本身）
//! - 逐个输出文件检测弛豫状态
//! - 提取并回显最终几何
//! - 按文件确认后重写 fdf
//!
//! ## 依赖关系
//! - 使用 `cli/resume.rs` 定义的参数
//! - 使用 `parsers/siesta_out.rs`, `parsers/fdf.rs`
//! - 使用 `utils/output.rs`

use crate::cli::resume::ResumeArgs;
use crate::error::{ResiestaError, Result};
use crate::models::RelaxationStatus;
use crate::parsers::{fdf, siesta_out};
use crate::utils::output;

use console::Term;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 用户对单个 fdf 文件的确认结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

/// 执行 resume 命令
pub fn execute(args: ResumeArgs) -> Result<()> {
    output::print_header("Resuming Unrelaxed SIESTA Runs");

    if !args.root.is_dir() {
        return Err(ResiestaError::DirectoryNotFound {
            path: args.root.display().to_string(),
        });
    }

    let folders = collect_run_folders(&args.root)?;
    output::print_info(&format!("Processing {} folder(s)...", folders.len()));

    // 确认能力由这里注入，核心流程不接触终端
    let term = Term::stdout();
    let mut confirm = |path: &Path| -> Result<Confirmation> {
        if args.yes {
            return Ok(Confirmation::Yes);
        }
        prompt_confirmation(&term, path)
    };

    // 单个文件夹的失败只影响它自己
    for folder in &folders {
        if let Err(e) = process_folder(folder, &args.pattern, &args.input_pattern, &mut confirm) {
            output::print_error(&format!("{}: {}", folder.display(), e));
        }
    }

    Ok(())
}

/// 列出根目录下的运行文件夹；没有子文件夹时回退为根目录本身
fn collect_run_folders(root: &Path) -> Result<Vec<PathBuf>> {
    let mut folders: Vec<PathBuf> = fs::read_dir(root)
        .map_err(|e| ResiestaError::FileReadError {
            path: root.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.path())
        .collect();
    folders.sort();

    if folders.is_empty() {
        folders.push(root.to_path_buf());
    }

    Ok(folders)
}

/// 处理单个运行文件夹
fn process_folder(
    folder: &Path,
    out_pattern: &str,
    input_pattern: &str,
    confirm: &mut dyn FnMut(&Path) -> Result<Confirmation>,
) -> Result<()> {
    let out_files = find_matching_files(folder, out_pattern)?;
    if out_files.is_empty() {
        output::print_warning(&format!(
            "No output file was found in {}.",
            folder.display()
        ));
        return Ok(());
    }

    for out_file in &out_files {
        let name = out_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("output");

        let status = match siesta_out::detect_status_file(out_file) {
            Ok(s) => s,
            Err(e) => {
                output::print_error(&format!("{}", e));
                continue;
            }
        };

        match status {
            RelaxationStatus::Relaxed => {
                output::print_relaxed(&format!("{} in {} is relaxed.", name, folder.display()));
                continue;
            }
            RelaxationStatus::Unrelaxed => {
                output::print_unrelaxed(&format!(
                    "{} in {} is UNRELAXED!",
                    name,
                    folder.display()
                ));
            }
            RelaxationStatus::Unknown => {
                output::print_warning(&format!(
                    "{} in {} has no relaxation status; treating as unrelaxed.",
                    name,
                    folder.display()
                ));
            }
        }

        let geometry = match siesta_out::parse_output_file(out_file) {
            Ok(g) => g,
            Err(e) => {
                output::print_error(&format!("Failed to extract data from {}: {}", name, e));
                continue;
            }
        };

        let coords = geometry.formatted_coordinates();
        let cell = geometry.formatted_cell();
        echo_geometry(&coords, &cell);

        for input_file in find_matching_files(folder, input_pattern)? {
            match confirm(&input_file)? {
                Confirmation::Yes => match fdf::update_fdf_file(&input_file, &coords, &cell) {
                    Ok(()) => output::print_done(&format!(
                        "File '{}' has been updated successfully.",
                        input_file.display()
                    )),
                    Err(e) => output::print_error(&format!("{}", e)),
                },
                Confirmation::No => {
                    output::print_skip(&format!("Skipping file: {}.", input_file.display()));
                }
            }
        }
    }

    Ok(())
}

/// 在文件夹内查找匹配 glob 模式的文件（文件名不区分大小写）
fn find_matching_files(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let glob_pattern = glob::Pattern::new(&pattern.to_lowercase()).map_err(|e| {
        ResiestaError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
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

/// 回显格式化后的几何数据
fn echo_geometry(coords: &[String], cell: &[String]) {
    println!("\nAtomic Coordinates:");
    for row in coords {
        println!("{}", row);
    }
    println!("\nUnit Cell Vectors:");
    for row in cell {
        println!("{}", row);
    }
    println!();
}

/// 终端确认提示
fn prompt_confirmation(term: &Term, path: &Path) -> Result<Confirmation> {
    term.write_str(&format!(
        "Do you want to update the file '{}'? [Y/n]: ",
        path.display()
    ))
    .ok();

    let answer = term.read_line().map_err(|e| ResiestaError::FileReadError {
        path: "stdin".to_string(),
        source: e,
    })?;

    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(Confirmation::Yes),
        "n" | "no" => Ok(Confirmation::No),
        other => {
            output::print_warning(&format!(
                "Invalid input '{}'. Please enter 'Y' or 'N'. Skipping file.",
                other
            ));
            Ok(Confirmation::No)
        }
    }
}
