//! # SIESTA .out 输出解析器
//!
//! 从 SIESTA 输出日志中检测弛豫状态并提取最后一组几何数据。
//!
//! ## 输出格式说明
//! ```text
//! outcoor: Final (unrelaxed) atomic coordinates (Ang):
//!     1.00000000    2.00000000    3.00000000   1   1  Si
//!                                                          <- 空行结束
//! outcell: Unit cell vectors (Ang):
//!     5.43000000    0.00000000    0.00000000
//!     ...
//! outcell: Cell vector modules (Ang)   :    ...            <- 结束标记
//! ```
//!
//! 优化过程中每个离子步都会重复这两个块，只有最后一组有效。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/geometry.rs`

use crate::error::{ResiestaError, Result};
use crate::models::{AtomCoord, CellVector, Geometry, RelaxationStatus};
use std::fs;
use std::path::Path;

/// 原子坐标块起始标记
const COORD_MARKER: &str = "outcoor: Final (unrelaxed) atomic coordinates";

/// 晶胞向量块起始标记
const CELL_MARKER: &str = "outcell: Unit cell";

/// 晶胞向量块结束标记
const CELL_END_MARKER: &str = "outcell: Cell vector modules";

/// 目标块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// 原子坐标块，以空行结束
    Coordinates,
    /// 晶胞向量块，以模长行结束
    UnitCell,
}

/// 检测输出文件的弛豫状态
pub fn detect_status_file(path: &Path) -> Result<RelaxationStatus> {
    let content = read_output(path)?;
    Ok(detect_status(&content))
}

/// 逐行扫描，首个命中的关键字决定状态
///
/// "unrelaxed" 包含 "relaxed" 子串，必须先检查。
pub fn detect_status(content: &str) -> RelaxationStatus {
    for line in content.lines() {
        let lower = line.to_lowercase();
        if lower.contains("unrelaxed") {
            return RelaxationStatus::Unrelaxed;
        }
        if lower.contains("relaxed") {
            return RelaxationStatus::Relaxed;
        }
    }
    RelaxationStatus::Unknown
}

/// 提取指定块最后一次出现的内容，每行去除首尾空白
///
/// 起始标记每出现一次累积器就清空重来，因此返回的总是最后一组。
/// 标记从未出现时返回空序列。
pub fn extract_block(content: &str, kind: BlockKind) -> Vec<String> {
    let (start_marker, end_marker) = match kind {
        BlockKind::Coordinates => (COORD_MARKER, None),
        BlockKind::UnitCell => (CELL_MARKER, Some(CELL_END_MARKER)),
    };

    let mut block: Vec<String> = Vec::new();
    let mut capturing = false;

    for line in content.lines() {
        if line.contains(start_marker) {
            capturing = true;
            block.clear();
            continue;
        }
        if !capturing {
            continue;
        }

        let ended = match end_marker {
            Some(end) => line.contains(end),
            None => line.trim().is_empty(),
        };
        if ended {
            capturing = false;
            continue;
        }

        block.push(line.trim().to_string());
    }

    block
}

/// 解析输出文件中的最终几何结构
pub fn parse_output_file(path: &Path) -> Result<Geometry> {
    let content = read_output(path)?;
    parse_output_content(&content, &path.display().to_string())
}

/// 从输出内容解析最终几何结构
///
/// 两个块缺一不可：残缺的几何数据没有物理意义。
pub fn parse_output_content(content: &str, name: &str) -> Result<Geometry> {
    let coord_lines = extract_block(content, BlockKind::Coordinates);
    if coord_lines.is_empty() {
        return Err(ResiestaError::EmptyExtraction {
            path: name.to_string(),
            section: "atomic coordinate".to_string(),
        });
    }

    let cell_lines = extract_block(content, BlockKind::UnitCell);
    if cell_lines.is_empty() {
        return Err(ResiestaError::EmptyExtraction {
            path: name.to_string(),
            section: "unit cell".to_string(),
        });
    }

    let coordinates = coord_lines
        .iter()
        .map(|line| parse_coord_line(line, name))
        .collect::<Result<Vec<_>>>()?;
    let cell = cell_lines
        .iter()
        .map(|line| parse_cell_line(line, name))
        .collect::<Result<Vec<_>>>()?;

    Ok(Geometry { coordinates, cell })
}

/// 读取输出文件；解码失败与文件缺失一样视为读错误
fn read_output(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ResiestaError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 解析一行原子坐标（恰好 6 列：x y z species index label）
fn parse_coord_line(line: &str, name: &str) -> Result<AtomCoord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(parse_error(
            name,
            format!(
                "Expected 6 fields in coordinate line '{}', found {}",
                line,
                parts.len()
            ),
        ));
    }

    Ok(AtomCoord {
        position: [
            parse_float(parts[0], line, name)?,
            parse_float(parts[1], line, name)?,
            parse_float(parts[2], line, name)?,
        ],
        species: parse_int(parts[3], line, name)?,
        index: parse_int(parts[4], line, name)?,
        label: parts[5].to_string(),
    })
}

/// 解析一行晶胞向量（恰好 3 列浮点）
fn parse_cell_line(line: &str, name: &str) -> Result<CellVector> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(parse_error(
            name,
            format!(
                "Expected 3 fields in cell vector line '{}', found {}",
                line,
                parts.len()
            ),
        ));
    }

    Ok(CellVector {
        vector: [
            parse_float(parts[0], line, name)?,
            parse_float(parts[1], line, name)?,
            parse_float(parts[2], line, name)?,
        ],
    })
}

fn parse_float(token: &str, line: &str, name: &str) -> Result<f64> {
    token
        .parse()
        .map_err(|_| parse_error(name, format!("Invalid number '{}' in line '{}'", token, line)))
}

fn parse_int(token: &str, line: &str, name: &str) -> Result<i32> {
    token
        .parse()
        .map_err(|_| parse_error(name, format!("Invalid integer '{}' in line '{}'", token, line)))
}

fn parse_error(name: &str, reason: String) -> ResiestaError {
    ResiestaError::ParseError {
        format: "out".to_string(),
        path: name.to_string(),
        reason,
    }
}
