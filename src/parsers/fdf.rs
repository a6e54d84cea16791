//! # SIESTA .fdf 输入重写器
//!
//! 在 fdf 输入文件中定位几何区段，并用输出中提取的最终几何替换，
//! 其余内容逐字节保留。
//!
//! ## fdf 格式说明
//! ```text
//! LatticeConstant  5.43 Ang
//!
//! %block LatticeVectors
//! a1 a2 a3
//! b1 b2 b3
//! c1 c2 c3
//! %endblock LatticeVectors
//!
//! %block AtomicCoordinatesAndAtomicSpecies
//! x y z species index label
//! ...
//! %endblock AtomicCoordinatesAndAtomicSpecies
//! ```
//!
//! 替换后的向量按原样使用，因此 LatticeConstant 固定写成 1 Ang。
//!
//! ## 依赖关系
//! - 被 `commands/resume.rs` 使用
//! - 无外部模块依赖

use crate::error::{ResiestaError, Result};
use std::fs;
use std::path::Path;

/// 原子坐标块标记（区分大小写）
pub const ATOMIC_BLOCK_START: &str = "%block AtomicCoordinatesAndAtomicSpecies";
pub const ATOMIC_BLOCK_END: &str = "%endblock AtomicCoordinatesAndAtomicSpecies";

/// 晶胞向量块标记
pub const CELL_BLOCK_START: &str = "%block LatticeVectors";
pub const CELL_BLOCK_END: &str = "%endblock LatticeVectors";

/// 重写后的晶格常数行
const LATTICE_CONSTANT_LINE: &str = "LatticeConstant 1 Ang";

/// 定位到的 fdf 区段行号（0 起始）
///
/// 只记录位置；行向量本身是重写期间唯一持有的可变数据。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FdfSections {
    pub lattice_constant: Option<usize>,
    pub atomic_start: Option<usize>,
    pub atomic_end: Option<usize>,
    pub cell_start: Option<usize>,
    pub cell_end: Option<usize>,
}

impl FdfSections {
    /// 原子块可替换区间；起止必须成对出现且顺序正确
    fn atomic_range(&self) -> Option<(usize, usize)> {
        pair(self.atomic_start, self.atomic_end)
    }

    /// 晶胞块可替换区间
    fn cell_range(&self) -> Option<(usize, usize)> {
        pair(self.cell_start, self.cell_end)
    }
}

fn pair(start: Option<usize>, end: Option<usize>) -> Option<(usize, usize)> {
    match (start, end) {
        (Some(s), Some(e)) if s < e => Some((s, e)),
        _ => None,
    }
}

/// 标签归一化：去掉 `-` `_` `.` 并转小写
fn normalize_label(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '.'))
        .collect::<String>()
        .to_lowercase()
}

/// 单次线性扫描定位所有区段
///
/// 任何标记出现两次都视为歧义并报错，不会悄悄取最后一个。
pub fn locate_sections(lines: &[String], path: &str) -> Result<FdfSections> {
    let mut sections = FdfSections::default();

    for (i, line) in lines.iter().enumerate() {
        if let Some(token) = line.split_whitespace().next() {
            if normalize_label(token) == "latticeconstant" {
                set_once(&mut sections.lattice_constant, i, "LatticeConstant", path)?;
            }
        }
        if line.contains(ATOMIC_BLOCK_START) {
            set_once(&mut sections.atomic_start, i, ATOMIC_BLOCK_START, path)?;
        }
        if line.contains(ATOMIC_BLOCK_END) {
            set_once(&mut sections.atomic_end, i, ATOMIC_BLOCK_END, path)?;
        }
        if line.contains(CELL_BLOCK_START) {
            set_once(&mut sections.cell_start, i, CELL_BLOCK_START, path)?;
        }
        if line.contains(CELL_BLOCK_END) {
            set_once(&mut sections.cell_end, i, CELL_BLOCK_END, path)?;
        }
    }

    Ok(sections)
}

fn set_once(slot: &mut Option<usize>, index: usize, marker: &str, path: &str) -> Result<()> {
    match *slot {
        Some(first) => Err(ResiestaError::AmbiguousMarker {
            marker: marker.to_string(),
            path: path.to_string(),
            first: first + 1,
            second: index + 1,
        }),
        None => {
            *slot = Some(index);
            Ok(())
        }
    }
}

/// 用格式化后的坐标行和晶胞行重写 fdf 行序列
///
/// 输入行保留各自的行终止符；替换区间之外的行原样进入结果。
/// 某个块的起止标记不完整时跳过该块，不报错。两个块的替换互不影响，
/// 结果与处理顺序无关。
pub fn rewrite_fdf(
    lines: Vec<String>,
    coords: &[String],
    cell: &[String],
    path: &str,
) -> Result<Vec<String>> {
    let sections = locate_sections(&lines, path)?;
    let atomic = sections.atomic_range();
    let cell_range = sections.cell_range();

    let mut out = Vec::with_capacity(lines.len() + coords.len() + cell.len());
    for (i, line) in lines.into_iter().enumerate() {
        // 被替换区间的原内容丢弃
        if inside(atomic, i) || inside(cell_range, i) {
            continue;
        }

        if sections.lattice_constant == Some(i) {
            out.push(format!("{}\n", LATTICE_CONSTANT_LINE));
            continue;
        }

        let opens_atomic = atomic.map_or(false, |(s, _)| s == i);
        let opens_cell = cell_range.map_or(false, |(s, _)| s == i);

        out.push(line);

        if opens_atomic {
            out.extend(coords.iter().map(|row| format!("{}\n", row)));
        }
        if opens_cell {
            out.extend(cell.iter().map(|row| format!("{}\n", row)));
        }
    }

    Ok(out)
}

/// i 是否严格位于区间内部（不含起止标记行）
fn inside(range: Option<(usize, usize)>, i: usize) -> bool {
    range.map_or(false, |(s, e)| s < i && i < e)
}

/// 按行读入 fdf，保留行终止符（CRLF 和缺失的末尾换行都原样保留）
pub fn read_fdf_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| ResiestaError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(split_lines(&content))
}

/// 保留终止符的行切分
pub fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}

/// 重写并写回 fdf 文件
///
/// 先写同目录临时文件再改名，调用方视角下写回是原子的。
pub fn update_fdf_file(path: &Path, coords: &[String], cell: &[String]) -> Result<()> {
    let lines = read_fdf_lines(path)?;
    let rewritten = rewrite_fdf(lines, coords, cell, &path.display().to_string())?;

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("input.fdf");
    let tmp = path.with_file_name(format!("{}.tmp", file_name));

    fs::write(&tmp, rewritten.concat()).map_err(|e| ResiestaError::FileWriteError {
        path: tmp.display().to_string(),
        source: e,
    })?;
    fs::rename(&tmp, path).map_err(|e| ResiestaError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FDF: &str = "\
SystemName  silicon
SystemLabel si

LatticeConstant  5.43 Ang

%block LatticeVectors
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
%endblock LatticeVectors

AtomicCoordinatesFormat Ang

%block AtomicCoordinatesAndAtomicSpecies
0.0 0.0 0.0 1 1 Si
0.25 0.25 0.25 1 2 Si
%endblock AtomicCoordinatesAndAtomicSpecies
";

    fn coords() -> Vec<String> {
        vec![
            "  0.00000000    0.00000000    0.00000000     1       1  Si".to_string(),
            "  1.35750000    1.35750000    1.35750000     1       2  Si".to_string(),
        ]
    }

    fn cell() -> Vec<String> {
        vec![
            "  5.43000000    0.00000000    0.00000000".to_string(),
            "  0.00000000    5.43000000    0.00000000".to_string(),
            "  0.00000000    0.00000000    5.43000000".to_string(),
        ]
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Lattice-Constant"), "latticeconstant");
        assert_eq!(normalize_label("lattice_constant."), "latticeconstant");
        assert_eq!(normalize_label("LatticeConstant"), "latticeconstant");
    }

    #[test]
    fn test_locate_sections() {
        let lines = split_lines(SAMPLE_FDF);
        let sections = locate_sections(&lines, "si.fdf").unwrap();

        assert_eq!(sections.lattice_constant, Some(3));
        assert_eq!(sections.cell_start, Some(5));
        assert_eq!(sections.cell_end, Some(9));
        assert_eq!(sections.atomic_start, Some(13));
        assert_eq!(sections.atomic_end, Some(16));
    }

    #[test]
    fn test_rewrite_replaces_all_sections() {
        let lines = split_lines(SAMPLE_FDF);
        let result = rewrite_fdf(lines, &coords(), &cell(), "si.fdf").unwrap();
        let text = result.concat();

        assert!(text.contains("LatticeConstant 1 Ang\n"));
        assert!(!text.contains("5.43 Ang"));
        assert!(text.contains("  1.35750000    1.35750000    1.35750000     1       2  Si\n"));
        assert!(text.contains("  0.00000000    0.00000000    5.43000000\n"));
        // 旧块内容不再出现
        assert!(!text.contains("0.25 0.25 0.25"));
        assert!(!text.contains("1.0 0.0 0.0"));
        // 块外内容原样保留
        assert!(text.contains("SystemName  silicon\n"));
        assert!(text.contains("AtomicCoordinatesFormat Ang\n"));
    }

    #[test]
    fn test_rewrite_lattice_constant_line_exact() {
        let lines = split_lines("LatticeConstant  5.43 Ang\n");
        let result = rewrite_fdf(lines, &[], &[], "si.fdf").unwrap();
        assert_eq!(result, vec!["LatticeConstant 1 Ang\n".to_string()]);
    }

    #[test]
    fn test_rewrite_without_cell_markers_leaves_rest_identical() {
        let source = "\
SystemName  silicon
LatticeConstant  5.43 Ang
%block AtomicCoordinatesAndAtomicSpecies
0.0 0.0 0.0 1 1 Si
%endblock AtomicCoordinatesAndAtomicSpecies
MeshCutoff 300 Ry
";
        let lines = split_lines(source);
        let result = rewrite_fdf(lines, &coords(), &cell(), "si.fdf").unwrap();

        assert_eq!(result[0], "SystemName  silicon\n");
        assert_eq!(result[1], "LatticeConstant 1 Ang\n");
        assert_eq!(result[2], "%block AtomicCoordinatesAndAtomicSpecies\n");
        assert_eq!(result[3], format!("{}\n", coords()[0]));
        assert_eq!(result[4], format!("{}\n", coords()[1]));
        assert_eq!(result[5], "%endblock AtomicCoordinatesAndAtomicSpecies\n");
        assert_eq!(result[6], "MeshCutoff 300 Ry\n");
        // 晶胞行没有落点，不会被插入
        assert_eq!(result.len(), 7);
    }

    #[test]
    fn test_rewrite_idempotent() {
        let lines = split_lines(SAMPLE_FDF);
        let once = rewrite_fdf(lines, &coords(), &cell(), "si.fdf").unwrap();
        let twice = rewrite_fdf(once.clone(), &coords(), &cell(), "si.fdf").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_ambiguous_marker() {
        let source = "\
%block LatticeVectors
1.0 0.0 0.0
%endblock LatticeVectors
# %block LatticeVectors
";
        let lines = split_lines(source);
        let err = rewrite_fdf(lines, &coords(), &cell(), "si.fdf").unwrap_err();
        match err {
            ResiestaError::AmbiguousMarker { marker, first, second, .. } => {
                assert_eq!(marker, CELL_BLOCK_START);
                assert_eq!(first, 1);
                assert_eq!(second, 4);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_duplicate_lattice_constant() {
        let source = "\
LatticeConstant 5.43 Ang
Lattice-Constant 2.0 Ang
";
        let lines = split_lines(source);
        assert!(rewrite_fdf(lines, &[], &[], "si.fdf").is_err());
    }

    #[test]
    fn test_rewrite_empty_block_interior() {
        let source = "\
%block AtomicCoordinatesAndAtomicSpecies
%endblock AtomicCoordinatesAndAtomicSpecies
";
        let lines = split_lines(source);
        let result = rewrite_fdf(lines, &coords(), &[], "si.fdf").unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result[1], format!("{}\n", coords()[0]));
        assert_eq!(result[2], format!("{}\n", coords()[1]));
    }

    #[test]
    fn test_rewrite_unpaired_end_marker_skipped() {
        let source = "\
%endblock AtomicCoordinatesAndAtomicSpecies
keep me
";
        let lines = split_lines(source);
        let result = rewrite_fdf(lines.clone(), &coords(), &cell(), "si.fdf").unwrap();
        assert_eq!(result, lines);
    }

    #[test]
    fn test_rewrite_sections_independent_of_row_count() {
        // 原子块在前且替换行数不同，晶胞块仍被正确替换
        let source = "\
%block AtomicCoordinatesAndAtomicSpecies
0.0 0.0 0.0 1 1 Si
0.1 0.1 0.1 1 2 Si
0.2 0.2 0.2 1 3 Si
%endblock AtomicCoordinatesAndAtomicSpecies
%block LatticeVectors
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 1.0
%endblock LatticeVectors
";
        let lines = split_lines(source);
        let one_coord = vec!["  9.00000000    9.00000000    9.00000000     1       1  Si".to_string()];
        let result = rewrite_fdf(lines, &one_coord, &cell(), "si.fdf").unwrap();
        let text = result.concat();

        assert!(text.contains("  9.00000000"));
        assert!(!text.contains("0.1 0.1 0.1"));
        assert!(text.contains("%block LatticeVectors\n  5.43000000"));
        assert!(!text.contains("1.0 0.0 0.0"));
        assert!(text.ends_with("%endblock LatticeVectors\n"));
    }

    #[test]
    fn test_rewrite_preserves_crlf_outside_blocks() {
        let source = "SystemName  silicon\r\nLatticeConstant 5.43 Ang\r\nMeshCutoff 300 Ry\r\n";
        let lines = split_lines(source);
        let result = rewrite_fdf(lines, &[], &[], "si.fdf").unwrap();

        assert_eq!(result[0], "SystemName  silicon\r\n");
        assert_eq!(result[1], "LatticeConstant 1 Ang\n");
        assert_eq!(result[2], "MeshCutoff 300 Ry\r\n");
    }

    #[test]
    fn test_split_lines_keeps_missing_final_newline() {
        let lines = split_lines("a\nb");
        assert_eq!(lines, vec!["a\n".to_string(), "b".to_string()]);
        assert_eq!(lines.concat(), "a\nb");
    }
}
