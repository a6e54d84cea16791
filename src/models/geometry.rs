//! # 几何数据模型
//!
//! 定义从 SIESTA 输出中提取的最终几何结构表示，以及写入 fdf
//! 所用的固定列宽文本渲染。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 弛豫状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelaxationStatus {
    /// 结构优化已收敛
    Relaxed,
    /// 结构优化未收敛
    Unrelaxed,
    /// 输出中没有状态关键字
    Unknown,
}

impl std::fmt::Display for RelaxationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelaxationStatus::Relaxed => write!(f, "relaxed"),
            RelaxationStatus::Unrelaxed => write!(f, "unrelaxed"),
            RelaxationStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// outcoor 块中的一行原子坐标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomCoord {
    /// 笛卡尔坐标 [x, y, z] (Ang)
    pub position: [f64; 3],

    /// 元素种类编号（fdf 中的 species index）
    pub species: i32,

    /// 原子编号
    pub index: i32,

    /// 元素符号
    pub label: String,
}

impl AtomCoord {
    /// 渲染为 fdf 固定列宽行
    ///
    /// 浮点列宽 12、保留 8 位小数，整数列宽 4/6，符号列宽 2，
    /// 全部右对齐，列间两个空格。超过 8 位小数的精度会丢失。
    pub fn to_fdf_row(&self) -> String {
        format!(
            "{:>12.8}  {:>12.8}  {:>12.8}  {:>4}  {:>6}  {:>2}",
            self.position[0], self.position[1], self.position[2], self.species, self.index, self.label
        )
    }
}

/// outcell 块中的一行晶胞向量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellVector {
    /// 向量分量 [x, y, z] (Ang)
    pub vector: [f64; 3],
}

impl CellVector {
    /// 渲染为 fdf 固定列宽行，三列浮点，列宽 12、8 位小数
    pub fn to_fdf_row(&self) -> String {
        format!(
            "{:>12.8}  {:>12.8}  {:>12.8}",
            self.vector[0], self.vector[1], self.vector[2]
        )
    }
}

/// 从单个输出文件提取的最终几何结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// 最后一组原子坐标，保持输出中的顺序
    pub coordinates: Vec<AtomCoord>,

    /// 最后一组晶胞向量
    pub cell: Vec<CellVector>,
}

impl Geometry {
    /// 所有坐标行的 fdf 渲染，顺序稳定
    pub fn formatted_coordinates(&self) -> Vec<String> {
        self.coordinates.iter().map(AtomCoord::to_fdf_row).collect()
    }

    /// 所有晶胞行的 fdf 渲染
    pub fn formatted_cell(&self) -> Vec<String> {
        self.cell.iter().map(CellVector::to_fdf_row).collect()
    }
}
