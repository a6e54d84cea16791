//! # 数据模型模块
//!
//! 定义弛豫状态和最终几何结构的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 子模块: geometry

pub mod geometry;

pub use geometry::{AtomCoord, CellVector, Geometry, RelaxationStatus};
