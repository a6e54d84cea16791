//! # 解析器模块
//!
//! 提供 SIESTA 输出日志解析器和 fdf 输入重写器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: siesta_out, fdf

pub mod fdf;
pub mod siesta_out;
