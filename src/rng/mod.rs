//! 随机源模块
//!
//! 此模块包含仿真使用的随机源抽象与可复现的种子实现。

// 子模块声明
mod seeded;
mod source;

// 重新导出公共接口
pub use seeded::SeededSource;
pub use source::RandomSource;
