//! 场景配置
//!
//! JSON 场景文件：模型、线程数、随机种子与步数。
//! 引擎不校验输入，计数在本层钳制到最小值 1。

use super::model::Model;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 场景加载错误
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("read scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse scenario json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 场景描述（JSON）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub schema_version: u32,
    pub model: Model,
    pub user_threads: usize,
    /// 仅 many-to-many 生效
    #[serde(default)]
    pub kernel_threads: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub ticks: Option<u64>,
}

impl ScenarioSpec {
    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// 用户线程数，钳制到最小值 1
    pub fn clamped_user_threads(&self) -> usize {
        self.user_threads.max(1)
    }

    /// 内核线程数，缺省与非法值一律取 1
    pub fn clamped_kernel_threads(&self) -> usize {
        self.kernel_threads.unwrap_or(1).max(1)
    }
}
