//! 仿真状态
//!
//! 聚合 tick、模型、信号量与线程集合。

use super::model::Model;
use super::semaphore::Semaphore;
use super::thread::{KernelThread, UserThread};
use serde::Serialize;

/// 仿真状态：由调度引擎独占持有，`step` 原地变更；对外只读。
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    pub tick: u64,
    pub model: Model,
    pub semaphore: Semaphore,
    pub user_threads: Vec<UserThread>,
    pub kernel_threads: Vec<KernelThread>,
}

impl SimulationState {
    /// 空状态（未初始化或已重置）
    pub fn empty(model: Model) -> Self {
        Self {
            tick: 0,
            model,
            semaphore: Semaphore::Available,
            user_threads: Vec::new(),
            kernel_threads: Vec::new(),
        }
    }
}
