//! 线程类型
//!
//! 定义用户线程与内核线程及其标识符。

use serde::{Deserialize, Serialize};

/// 用户线程标识符（从 1 开始顺序分配）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UserThreadId(pub u32);

/// 内核线程标识符（当前映射内唯一）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct KernelThreadId(pub u32);

/// 用户线程状态；TERMINATED 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadState {
    Ready,
    Running,
    Blocked,
    Terminated,
}

/// 用户线程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserThread {
    pub id: UserThreadId,
    pub state: ThreadState,
    /// 映射到的内核线程；建立映射后保持稳定，除非重新映射
    pub mapped_kernel: Option<KernelThreadId>,
    pub in_critical: bool,
}

impl UserThread {
    /// 创建处于 READY 状态、尚未映射的新线程
    pub fn new(id: UserThreadId) -> Self {
        Self {
            id,
            state: ThreadState::Ready,
            mapped_kernel: None,
            in_critical: false,
        }
    }
}

/// 内核线程：每个 tick 最多承载一个运行中的用户线程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelThread {
    pub id: KernelThreadId,
    /// 本 tick 承载的用户线程；每个 tick 开始时清空
    pub running_user: Option<UserThreadId>,
}

impl KernelThread {
    pub fn new(id: KernelThreadId) -> Self {
        Self {
            id,
            running_user: None,
        }
    }
}
