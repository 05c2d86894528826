//! 二元信号量
//!
//! 全局共享的二元信号量，模拟临界区的 wait/signal。

use serde::{Deserialize, Serialize};

/// 二元信号量：available = 1，busy = 0。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semaphore {
    #[default]
    Available,
    Busy,
}

impl Semaphore {
    pub fn is_available(self) -> bool {
        matches!(self, Semaphore::Available)
    }

    /// wait：可用时占用并返回 true，否则不变并返回 false
    pub fn try_wait(&mut self) -> bool {
        if self.is_available() {
            *self = Semaphore::Busy;
            true
        } else {
            false
        }
    }

    /// signal：置为可用
    pub fn signal(&mut self) {
        *self = Semaphore::Available;
    }
}
