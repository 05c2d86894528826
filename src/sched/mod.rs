//! 线程调度仿真模块
//!
//! 此模块包含线程映射模型仿真的核心组件：数据模型、映射算法、调度引擎、事件流与场景配置。

// 子模块声明
mod engine;
mod event;
mod mapping;
mod model;
mod scenario;
mod semaphore;
mod state;
mod thread;

// 重新导出公共接口
pub use engine::SchedulingEngine;
pub use event::{EventLog, LogEvent, LogEventKind};
pub use mapping::compute_mapping;
pub use model::{Model, ParseModelError};
pub use scenario::{ScenarioError, ScenarioSpec};
pub use semaphore::Semaphore;
pub use state::SimulationState;
pub use thread::{KernelThread, KernelThreadId, ThreadState, UserThread, UserThreadId};
