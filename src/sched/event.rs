//! 仿真事件流
//!
//! 定义引擎对外发布的日志事件：展示层按顺序消费即得到完整转写。

use super::model::Model;
use super::thread::{KernelThreadId, UserThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEventKind {
    /// 仿真已初始化
    Initialized { model: Model, user_threads: usize },
    /// 仿真已重置
    Reset,
    /// 一个时间步开始
    TickStart,
    /// 线程被唤醒（信号量/监视器收到信号）
    Unblocked { thread: UserThreadId },
    /// 无 READY 线程，CPU 空转
    CpuIdle,
    /// 调度器选中线程在某内核线程上运行
    Scheduled {
        thread: UserThreadId,
        kernel: KernelThreadId,
    },
    /// 线程通过 wait 进入临界区
    EnteredCritical { thread: UserThreadId },
    /// 线程阻塞等待信号量/监视器
    Blocked { thread: UserThreadId },
    /// many-to-one：唯一内核线程被阻塞，所有用户线程随之阻塞
    CascadeBlocked,
    /// 线程执行完毕
    Terminated { thread: UserThreadId },
    /// 线程离开临界区并 signal
    LeftCritical { thread: UserThreadId },
}

/// 一条带 tick 的日志事件（JSON 可回放，`tick` 与 `SimulationState.tick` 同口径）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub kind: LogEventKind,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LogEventKind::Initialized {
                model,
                user_threads,
            } => write!(
                f,
                "Simulation initialized with model = {model} and {user_threads} user threads."
            ),
            LogEventKind::Reset => write!(f, "Simulation reset."),
            LogEventKind::TickStart => write!(f, "--- Time Step {} ---", self.tick),
            LogEventKind::Unblocked { thread } => write!(
                f,
                "T{} is unblocked (signal on semaphore/monitor).",
                thread.0
            ),
            LogEventKind::CpuIdle => write!(f, "No READY threads. CPU is idle."),
            LogEventKind::Scheduled { thread, kernel } => write!(
                f,
                "Scheduler selected T{} to RUN on K{}.",
                thread.0, kernel.0
            ),
            LogEventKind::EnteredCritical { thread } => write!(
                f,
                "T{} entered critical section using semaphore (wait).",
                thread.0
            ),
            LogEventKind::Blocked { thread } => write!(
                f,
                "T{} is BLOCKED waiting on semaphore/monitor.",
                thread.0
            ),
            LogEventKind::CascadeBlocked => write!(
                f,
                "In Many-to-One, all user threads are blocked because the single kernel thread is blocked."
            ),
            LogEventKind::Terminated { thread } => {
                write!(f, "T{} finished execution and TERMINATED.", thread.0)
            }
            LogEventKind::LeftCritical { thread } => write!(
                f,
                "T{} left critical section and signalled semaphore.",
                thread.0
            ),
        }
    }
}

/// 事件收集器（存内存，由展示层整体取走）
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<LogEvent>,
}

impl EventLog {
    pub fn push(&mut self, tick: u64, kind: LogEventKind) {
        self.events.push(LogEvent { tick, kind });
    }

    /// 取走并清空已积累的事件；append-only 转写由调用方维护
    pub fn take(&mut self) -> Vec<LogEvent> {
        std::mem::take(&mut self.events)
    }
}
