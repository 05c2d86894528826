//! 调度引擎
//!
//! 持有仿真状态，实现初始化、单步推进与重置。每个 `step` 原子地推进一个 tick：
//! 唤醒 → 调度选择 → 执行结果 → 临界区释放 → 归一化，随机源按固定顺序调用。

use super::event::{EventLog, LogEvent, LogEventKind};
use super::mapping::compute_mapping;
use super::model::Model;
use super::state::SimulationState;
use super::thread::{KernelThreadId, ThreadState, UserThread, UserThreadId};
use crate::rng::RandomSource;
use tracing::{debug, info, trace};

/// 阻塞线程每个 tick 被唤醒的概率
const P_UNBLOCK: f64 = 0.3;
/// 运行线程进入临界区的概率上界
const P_ACQUIRE: f64 = 0.25;
/// 运行线程阻塞的概率上界
const P_BLOCK: f64 = 0.45;
/// 运行线程终止的概率上界
const P_TERMINATE: f64 = 0.65;

/// 调度引擎：单线程、同步；`step` 运行期间不存在任何交错。
pub struct SchedulingEngine {
    state: SimulationState,
    rng: Box<dyn RandomSource>,
    log: EventLog,
}

impl SchedulingEngine {
    /// 创建引擎；`initialize` 之前状态为空
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self {
            state: SimulationState::empty(Model::ManyToOne),
            rng,
            log: EventLog::default(),
        }
    }

    /// 只读状态视图，每次变更调用之后即可供渲染
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// 取走自上次调用以来积累的日志事件
    pub fn take_events(&mut self) -> Vec<LogEvent> {
        self.log.take()
    }

    /// 初始化仿真：tick 归零、信号量可用、创建 READY 用户线程并按模型建立映射。
    ///
    /// 计数不在此处校验；配置层负责把计数钳制到最小值 1。
    #[tracing::instrument(skip(self))]
    pub fn initialize(&mut self, model: Model, user_thread_count: usize, kernel_hint: usize) {
        self.state = SimulationState::empty(model);
        self.state.user_threads = (1..=user_thread_count as u32)
            .map(|i| UserThread::new(UserThreadId(i)))
            .collect();
        self.remap(kernel_hint);

        info!(
            %model,
            user_threads = user_thread_count,
            kernel_threads = self.state.kernel_threads.len(),
            "仿真初始化完成"
        );
        self.log.push(
            0,
            LogEventKind::Initialized {
                model,
                user_threads: user_thread_count,
            },
        );
    }

    // 重建内核线程集合并写回每个用户线程的映射
    fn remap(&mut self, kernel_hint: usize) {
        let ids: Vec<UserThreadId> = self.state.user_threads.iter().map(|t| t.id).collect();
        let (kernels, by_user) = compute_mapping(self.state.model, &ids, kernel_hint);
        self.state.kernel_threads = kernels;
        for (t, k) in self.state.user_threads.iter_mut().zip(by_user) {
            t.mapped_kernel = Some(k);
        }
    }

    /// 推进一个 tick。本 tick 的所有判定基于 tick 开始时的快照，
    /// 除执行结果阶段内信号量的顺序效应外。
    pub fn step(&mut self) {
        self.state.tick += 1;
        let tick = self.state.tick;
        self.log.push(tick, LogEventKind::TickStart);
        debug!(tick, "开始推进时间步");

        // 每个 tick 开始时清空内核线程的承载状态
        for k in &mut self.state.kernel_threads {
            k.running_user = None;
        }

        // 唤醒阶段：每个 BLOCKED 线程按 id 顺序独立判定；
        // 任何唤醒都视作外部 signal，无条件把信号量置为可用
        for t in &mut self.state.user_threads {
            if t.state == ThreadState::Blocked && self.rng.uniform() < P_UNBLOCK {
                t.state = ThreadState::Ready;
                self.state.semaphore.signal();
                trace!(thread = t.id.0, "线程被唤醒");
                self.log.push(tick, LogEventKind::Unblocked { thread: t.id });
            }
        }

        // 调度选择阶段：基于唤醒之后的 READY 集合
        let ready: Vec<UserThreadId> = self
            .state
            .user_threads
            .iter()
            .filter(|t| t.state == ThreadState::Ready)
            .map(|t| t.id)
            .collect();

        if ready.is_empty() {
            debug!(tick, "无 READY 线程，CPU 空转");
            self.log.push(tick, LogEventKind::CpuIdle);
        } else {
            match self.state.model {
                // 单 CPU 视角：每个 tick 只有一个线程真正运行
                Model::ManyToOne | Model::OneToOne => {
                    let chosen = ready[self.rng.choose_index(ready.len())];
                    let kernel = self
                        .mapped_kernel_of(chosen)
                        .unwrap_or(KernelThreadId(1));
                    self.set_running(chosen, kernel);
                    trace!(thread = chosen.0, kernel = kernel.0, "调度器选中线程");
                    self.log.push(
                        tick,
                        LogEventKind::Scheduled {
                            thread: chosen,
                            kernel,
                        },
                    );
                }
                // 内核线程按 id 顺序依次领取 READY 线程，任一侧耗尽即停止
                Model::ManyToMany => {
                    let kernels: Vec<KernelThreadId> =
                        self.state.kernel_threads.iter().map(|k| k.id).collect();
                    for (kernel, thread) in kernels.into_iter().zip(ready) {
                        self.set_running(thread, kernel);
                        trace!(thread = thread.0, kernel = kernel.0, "调度器选中线程");
                        self.log
                            .push(tick, LogEventKind::Scheduled { thread, kernel });
                    }
                }
            }
        }

        // 执行结果阶段：每个 RUNNING 线程按 id 顺序抽样一次，
        // 按优先级应用第一条匹配规则；信号量的占用对同阶段后续线程立即可见
        for i in 0..self.state.user_threads.len() {
            if self.state.user_threads[i].state != ThreadState::Running {
                continue;
            }
            let id = self.state.user_threads[i].id;
            let r = self.rng.uniform();

            if r < P_ACQUIRE && self.state.semaphore.try_wait() {
                self.state.user_threads[i].in_critical = true;
                trace!(thread = id.0, "进入临界区");
                self.log
                    .push(tick, LogEventKind::EnteredCritical { thread: id });
            } else if r < P_BLOCK {
                let t = &mut self.state.user_threads[i];
                t.state = ThreadState::Blocked;
                t.in_critical = false;
                trace!(thread = id.0, "线程阻塞");
                self.log.push(tick, LogEventKind::Blocked { thread: id });

                // many-to-one：唯一内核线程被阻塞，所有 READY 线程一并阻塞
                if self.state.model == Model::ManyToOne {
                    for other in &mut self.state.user_threads {
                        if other.state == ThreadState::Ready {
                            other.state = ThreadState::Blocked;
                        }
                    }
                    self.log.push(tick, LogEventKind::CascadeBlocked);
                }
            } else if r < P_TERMINATE {
                let t = &mut self.state.user_threads[i];
                t.state = ThreadState::Terminated;
                t.in_critical = false;
                trace!(thread = id.0, "线程终止");
                self.log.push(tick, LogEventKind::Terminated { thread: id });
            }
            // 其余情况：线程消耗一个时间片，保持 RUNNING
        }

        // 临界区释放阶段：持有者本 tick 未处于 RUNNING 时释放并 signal
        for t in &mut self.state.user_threads {
            if t.in_critical && t.state != ThreadState::Running {
                t.in_critical = false;
                self.state.semaphore.signal();
                trace!(thread = t.id.0, "离开临界区");
                self.log
                    .push(tick, LogEventKind::LeftCritical { thread: t.id });
            }
        }

        // tick 边界：时间片用尽，RUNNING 回到 READY 参与下一轮调度
        for t in &mut self.state.user_threads {
            if t.state == ThreadState::Running {
                t.state = ThreadState::Ready;
            }
        }

        debug!(tick, semaphore = ?self.state.semaphore, "时间步结束");
    }

    /// 重置：回到空集合、tick 0、信号量可用。外部驱动的计时器由调用方负责停止。
    pub fn reset(&mut self) {
        let model = self.state.model;
        self.state = SimulationState::empty(model);
        info!("仿真已重置");
        self.log.push(0, LogEventKind::Reset);
    }

    fn mapped_kernel_of(&self, id: UserThreadId) -> Option<KernelThreadId> {
        self.state
            .user_threads
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.mapped_kernel)
    }

    fn set_running(&mut self, thread: UserThreadId, kernel: KernelThreadId) {
        if let Some(t) = self.state.user_threads.iter_mut().find(|t| t.id == thread) {
            t.state = ThreadState::Running;
        }
        if let Some(k) = self
            .state
            .kernel_threads
            .iter_mut()
            .find(|k| k.id == kernel)
        {
            k.running_user = Some(thread);
        }
    }
}
