use crate::rng::{RandomSource, SeededSource};
use crate::sched::{
    LogEventKind, Model, SchedulingEngine, Semaphore, ThreadState, UserThreadId,
};
use std::collections::VecDeque;

struct ScriptedSource {
    uniforms: VecDeque<f64>,
    choices: VecDeque<usize>,
}

impl ScriptedSource {
    fn new(uniforms: &[f64], choices: &[usize]) -> Self {
        Self {
            uniforms: uniforms.iter().copied().collect(),
            choices: choices.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        self.uniforms.pop_front().expect("scripted uniform exhausted")
    }

    fn choose_index(&mut self, n: usize) -> usize {
        let i = self.choices.pop_front().expect("scripted choice exhausted");
        assert!(i < n, "scripted choice out of range");
        i
    }
}

fn scripted(uniforms: &[f64], choices: &[usize]) -> SchedulingEngine {
    SchedulingEngine::new(Box::new(ScriptedSource::new(uniforms, choices)))
}

fn seeded(seed: u64) -> SchedulingEngine {
    SchedulingEngine::new(Box::new(SeededSource::from_seed(seed)))
}

#[test]
fn many_to_one_block_cascades_to_all_ready_threads() {
    let mut e = scripted(&[0.3], &[1]);
    e.initialize(Model::ManyToOne, 3, 0);
    e.step();

    let s = e.state();
    assert!(
        s.user_threads
            .iter()
            .all(|t| t.state == ThreadState::Blocked)
    );

    let events = e.take_events();
    assert!(
        events
            .iter()
            .any(|ev| matches!(ev.kind, LogEventKind::Blocked { thread } if thread == UserThreadId(2)))
    );
    assert!(
        events
            .iter()
            .any(|ev| matches!(ev.kind, LogEventKind::CascadeBlocked))
    );
}

#[test]
fn idle_tick_only_advances_tick_and_clears_kernels() {
    let mut e = scripted(&[0.5], &[0]);
    e.initialize(Model::OneToOne, 1, 0);
    e.step();
    assert_eq!(e.state().user_threads[0].state, ThreadState::Terminated);
    e.take_events();

    e.step();
    let s = e.state();
    assert_eq!(s.tick, 2);
    assert_eq!(s.user_threads[0].state, ThreadState::Terminated);
    assert!(!s.user_threads[0].in_critical);
    assert!(s.kernel_threads.iter().all(|k| k.running_user.is_none()));

    let events = e.take_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0].kind, LogEventKind::TickStart));
    assert!(matches!(events[1].kind, LogEventKind::CpuIdle));
}

#[test]
fn acquiring_thread_keeps_critical_section_while_running() {
    let mut e = scripted(&[0.1], &[0]);
    e.initialize(Model::OneToOne, 2, 0);
    e.step();

    let s = e.state();
    assert_eq!(s.semaphore, Semaphore::Busy);
    assert!(s.user_threads[0].in_critical);
    // 时间片在 tick 边界用尽，线程回到 READY 但仍持有临界区
    assert_eq!(s.user_threads[0].state, ThreadState::Ready);
    assert_eq!(s.kernel_threads[0].running_user, Some(UserThreadId(1)));

    let events = e.take_events();
    assert!(
        events
            .iter()
            .any(|ev| matches!(ev.kind, LogEventKind::EnteredCritical { thread } if thread == UserThreadId(1)))
    );
}

#[test]
fn unscheduled_holder_releases_semaphore_next_tick() {
    let mut e = scripted(&[0.1, 0.9], &[0, 1]);
    e.initialize(Model::OneToOne, 2, 0);
    e.step();
    assert_eq!(e.state().semaphore, Semaphore::Busy);
    e.take_events();

    // 下一 tick 调度器选中 T2，持有者 T1 未运行即释放
    e.step();
    let s = e.state();
    assert_eq!(s.semaphore, Semaphore::Available);
    assert!(s.user_threads.iter().all(|t| !t.in_critical));

    let events = e.take_events();
    assert!(
        events
            .iter()
            .any(|ev| matches!(ev.kind, LogEventKind::LeftCritical { thread } if thread == UserThreadId(1)))
    );
}

#[test]
fn busy_semaphore_turns_acquire_draw_into_block() {
    let mut e = scripted(&[0.1, 0.24, 0.2, 0.9], &[0, 0, 0]);
    e.initialize(Model::ManyToOne, 1, 0);

    // tick 1：T1 进入临界区
    e.step();
    assert_eq!(e.state().semaphore, Semaphore::Busy);

    // tick 2：r < 0.25 但信号量占用，落入阻塞分支；阻塞清掉持有标记但不 signal
    e.step();
    let s = e.state();
    assert_eq!(s.user_threads[0].state, ThreadState::Blocked);
    assert!(!s.user_threads[0].in_critical);
    assert_eq!(s.semaphore, Semaphore::Busy);

    // tick 3：唤醒视作外部 signal，信号量恢复可用
    e.step();
    let s = e.state();
    assert_eq!(s.semaphore, Semaphore::Available);
    assert_eq!(s.user_threads[0].state, ThreadState::Ready);

    let events = e.take_events();
    assert!(
        events
            .iter()
            .any(|ev| matches!(ev.kind, LogEventKind::Unblocked { thread } if thread == UserThreadId(1)))
    );
}

#[test]
fn many_to_many_fills_kernels_in_id_order() {
    let mut e = scripted(&[0.9, 0.9], &[]);
    e.initialize(Model::ManyToMany, 4, 2);
    e.step();

    let s = e.state();
    assert_eq!(s.kernel_threads[0].running_user, Some(UserThreadId(1)));
    assert_eq!(s.kernel_threads[1].running_user, Some(UserThreadId(2)));

    let events = e.take_events();
    let scheduled: Vec<(u32, u32)> = events
        .iter()
        .filter_map(|ev| match ev.kind {
            LogEventKind::Scheduled { thread, kernel } => Some((thread.0, kernel.0)),
            _ => None,
        })
        .collect();
    assert_eq!(scheduled, vec![(1, 1), (2, 2)]);
}

#[test]
fn terminated_threads_never_change_state_again() {
    for model in [Model::ManyToOne, Model::OneToOne, Model::ManyToMany] {
        for seed in 0..5u64 {
            let mut e = seeded(seed);
            e.initialize(model, 4, 2);

            let mut dead: Vec<u32> = Vec::new();
            for _ in 0..40 {
                e.step();
                for t in &e.state().user_threads {
                    if dead.contains(&t.id.0) {
                        assert_eq!(t.state, ThreadState::Terminated);
                        assert!(!t.in_critical);
                    } else if t.state == ThreadState::Terminated {
                        dead.push(t.id.0);
                    }
                }
            }
        }
    }
}

#[test]
fn single_cpu_models_never_have_two_critical_holders() {
    for model in [Model::ManyToOne, Model::OneToOne] {
        for seed in 0..8u64 {
            let mut e = seeded(seed);
            e.initialize(model, 5, 0);
            for _ in 0..60 {
                e.step();
                let holders = e
                    .state()
                    .user_threads
                    .iter()
                    .filter(|t| t.in_critical)
                    .count();
                assert!(holders <= 1, "model {model} seed {seed}: {holders} holders");
            }
        }
    }
}

#[test]
fn step_preserves_structural_invariants() {
    for model in [Model::ManyToOne, Model::OneToOne, Model::ManyToMany] {
        for seed in 0..5u64 {
            let mut e = seeded(seed);
            e.initialize(model, 6, 3);
            let kernel_ids: Vec<u32> = e.state().kernel_threads.iter().map(|k| k.id.0).collect();

            for _ in 0..40 {
                e.step();
                let s = e.state();
                assert_eq!(s.user_threads.len(), 6);
                for (i, t) in s.user_threads.iter().enumerate() {
                    assert_eq!(t.id.0, i as u32 + 1);
                    assert!(kernel_ids.contains(&t.mapped_kernel.expect("mapped").0));
                }
                let user_ids: Vec<u32> = s.user_threads.iter().map(|t| t.id.0).collect();
                for k in &s.kernel_threads {
                    if let Some(u) = k.running_user {
                        assert!(user_ids.contains(&u.0));
                    }
                }
            }
        }
    }
}

#[test]
fn seeded_runs_replay_identically() {
    let mut a = seeded(9);
    let mut b = seeded(9);
    a.initialize(Model::ManyToMany, 5, 2);
    b.initialize(Model::ManyToMany, 5, 2);

    for _ in 0..25 {
        a.step();
        b.step();
        let left = serde_json::to_string(a.state()).expect("serialize state");
        let right = serde_json::to_string(b.state()).expect("serialize state");
        assert_eq!(left, right);

        let left_log: Vec<String> = a.take_events().iter().map(|ev| ev.to_string()).collect();
        let right_log: Vec<String> = b.take_events().iter().map(|ev| ev.to_string()).collect();
        assert_eq!(left_log, right_log);
    }
}
