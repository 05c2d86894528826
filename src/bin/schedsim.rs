//! 线程映射模型仿真 CLI
//!
//! 以离散 tick 推进用户线程/内核线程映射模型，输出逐事件转写与最终快照。

use clap::Parser;
use schedsim_rs::rng::SeededSource;
use schedsim_rs::sched::{Model, ScenarioSpec, SchedulingEngine, ThreadState};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "schedsim",
    about = "线程映射模型仿真：many-to-one / one-to-one / many-to-many"
)]
struct Args {
    /// 映射模型：many_to_one | one_to_one | many_to_many
    #[arg(long, default_value = "many_to_one")]
    model: Model,

    /// 用户线程数（最小 1）
    #[arg(long, default_value_t = 5)]
    user_threads: usize,

    /// 内核线程数（仅 many-to-many 生效，最小 1）
    #[arg(long, default_value_t = 2)]
    kernel_threads: usize,

    /// 推进的 tick 数
    #[arg(long, default_value_t = 20)]
    ticks: u64,

    /// 随机种子（相同种子完全可复现）
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// 从 JSON 场景文件读取配置（覆盖以上模型与线程数）
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 输出最终状态快照 JSON 文件；不填则不生成
    #[arg(long)]
    snapshot_json: Option<PathBuf>,

    /// 不打印逐事件转写
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let (model, user_threads, kernel_threads, seed, ticks) = match &args.scenario {
        Some(path) => {
            let spec = ScenarioSpec::load(path).expect("load scenario");
            (
                spec.model,
                spec.clamped_user_threads(),
                spec.clamped_kernel_threads(),
                spec.seed.unwrap_or(args.seed),
                spec.ticks.unwrap_or(args.ticks),
            )
        }
        None => (
            args.model,
            args.user_threads.max(1),
            args.kernel_threads.max(1),
            args.seed,
            args.ticks,
        ),
    };

    let mut engine = SchedulingEngine::new(Box::new(SeededSource::from_seed(seed)));
    engine.initialize(model, user_threads, kernel_threads);
    drain_transcript(&mut engine, args.quiet);
    if !args.quiet {
        println!("{}", model.explanation());
    }

    for _ in 0..ticks {
        engine.step();
        drain_transcript(&mut engine, args.quiet);
    }

    if let Some(path) = &args.snapshot_json {
        let json = serde_json::to_string_pretty(engine.state()).expect("serialize snapshot");
        fs::write(path, json).expect("write snapshot json");
        eprintln!("wrote snapshot to {}", path.display());
    }

    let state = engine.state();
    let count = |s: ThreadState| state.user_threads.iter().filter(|t| t.state == s).count();
    println!(
        "done @ tick {}\n  threads: ready={}, running={}, blocked={}, terminated={}\n  semaphore: {:?}, model: {}",
        state.tick,
        count(ThreadState::Ready),
        count(ThreadState::Running),
        count(ThreadState::Blocked),
        count(ThreadState::Terminated),
        state.semaphore,
        state.model,
    );
}

fn drain_transcript(engine: &mut SchedulingEngine, quiet: bool) {
    for ev in engine.take_events() {
        if !quiet {
            println!("{ev}");
        }
    }
}
