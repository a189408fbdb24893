//! # Priority Inversion Demonstrator
//!
//! Stages the classic three-task priority inversion on the simulated
//! kernel and prints what the scheduler did about it, side by side for a
//! non-inheriting semaphore and a priority-inheriting mutex.
//!
//! ## The scenario
//!
//! - **low** (priority 1) takes the shared lock and starts a long hold
//! - **high** (priority 5) contends for the lock and blocks
//! - **medium** (priority 3) arrives last, never touches the lock, and
//!   burns CPU
//!
//! With the semaphore, medium runs while high waits on low: the inversion
//! is unbounded and high starves for the whole horizon. With the mutex,
//! low inherits priority 5, finishes its hold over medium's head, and
//! high completes its critical section within a bounded delay.
//!
//! The demo samples per-task runtime counters at a fixed interval, then
//! prints a final task report and the inheritance events the kernel
//! recorded.

use rtos_api::{RtosApi, RtosError, TaskSpec, TaskStatus};
use rtos_types::{Priority, TaskId, Ticks};
use sim_rtos::sched_audit::SchedEvent;
use sim_rtos::workload::{busy_loop, lock_cycle, lock_once};
use sim_rtos::SimulatedRtos;

/// Which lock flavor(s) to demonstrate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Non-inheriting binary semaphore: the inversion goes unresolved
    Semaphore,
    /// Priority-inheriting mutex: the inversion is bounded
    Mutex,
    /// Both, semaphore first, for comparison
    Both,
}

impl ScenarioKind {
    /// Parses a command-line scenario name
    pub fn from_arg(arg: &str) -> Option<ScenarioKind> {
        match arg {
            "semaphore" | "sem" => Some(ScenarioKind::Semaphore),
            "mutex" => Some(ScenarioKind::Mutex),
            "both" => Some(ScenarioKind::Both),
            _ => None,
        }
    }
}

/// Demo configuration assembled from the command line
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Lock flavor(s) to run
    pub scenario: ScenarioKind,
    /// Ticks to simulate per scenario
    pub horizon_ticks: u64,
    /// Ticks between runtime samples
    pub sample_every: u64,
    /// Dump the final task statuses as JSON instead of a table
    pub json_status: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            scenario: ScenarioKind::Both,
            horizon_ticks: 80,
            sample_every: 10,
            json_status: false,
        }
    }
}

/// Cycles the low task holds the lock for
const LOW_HOLD_CYCLES: u64 = 50_000;

/// Cycles of high's critical section
const HIGH_HOLD_CYCLES: u64 = 1_000;

/// A staged inversion, ready to advance
struct StagedDemo {
    kernel: SimulatedRtos,
    low: TaskId,
    medium: TaskId,
    high: TaskId,
}

/// Stages the inversion mid-flight
///
/// On return low holds the lock, high is blocked on it, and medium is
/// the highest-priority Ready task. High runs [`lock_once`] so that a
/// resolved inversion ends with high exiting cleanly.
fn stage(inherits: bool) -> Result<StagedDemo, RtosError> {
    let mut kernel = SimulatedRtos::new();
    let lock = kernel.create_lock(inherits)?;

    let low = kernel.create_task(
        TaskSpec::new("low".to_string(), Priority::new(1)),
        lock_cycle(lock, LOW_HOLD_CYCLES, Ticks::FOREVER),
    )?;
    kernel.advance_cycles(100);

    let high = kernel.create_task(
        TaskSpec::new("high".to_string(), Priority::new(5)),
        lock_once(lock, HIGH_HOLD_CYCLES, Ticks::FOREVER),
    )?;
    kernel.advance_cycles(10);

    let medium = kernel.create_task(
        TaskSpec::new("medium".to_string(), Priority::new(3)),
        busy_loop(1_000_000),
    )?;

    Ok(StagedDemo {
        kernel,
        low,
        medium,
        high,
    })
}

/// Runs the configured scenario(s)
///
/// # Panics
///
/// Panics if `sample_every` is zero.
pub fn run(config: &DemoConfig) -> Result<(), RtosError> {
    assert!(config.sample_every > 0, "sample_every must be nonzero");
    match config.scenario {
        ScenarioKind::Semaphore => run_one(false, config),
        ScenarioKind::Mutex => run_one(true, config),
        ScenarioKind::Both => {
            run_one(false, config)?;
            println!();
            run_one(true, config)
        }
    }
}

fn run_one(inherits: bool, config: &DemoConfig) -> Result<(), RtosError> {
    let flavor = if inherits {
        "priority-inheriting mutex"
    } else {
        "non-inheriting semaphore"
    };
    println!("=== Scenario: {} ===", flavor);

    let mut demo = stage(inherits)?;
    println!(
        "staged at tick {}: low holds the lock, high is blocked, medium has the CPU",
        demo.kernel.current_tick()
    );
    println!();

    print_sample_header();
    let mut elapsed = 0;
    while elapsed < config.horizon_ticks {
        let step = config.sample_every.min(config.horizon_ticks - elapsed);
        for _ in 0..step {
            demo.kernel.tick();
        }
        elapsed += step;
        print_sample_row(&demo);
    }

    println!();
    if config.json_status {
        print_json_status(&demo);
    } else {
        print_task_report(&demo);
    }
    print_inheritance_events(&demo.kernel);
    print_verdict(&demo);
    Ok(())
}

fn print_sample_header() {
    println!(
        "{:>6} {:>10} {:>10} {:>10}  {}",
        "tick", "low", "medium", "high", "high state"
    );
}

fn print_sample_row(demo: &StagedDemo) {
    println!(
        "{:>6} {:>10} {:>10} {:>10}  {}",
        demo.kernel.current_tick(),
        runtime_label(&demo.kernel, demo.low),
        runtime_label(&demo.kernel, demo.medium),
        runtime_label(&demo.kernel, demo.high),
        state_label(&demo.kernel, demo.high),
    );
}

/// Runtime counter, or `-` once the task has exited
fn runtime_label(kernel: &SimulatedRtos, task: TaskId) -> String {
    match kernel.get_task_status(task) {
        Ok(status) => status.runtime_cycles.to_string(),
        Err(_) => "-".to_string(),
    }
}

fn state_label(kernel: &SimulatedRtos, task: TaskId) -> String {
    match kernel.get_task_status(task) {
        Ok(status) => status.state.to_string(),
        Err(_) => "exited".to_string(),
    }
}

fn print_task_report(demo: &StagedDemo) {
    println!(
        "--- task report at tick {} ---",
        demo.kernel.current_tick()
    );
    println!(
        "{:<10} {:>8} {:>5} {:>10} {:>12}",
        "name", "state", "base", "effective", "runtime"
    );
    for task in report_tasks(demo) {
        match demo.kernel.get_task_status(task) {
            Ok(status) => println!(
                "{:<10} {:>8} {:>5} {:>10} {:>12}",
                status.name,
                status.state.to_string(),
                status.base_priority.to_string(),
                status.effective_priority.to_string(),
                status.runtime_cycles
            ),
            Err(_) => println!("{:<10} {:>8}", "high", "exited"),
        }
    }
}

fn print_json_status(demo: &StagedDemo) {
    let statuses: Vec<TaskStatus> = report_tasks(demo)
        .into_iter()
        .filter_map(|task| demo.kernel.get_task_status(task).ok())
        .collect();
    match serde_json::to_string_pretty(&statuses) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("status serialization failed: {}", err),
    }
}

fn report_tasks(demo: &StagedDemo) -> [TaskId; 4] {
    [SimulatedRtos::IDLE_TASK, demo.low, demo.medium, demo.high]
}

fn print_inheritance_events(kernel: &SimulatedRtos) {
    let boosts = kernel.audit().find_events(|event| {
        matches!(
            event,
            SchedEvent::PriorityInherited { .. } | SchedEvent::PriorityRestored { .. }
        )
    });
    println!("--- inheritance events ---");
    if boosts.is_empty() {
        println!("(none)");
        return;
    }
    for event in boosts {
        match event {
            SchedEvent::PriorityInherited {
                task,
                from,
                to,
                tick,
            } => println!("tick {:>4}: {} boosted {} -> {}", tick, task, from, to),
            SchedEvent::PriorityRestored {
                task,
                from,
                to,
                tick,
            } => println!("tick {:>4}: {} restored {} -> {}", tick, task, from, to),
            _ => {}
        }
    }
}

fn print_verdict(demo: &StagedDemo) {
    // High exits after its one pass through the critical section, so a
    // dead handle is the success signal.
    match demo.kernel.get_task_status(demo.high) {
        Err(_) => println!("verdict: high completed its critical section and exited"),
        Ok(status) => println!(
            "verdict: high never finished (state {}, runtime {})",
            status.state, status.runtime_cycles
        ),
    }
}
