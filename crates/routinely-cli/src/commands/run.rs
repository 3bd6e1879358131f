//! Live countdown host.
//!
//! Drives the planner's timer from a tokio interval on a current-thread
//! runtime. The interval is rebuilt whenever the planner arms a new tick
//! source, and the loop ends once nothing is armed.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use routinely_core::{
    format_countdown, format_duration, Event, Notification, Notifier, Planner, Scheduler,
    TickHandle,
};

use super::plan::{render_list, PlanFile};

#[derive(Args)]
pub struct RunArgs {
    /// Plan file (TOML)
    file: PathBuf,
    /// Title of the list to run
    #[arg(long)]
    list: String,
    /// Override the tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

/// Hands the one armed tick source to the run loop.
#[derive(Debug, Default)]
struct IntervalScheduler {
    next_id: u64,
    armed: Option<(TickHandle, Duration)>,
}

impl Scheduler for IntervalScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        self.armed = Some((handle, interval));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.armed.is_some_and(|(h, _)| h == handle) {
            self.armed = None;
        }
    }
}

/// Prints notifications to stdout, optionally with a terminal bell.
struct ConsoleNotifier {
    enabled: bool,
    bell: bool,
}

impl ConsoleNotifier {
    /// Line to print for a notification, or `None` when output is off.
    fn render(&self, notification: &Notification) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let ring = self.bell
            && matches!(
                notification,
                Notification::RoutineComplete { .. } | Notification::AllComplete { .. }
            );
        Some(format!("{}{notification}", if ring { "\x07" } else { "" }))
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: &Notification) {
        info!(target: "routinely::notify", "{notification}");
        let Some(line) = self.render(notification) else {
            return;
        };
        if let Err(e) = writeln!(std::io::stdout().lock(), "{line}") {
            debug!(error = %e, "failed to write notification");
        }
    }
}

fn describe(planner: &Planner<IntervalScheduler, ConsoleNotifier>, event: &Event) {
    let (list_id, routine_id) = match event {
        Event::TimerStarted { list_id, routine_id, .. }
        | Event::RoutineAdvanced { list_id, routine_id, .. } => (*list_id, *routine_id),
        _ => return,
    };
    if let Some(routine) = planner.list(list_id).and_then(|l| l.get(routine_id)) {
        println!(
            "Now: {} ({}, until {})",
            routine.name,
            format_duration(routine.duration_secs()),
            routine.end()
        );
    }
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let plan = PlanFile::load(&args.file)?;

    let interval = args
        .tick_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.tick_interval());
    if interval.is_zero() {
        return Err("tick interval must be greater than zero".into());
    }

    let notifier = ConsoleNotifier {
        enabled: config.notifications.enabled,
        bell: config.notifications.bell,
    };
    let planner = Planner::new(IntervalScheduler::default(), notifier).with_tick_interval(interval);
    let mut planner = plan.build(&config, planner)?;

    let list_id = planner
        .list_by_title(&args.list)
        .map(|l| l.id())
        .ok_or_else(|| format!("no list titled '{}' in {}", args.list, args.file.display()))?;

    if let Some(list) = planner.list(list_id) {
        print!("{}", render_list(list));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()?;
    runtime.block_on(drive(&mut planner, list_id))
}

async fn drive(
    planner: &mut Planner<IntervalScheduler, ConsoleNotifier>,
    list_id: routinely_core::ListId,
) -> Result<(), Box<dyn std::error::Error>> {
    for event in planner.start_list(list_id)? {
        describe(planner, &event);
    }

    let mut current: Option<(TickHandle, tokio::time::Interval)> = None;
    loop {
        let Some((handle, every)) = planner.scheduler().armed else {
            debug!("no tick source armed, leaving run loop");
            break;
        };
        if current.as_ref().map_or(true, |(armed, _)| *armed != handle) {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            current = Some((handle, ticker));
        }
        let Some((_, ticker)) = current.as_mut() else {
            break;
        };

        tokio::select! {
            _ = ticker.tick() => {
                for event in planner.tick(handle) {
                    describe(planner, &event);
                }
                if let Some(active) = planner.active() {
                    debug!(remaining = %format_countdown(active.remaining_secs), "tick");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                planner.stop();
                break;
            }
        }
    }
    Ok(())
}
