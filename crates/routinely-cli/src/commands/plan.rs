//! Plan files: a read-only TOML description of lists and routines.
//!
//! ```toml
//! [[lists]]
//! title = "Morning"
//! start = "07:00"
//!
//! [[lists.routines]]
//! name = "Stretch"
//! duration = "10"
//! ```

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Deserialize;

use routinely_core::{format_duration, Config, Notifier, Planner, RoutineList, Scheduler};

#[derive(Debug, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub lists: Vec<PlanList>,
}

#[derive(Debug, Deserialize)]
pub struct PlanList {
    pub title: String,
    /// Start of the first routine. Falls back to the configured default.
    pub start: Option<String>,
    #[serde(default)]
    pub routines: Vec<PlanRoutine>,
}

#[derive(Debug, Deserialize)]
pub struct PlanRoutine {
    pub name: String,
    /// Same syntax as the routine form; falls back to the configured default.
    pub duration: Option<String>,
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read plan {}: {e}", path.display()))?;
        let plan = toml::from_str(&content)
            .map_err(|e| format!("cannot parse plan {}: {e}", path.display()))?;
        Ok(plan)
    }

    /// Feed every list and routine through the planner's validated entry
    /// points, so the resulting chains are exactly what the form would build.
    pub fn build<S: Scheduler, N: Notifier>(
        &self,
        config: &Config,
        mut planner: Planner<S, N>,
    ) -> Result<Planner<S, N>, Box<dyn std::error::Error>> {
        let default_start = config.planner.default_start.clone();
        for list in &self.lists {
            let id = planner.add_list(list.title.clone())?;
            let start = list.start.clone().or_else(|| default_start.clone());
            for routine in &list.routines {
                let duration = routine
                    .duration
                    .as_deref()
                    .unwrap_or(&config.planner.default_duration);
                planner
                    .add_routine_from_input(id, &routine.name, duration, start.as_deref())
                    .map_err(|e| format!("{} / {}: {e}", list.title, routine.name))?;
            }
        }
        Ok(planner)
    }
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// Print every list with its computed start and end times
    Show {
        /// Plan file (TOML)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn render_list(list: &RoutineList) -> String {
    let mut out = format!("{}\n", list.title);
    if list.is_empty() {
        out.push_str("  (no routines)\n");
    }
    for routine in list.routines() {
        out.push_str(&format!(
            "  {} - {}  {:>8}  {}\n",
            routine.start(),
            routine.end(),
            format_duration(routine.duration_secs()),
            routine.name
        ));
    }
    out
}

pub fn run(
    action: PlanAction,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    match action {
        PlanAction::Show { file, json } => {
            let plan = PlanFile::load(&file)?;
            let planner = plan.build(
                &config,
                Planner::new(
                    routinely_core::ManualScheduler::new(),
                    routinely_core::TracingNotifier,
                ),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(planner.lists())?);
            } else {
                let rendered: Vec<String> = planner.lists().iter().map(render_list).collect();
                print!("{}", rendered.join("\n"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use routinely_core::{FixedClock, ManualScheduler, RecordingNotifier, WallTime};

    const PLAN: &str = r#"
        [[lists]]
        title = "Morning"
        start = "07:00"

        [[lists.routines]]
        name = "Stretch"
        duration = "10"

        [[lists.routines]]
        name = "Shower"

        [[lists]]
        title = "Evening"
    "#;

    type TestPlanner = Planner<ManualScheduler, RecordingNotifier>;

    fn build(plan: &str, config: &Config) -> Result<TestPlanner, Box<dyn std::error::Error>> {
        let plan: PlanFile = toml::from_str(plan)?;
        let planner = Planner::new(ManualScheduler::new(), RecordingNotifier::new())
            .with_clock(FixedClock(WallTime::from_hms(6, 0, 0).unwrap()));
        plan.build(config, planner)
    }

    #[test]
    fn builds_chained_lists() {
        let planner = build(PLAN, &Config::default()).unwrap();
        let morning = planner.list_by_title("Morning").unwrap();
        assert_eq!(morning.len(), 2);
        assert_eq!(morning.routines()[1].start().format(), "07:10:00");
        assert_eq!(morning.routines()[1].duration_secs(), 25 * 60);
        assert!(planner.list_by_title("Evening").unwrap().is_empty());
    }

    #[test]
    fn configured_start_applies_when_plan_has_none() {
        let mut config = Config::default();
        config.planner.default_start = Some("05:30".into());
        let planner = build(
            "[[lists]]\ntitle = \"A\"\n[[lists.routines]]\nname = \"x\"\nduration = \"1\"\n",
            &config,
        )
        .unwrap();
        let a = planner.list_by_title("A").unwrap();
        assert_eq!(a.routines()[0].start().format(), "05:30:00");
    }

    #[test]
    fn bad_duration_names_the_routine() {
        let err = build(
            "[[lists]]\ntitle = \"A\"\n[[lists.routines]]\nname = \"x\"\nduration = \"soon\"\n",
            &Config::default(),
        )
        .err()
        .unwrap();
        assert!(err.to_string().starts_with("A / x:"));
    }

    #[test]
    fn render_shows_times_and_durations() {
        let planner = build(PLAN, &Config::default()).unwrap();
        let text = render_list(planner.list_by_title("Morning").unwrap());
        assert!(text.contains("07:00:00 - 07:10:00"));
        assert!(text.contains("10:00"));
        assert!(text.contains("Shower"));
    }
}
