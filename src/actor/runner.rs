//! Runner Actor
//!
//! Executes the build steps a source batch was routed to. Runs happen on a
//! blocking thread so the watchers keep draining events meanwhile; messages
//! that arrive during a run queue up in the channel and run afterwards.

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::messages::RunnerMsg;
use crate::config::{cfg, reload_config};
use crate::logger::{status_error, status_success, status_warning};
use crate::task::{self, TaskName, TaskReport};
use crate::utils::plural::plural_count;

pub struct RunnerActor {
    rx: mpsc::Receiver<RunnerMsg>,
}

impl RunnerActor {
    pub fn new(rx: mpsc::Receiver<RunnerMsg>) -> Self {
        Self { rx }
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            let job = match msg {
                RunnerMsg::Run { tasks, changed } => Job::Run { tasks, changed },
                RunnerMsg::ReloadConfig => Job::Reload,
                RunnerMsg::Shutdown => {
                    crate::debug!("runner"; "shutting down");
                    break;
                }
            };

            if tokio::task::spawn_blocking(move || job.execute())
                .await
                .is_err()
            {
                status_error("task run panicked", "");
            }
        }
    }
}

enum Job {
    Run {
        tasks: Vec<TaskName>,
        changed: Vec<PathBuf>,
    },
    Reload,
}

impl Job {
    fn execute(self) {
        match self {
            Self::Run { tasks, changed } => {
                let trigger = match changed.as_slice() {
                    [single] => cfg().root_relative(single).display().to_string(),
                    many => plural_count(many.len(), "file"),
                };
                run_and_report(&tasks, &trigger);
            }
            Self::Reload => match reload_config() {
                Ok(true) => run_and_report(&TaskName::BUILD_ORDER, "config reloaded"),
                Ok(false) => crate::debug!("runner"; "config unchanged"),
                Err(e) => status_error("config reload failed, keeping previous", &format!("{e:#}")),
            },
        }
    }
}

/// Run `tasks` against the current config and print one status line.
fn run_and_report(tasks: &[TaskName], trigger: &str) {
    let config = cfg();
    let names = tasks
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    match task::run_steps(&config, tasks) {
        Ok(reports) => {
            let failed: usize = reports.iter().map(|r| r.errors.len()).sum();
            if failed == 0 {
                status_success(&format!("{names} ({trigger}, {})", summary(&reports)));
            } else {
                status_warning(&format!(
                    "{names} ({trigger}): {}",
                    plural_count(failed, "error")
                ));
            }
        }
        Err(e) => status_error(&format!("{names} failed ({trigger})"), &e.report()),
    }
}

fn summary(reports: &[TaskReport]) -> String {
    let files: usize = reports
        .iter()
        .filter(|r| r.name != TaskName::Clean)
        .map(|r| r.outputs.len())
        .sum();
    let millis: u128 = reports.iter().map(|r| r.elapsed.as_millis()).sum();
    format!("{} in {}ms", plural_count(files, "file"), millis)
}
