//! Named tasks and the sequential runner.
//!
//! ```text
//! default = clean -> styles -> scripts -> images -> fonts
//! watch   = default, then rerun routed tasks on source changes
//! serve   = default, then HTTP + live reload on dist changes
//! ```
//!
//! `watch` and `serve` only reuse the build steps here; their long-running
//! parts live in `cli::watch` and `cli::serve`.

mod clean;
mod route;

pub use clean::clean;
pub use route::route_changes;

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::ValueEnum;

use crate::config::KilnConfig;
use crate::core::ErrorPolicy;
use crate::pipeline::{self, KilnError};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// A task name accepted on the command line.
///
/// Variant order is the `default` run order for the build steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum TaskName {
    /// Empty the dist output subdirectories
    Clean,
    /// Build stylesheet bundles
    Styles,
    /// Build script bundles
    Scripts,
    /// Recompress images
    Images,
    /// Copy font files
    Fonts,
    /// clean, styles, scripts, images, fonts
    Default,
    /// default, then rebuild on source changes
    Watch,
    /// default, then serve dist with live reload
    Serve,
}

impl TaskName {
    /// Build steps of `default`, in run order.
    pub const BUILD_ORDER: [Self; 5] = [
        Self::Clean,
        Self::Styles,
        Self::Scripts,
        Self::Images,
        Self::Fonts,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Styles => "styles",
            Self::Scripts => "scripts",
            Self::Images => "images",
            Self::Fonts => "fonts",
            Self::Default => "default",
            Self::Watch => "watch",
            Self::Serve => "serve",
        }
    }

    /// The build steps this task runs before anything long-running.
    pub const fn steps(self) -> &'static [Self] {
        match self {
            Self::Clean => &[Self::Clean],
            Self::Styles => &[Self::Styles],
            Self::Scripts => &[Self::Scripts],
            Self::Images => &[Self::Images],
            Self::Fonts => &[Self::Fonts],
            Self::Default | Self::Watch | Self::Serve => &Self::BUILD_ORDER,
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one build step.
#[derive(Debug)]
pub struct TaskReport {
    pub name: TaskName,
    /// Files written (or removed, for `clean`).
    pub outputs: Vec<PathBuf>,
    pub elapsed: Duration,
    /// Failures that were logged and skipped under [`ErrorPolicy::Continue`].
    pub errors: Vec<KilnError>,
}

impl TaskReport {
    fn new(name: TaskName) -> Self {
        Self {
            name,
            outputs: Vec::new(),
            elapsed: Duration::ZERO,
            errors: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold one unit's result into the report according to `policy`.
    fn absorb(
        &mut self,
        result: Result<Vec<PathBuf>, KilnError>,
        policy: ErrorPolicy,
    ) -> Result<(), KilnError> {
        match result {
            Ok(outputs) => self.outputs.extend(outputs),
            Err(e) if policy == ErrorPolicy::Abort => return Err(e),
            Err(e) => {
                log!("error"; "{}", e.report());
                self.errors.push(e);
            }
        }
        Ok(())
    }
}

/// Run `name`'s build steps in order.
///
/// Under [`ErrorPolicy::Abort`] the first failure stops the run and is
/// returned; under [`ErrorPolicy::Continue`] failures are logged, collected in
/// the reports and the remaining steps still run.
pub fn run(config: &KilnConfig, name: TaskName) -> Result<Vec<TaskReport>, KilnError> {
    run_steps(config, name.steps())
}

/// Run an explicit list of build steps in order.
pub fn run_steps(config: &KilnConfig, steps: &[TaskName]) -> Result<Vec<TaskReport>, KilnError> {
    debug!("kiln"; "{} mode", config.mode.label());
    steps
        .iter()
        .flat_map(|step| step.steps())
        .map(|&step| run_step(config, step))
        .collect()
}

fn run_step(config: &KilnConfig, name: TaskName) -> Result<TaskReport, KilnError> {
    let policy = config.mode.error_policy();
    let started = Instant::now();
    let mut report = TaskReport::new(name);

    match name {
        TaskName::Clean => report.absorb(clean(config), policy)?,
        TaskName::Styles => {
            for bundle in &config.styles.bundle {
                report.absorb(pipeline::style::compile_style(config, bundle), policy)?;
            }
        }
        TaskName::Scripts => {
            for bundle in &config.scripts.bundle {
                report.absorb(pipeline::script::compile_script(config, bundle), policy)?;
            }
        }
        TaskName::Images => {
            report.absorb(pipeline::image::optimize_images(config), policy)?;
        }
        TaskName::Fonts => {
            let out_dir = config.fonts_dir();
            report.absorb(pipeline::copy::copy(config, &config.fonts.inputs, &out_dir), policy)?;
        }
        TaskName::Default | TaskName::Watch | TaskName::Serve => {
            unreachable!("composite task `{name}` has no single step")
        }
    }

    report.elapsed = started.elapsed();
    log_report(&report);
    Ok(report)
}

fn log_report(report: &TaskReport) {
    let n = report.outputs.len();
    let summary = match report.name {
        TaskName::Clean => format!("removed {}", plural_count(n, "item")),
        _ => format!("wrote {}", plural_count(n, "file")),
    };
    if report.is_ok() {
        log!(report.name.as_str(); "{} in {}ms", summary, report.elapsed.as_millis());
    } else {
        let errors = plural_count(report.errors.len(), "error");
        log!(report.name.as_str(); "{}, {} in {}ms", summary, errors, report.elapsed.as_millis());
    }
}
