//! Map changed source paths to the tasks that rebuild them.

use std::path::{Path, PathBuf};

use super::TaskName;
use crate::config::KilnConfig;
use crate::debug;
use crate::glob::Pattern;

/// Tasks a batch of changes calls for.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Routed {
    /// Build steps to run, each once, in `default` order.
    pub tasks: Vec<TaskName>,
    /// The config file changed: reload it and rerun `default`.
    pub reload_config: bool,
}

#[cfg(test)]
impl Routed {
    fn is_empty(&self) -> bool {
        self.tasks.is_empty() && !self.reload_config
    }
}

/// Route a batch of changed paths.
///
/// - `{assets}/{patterns.styles}` → `styles`
/// - `{assets}/{patterns.scripts}` → `scripts`
/// - `{assets}/{patterns.images}` → `images`
/// - the config file → reload + every `default` step
///
/// Paths matching nothing are ignored.
pub fn route_changes(config: &KilnConfig, changed: &[PathBuf]) -> Routed {
    if changed.iter().any(|path| is_config_file(config, path)) {
        return Routed {
            tasks: TaskName::BUILD_ORDER.to_vec(),
            reload_config: true,
        };
    }

    let root = config.get_root();
    let routes: Vec<(TaskName, Pattern)> = [
        (TaskName::Styles, &config.patterns.styles),
        (TaskName::Scripts, &config.patterns.scripts),
        (TaskName::Images, &config.patterns.images),
    ]
    .into_iter()
    .filter_map(|(task, pattern)| {
        Pattern::new(&config.source_pattern(pattern))
            .ok()
            .map(|p| (task, p))
    })
    .collect();

    let mut tasks: Vec<TaskName> = changed
        .iter()
        .flat_map(|path| {
            routes
                .iter()
                .filter(|(_, pattern)| pattern.matches(root, path))
                .map(|(task, _)| *task)
        })
        .collect();
    tasks.sort_unstable();
    tasks.dedup();

    debug!("watch"; "{} changed -> {:?}", changed.len(), tasks);
    Routed {
        tasks,
        reload_config: false,
    }
}

fn is_config_file(config: &KilnConfig, path: &Path) -> bool {
    !config.config_path.as_os_str().is_empty() && path == config.config_path
}
