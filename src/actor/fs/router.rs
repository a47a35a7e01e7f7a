use std::path::Path;

use super::types::{ChangeBatch, ChangeKind};
use crate::actor::messages::{RunnerMsg, WsMsg};
use crate::config::KilnConfig;
use crate::task::route_changes;
use crate::utils::path::url_path;
use crate::utils::plural::plural_count;

pub(super) fn log_batch(batch: &ChangeBatch) {
    for (path, kind) in &batch.0 {
        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
    }
}

/// Source changes → the runner message that rebuilds them.
pub(super) fn source_message(batch: &ChangeBatch, config: &KilnConfig) -> Option<RunnerMsg> {
    let changed = batch.paths();
    let routed = route_changes(config, &changed);

    if routed.reload_config {
        Some(RunnerMsg::ReloadConfig)
    } else if routed.tasks.is_empty() {
        None
    } else {
        Some(RunnerMsg::Run {
            tasks: routed.tasks,
            changed,
        })
    }
}

/// Dist changes → what connected browsers should do.
///
/// Only stylesheets changed: each one is swapped in place. Anything else
/// (scripts, images, fonts, HTML, a removed stylesheet) reloads the page.
/// Sourcemaps never trigger anything on their own.
pub(super) fn dist_messages(batch: &ChangeBatch, dist: &Path) -> Vec<WsMsg> {
    let relevant: Vec<_> = batch
        .0
        .iter()
        .filter(|(path, _)| !has_extension(path, "map"))
        .collect();

    if relevant.is_empty() {
        return Vec::new();
    }

    let stylesheets: Option<Vec<String>> = relevant
        .iter()
        .map(|(path, kind)| {
            (*kind != ChangeKind::Removed && has_extension(path, "css"))
                .then(|| url_path(dist, path))
                .flatten()
        })
        .collect();

    match stylesheets {
        Some(paths) => paths.into_iter().map(|path| WsMsg::Css { path }).collect(),
        None => vec![WsMsg::Reload {
            reason: format!("{} changed", plural_count(relevant.len(), "file")),
        }],
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
