use std::path::Path;

use super::types::{ChangeBatch, ChangeKind};

/// Reconcile a debounced batch with the filesystem.
///
/// The watcher may report stale kinds (Created for a file already gone,
/// Removed for a file an atomic save put straight back). Directory events
/// are dropped: the files inside them produce their own events.
pub(super) fn reconcile(batch: ChangeBatch) -> ChangeBatch {
    let events = batch
        .0
        .into_iter()
        .filter_map(|(path, kind)| {
            let kind = correct_by_existence(&path, kind)?;
            match kind {
                ChangeKind::Created | ChangeKind::Modified if !path.is_file() => None,
                _ => Some((path, kind)),
            }
        })
        .collect();
    ChangeBatch(events)
}

fn correct_by_existence(path: &Path, kind: ChangeKind) -> Option<ChangeKind> {
    let exists = path.exists();
    match kind {
        ChangeKind::Created if !exists => {
            crate::debug!("watch"; "discard created (gone): {}", path.display());
            None
        }
        ChangeKind::Modified if !exists => Some(ChangeKind::Removed),
        ChangeKind::Removed if exists => Some(ChangeKind::Modified),
        kind => Some(kind),
    }
}
