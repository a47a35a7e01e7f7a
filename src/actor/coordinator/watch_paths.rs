use crate::actor::fs::WatchRoot;
use crate::config::KilnConfig;

/// Roots for the source watcher: the assets tree, plus the project root
/// (flat) when a config file exists so edits to it are seen.
pub(super) fn source_roots(config: &KilnConfig) -> Vec<WatchRoot> {
    let assets = config.assets_dir();
    let mut roots = vec![WatchRoot::recursive(&assets)];

    let root = config.get_root();
    if config.config_path.is_file() && !root.starts_with(&assets) {
        roots.push(WatchRoot::flat(root));
    }
    roots
}

/// Roots for the live reload watcher: all of dist.
pub(super) fn dist_roots(config: &KilnConfig) -> Vec<WatchRoot> {
    let dist = config.dist_dir();
    let _ = std::fs::create_dir_all(&dist);
    vec![WatchRoot::recursive(dist)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_project_config;
    use tempfile::TempDir;

    #[test]
    fn test_source_roots_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = test_project_config(dir.path(), "", false);

        assert_eq!(
            source_roots(&config),
            [WatchRoot::recursive(dir.path().join("assets"))]
        );
    }

    #[test]
    fn test_source_roots_with_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("kiln.toml"), "").unwrap();
        let config = test_project_config(dir.path(), "", false);

        assert_eq!(
            source_roots(&config),
            [
                WatchRoot::recursive(dir.path().join("assets")),
                WatchRoot::flat(dir.path()),
            ]
        );
    }

    #[test]
    fn test_dist_root_is_created() {
        let dir = TempDir::new().unwrap();
        let config = test_project_config(dir.path(), "[paths]\ndist = \"public\"\n", false);

        assert_eq!(
            dist_roots(&config),
            [WatchRoot::recursive(dir.path().join("public"))]
        );
        assert!(dir.path().join("public").is_dir());
    }
}
