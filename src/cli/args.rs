//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::task::TaskName;

/// kiln asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Task to run
    #[arg(value_enum, default_value_t = TaskName::Default)]
    pub task: TaskName,

    /// Production mode: minify, no sourcemaps, stop on first error (also KILN_ENV=production)
    #[arg(short, long)]
    pub production: bool,

    /// Config file path (default: kiln.toml, searched upward)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Port for `serve` (overrides serve.port)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_task() {
        let cli = Cli::try_parse_from(["kiln"]).unwrap();
        assert_eq!(cli.task, TaskName::Default);
        assert!(!cli.production);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_task_and_flags() {
        let cli = Cli::try_parse_from(["kiln", "serve", "-p", "-P", "8080", "-C", "site/kiln.toml"])
            .unwrap();
        assert_eq!(cli.task, TaskName::Serve);
        assert!(cli.production);
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.config, Some(PathBuf::from("site/kiln.toml")));
    }

    #[test]
    fn test_verbose_and_version_flags() {
        let cli = Cli::try_parse_from(["kiln", "watch", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.task, TaskName::Watch);

        let err = Cli::try_parse_from(["kiln", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unknown_task_rejected() {
        assert!(Cli::try_parse_from(["kiln", "deploy"]).is_err());
    }
}
