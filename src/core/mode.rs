//! Build mode derived from the production flag.

/// Environment variable that switches on production mode.
pub const ENV_VAR: &str = "KILN_ENV";

/// Build mode for a run.
///
/// `source_maps` is always the negation of `production`; construct through
/// [`Mode::from_flag`] or the constants so the two never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    /// Minify styles and scripts, abort on first error.
    pub production: bool,

    /// Emit `.map` files next to bundles.
    pub source_maps: bool,
}

impl Mode {
    /// Production mode: minified output, no sourcemaps.
    pub const PRODUCTION: Self = Self {
        production: true,
        source_maps: false,
    };

    /// Development mode: readable output with sourcemaps.
    pub const DEVELOPMENT: Self = Self {
        production: false,
        source_maps: true,
    };

    pub const fn from_flag(production: bool) -> Self {
        if production {
            Self::PRODUCTION
        } else {
            Self::DEVELOPMENT
        }
    }

    /// Resolve from the CLI flag, falling back to `KILN_ENV=production`.
    pub fn resolve(cli_flag: bool) -> Self {
        let from_env = std::env::var(ENV_VAR)
            .map(|v| is_production_value(&v))
            .unwrap_or(false);
        Self::from_flag(cli_flag || from_env)
    }

    /// How task failures are handled in this mode.
    pub const fn error_policy(&self) -> ErrorPolicy {
        if self.production {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Continue
        }
    }

    pub const fn label(&self) -> &'static str {
        if self.production {
            "production"
        } else {
            "development"
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::DEVELOPMENT
    }
}

fn is_production_value(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "production" | "prod"
    )
}

/// What a run does when a bundle or task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure and keep going (development, watch loops).
    Continue,
    /// Stop the run and exit non-zero (production).
    Abort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_maps_negate_production() {
        for flag in [true, false] {
            let mode = Mode::from_flag(flag);
            assert_eq!(mode.production, flag);
            assert_eq!(mode.source_maps, !flag);
        }
    }

    #[test]
    fn test_error_policy() {
        assert_eq!(Mode::PRODUCTION.error_policy(), ErrorPolicy::Abort);
        assert_eq!(Mode::DEVELOPMENT.error_policy(), ErrorPolicy::Continue);
    }

    #[test]
    fn test_production_values() {
        assert!(is_production_value("production"));
        assert!(is_production_value(" PROD "));
        assert!(!is_production_value("development"));
        assert!(!is_production_value(""));
    }

    #[test]
    fn test_cli_flag_wins() {
        assert!(Mode::resolve(true).production);
    }
}
