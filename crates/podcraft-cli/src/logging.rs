//! Process-wide logging setup.
//!
//! Logging is configured once, from an explicit [`LogConfig`], before any
//! command runs. `RUST_LOG` overrides the configured level when set.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// When to color log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Color when standard error is a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

/// Logging options recognized by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Most verbose level emitted when `RUST_LOG` is unset.
    pub level: LevelFilter,
    /// Line format.
    pub format: LogFormat,
    /// Color mode for text output.
    pub color: ColorMode,
}

impl LogConfig {
    /// Maps `-v`/`-q` counts to a level, starting from `info`.
    #[must_use]
    pub const fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::WARN;
        }
        match verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn use_ansi(self) -> bool {
        match self.color {
            ColorMode::Auto => std::io::stderr().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Text => builder.with_ansi(config.use_ansi()).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("cannot initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_info() {
        assert_eq!(LogConfig::level_from_flags(0, false), LevelFilter::INFO);
    }

    #[test]
    fn verbose_flags_raise_level() {
        assert_eq!(LogConfig::level_from_flags(1, false), LevelFilter::DEBUG);
        assert_eq!(LogConfig::level_from_flags(3, false), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(LogConfig::level_from_flags(2, true), LevelFilter::WARN);
    }

    #[test]
    fn explicit_color_modes_ignore_terminal() {
        let mut config = LogConfig {
            level: LevelFilter::INFO,
            format: LogFormat::Text,
            color: ColorMode::Always,
        };
        assert!(config.use_ansi());
        config.color = ColorMode::Never;
        assert!(!config.use_ansi());
    }
}
