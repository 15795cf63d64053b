//! Logging setup.
//!
//! Logs go to stderr so command output on stdout stays machine readable.

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Filter directive: `VTM_LOG` when set, otherwise `vtm=<level>`
fn filter_directive(level: LogLevel, env_value: Option<String>) -> String {
    env_value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| format!("vtm={}", level.to_tracing_level()))
}

pub fn init_logger(level: LogLevel) {
    let directive = filter_directive(level, std::env::var(LOG_ENV).ok());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LogLevel::Trace, Level::TRACE)]
    #[case(LogLevel::Debug, Level::DEBUG)]
    #[case(LogLevel::Info, Level::INFO)]
    #[case(LogLevel::Warn, Level::WARN)]
    #[case(LogLevel::Error, Level::ERROR)]
    fn test_to_tracing_level(#[case] level: LogLevel, #[case] expected: Level) {
        assert_eq!(level.to_tracing_level(), expected);
    }

    #[test]
    fn test_filter_from_level() {
        assert_eq!(filter_directive(LogLevel::Debug, None), "vtm=DEBUG");
        assert_eq!(filter_directive(LogLevel::default(), None), "vtm=WARN");
    }

    #[test]
    fn test_filter_from_env() {
        assert_eq!(
            filter_directive(LogLevel::Warn, Some("vtm=trace,reqwest=debug".to_string())),
            "vtm=trace,reqwest=debug"
        );
        assert_eq!(filter_directive(LogLevel::Info, Some(" ".to_string())), "vtm=INFO");
    }
}
