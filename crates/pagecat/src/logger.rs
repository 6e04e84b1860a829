//! Diagnostics to standard error through `tracing`.

use tracing::level_filters::LevelFilter;

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a plain-text subscriber on stderr. Call once, before anything
/// logs. Standard output carries only file data.
pub fn init(level: LevelFilter) -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init()
}

/// Map `-q` / repeated `-v` to a level filter. Warnings are on by default.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(9, false), LevelFilter::TRACE);
        assert_eq!(level_for(0, true), LevelFilter::ERROR);
    }

    #[test]
    fn second_install_is_refused() {
        let _ = init(LevelFilter::OFF);
        assert!(init(LevelFilter::WARN).is_err());
    }
}
