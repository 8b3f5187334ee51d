//! Logging setup using tracing.
//!
//! The CLI owns the terminal, so output can be sent to a file instead of stderr.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Level for a number of `-v` flags (0=warn, 1=info, 2=debug, 3+=trace)
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize the global tracing subscriber.
///
/// Logs go to `log_file` (appended, no colors) when given, to stderr otherwise.
/// Calling this more than once keeps the first subscriber.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level_for(verbosity).into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let result = match log_file {
        Some(path) => {
            let file: File = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(%e, "tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(7), Level::TRACE);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let path = std::env::temp_dir().join(format!("powerbar-log-{}.log", rand::random::<u32>()));
        init(1, Some(path.as_path())).unwrap();
        init(2, None).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(path);
    }
}
