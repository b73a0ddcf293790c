use color_eyre::eyre::{eyre, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,stockchart=debug";

/// Installs the global subscriber. Output goes to `log_file` because the
/// terminal is owned by the TUI. Fails if the file cannot be opened or a
/// subscriber is already installed.
pub fn init(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!("failed to install the log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockchart.log");

        init(&path).unwrap();
        assert!(path.exists());

        let err = init(&path).unwrap_err();
        assert!(err.to_string().contains("log subscriber"));
    }

    #[test]
    fn unopenable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init(&dir.path().join("missing").join("stockchart.log")).is_err());
    }
}
