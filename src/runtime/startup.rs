use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, anyhow, bail};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Send `tracing` output to the log file. `RUST_LOG` wins over `logging.level`.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<PathBuf> {
    let path = settings.file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing logger: {e}"))?;

    Ok(path)
}

/// Parse the optional starting catalog index. Out-of-range values wrap.
pub fn start_index(arg: Option<&str>, len: usize) -> anyhow::Result<usize> {
    let Some(raw) = arg else {
        return Ok(0);
    };
    if len == 0 {
        bail!("the station catalog is empty");
    }

    let index: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("starting station index must be a non-negative integer, got {raw:?}"))?;

    if index >= len {
        let wrapped = index % len;
        warn!(index, wrapped, stations = len, "starting index out of range, wrapping");
        return Ok(wrapped);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_index_starts_at_zero() {
        assert_eq!(start_index(None, 8).unwrap(), 0);
    }

    #[test]
    fn index_in_range_is_kept() {
        assert_eq!(start_index(Some("3"), 8).unwrap(), 3);
        assert_eq!(start_index(Some(" 7 "), 8).unwrap(), 7);
    }

    #[test]
    fn index_out_of_range_wraps() {
        assert_eq!(start_index(Some("8"), 8).unwrap(), 0);
        assert_eq!(start_index(Some("19"), 8).unwrap(), 3);
    }

    #[test]
    fn non_integer_index_is_an_error() {
        assert!(start_index(Some("two"), 8).is_err());
        assert!(start_index(Some("-1"), 8).is_err());
    }
}
