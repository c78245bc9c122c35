use std::path::Path;

use compio::fs;
use snafu::prelude::*;
use tracing::debug;

use crate::ext::AbsolutePathExt;

/// Reads a newline separated list of paths.
///
/// Surrounding whitespace is trimmed; blank lines and lines starting with
/// `#` are skipped. Order is preserved.
pub async fn read_path_list(path: &Path) -> Result<Vec<String>, PathListError> {
    let bytes = fs::read(path).await.context(ReadSnafu {
        file_path: path.absolute_display(),
    })?;
    let contents = String::from_utf8(bytes).context(EncodingSnafu {
        file_path: path.absolute_display(),
    })?;
    let paths = parse_path_list(&contents);
    debug!("Read {} paths from {}", paths.len(), path.absolute_display());
    Ok(paths)
}

pub fn parse_path_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Snafu)]
pub enum PathListError {
    #[snafu(display("Failed to read path list: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Path list is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
}
