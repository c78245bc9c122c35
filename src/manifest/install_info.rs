use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use snafu::{ResultExt, Snafu};
use tracing::debug;

/// Produces the version descriptor shipped next to the launcher stub and
/// returns the path it was written to.
pub trait InstallInfoGenerator {
    fn generate(&self, version: &str) -> Result<String, InstallInfoError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstallInfo<'a> {
    manufacturer: &'a str,
    short_name: &'a str,
    version: &'a str,
    build_id: &'a str,
    per_machine: bool,
}

/// Writes `<short name>-<version>.installInfo.json` into a directory.
#[derive(Debug, Clone)]
pub struct InstallInfoFile {
    pub dir: PathBuf,
    pub manufacturer: String,
    pub short_name: String,
    pub build_id: Option<String>,
    pub per_machine: bool,
}

impl InstallInfoFile {
    fn file_path(&self, version: &str) -> PathBuf {
        self.dir
            .join(format!("{}-{version}.installInfo.json", self.short_name))
    }
}

impl InstallInfoGenerator for InstallInfoFile {
    fn generate(&self, version: &str) -> Result<String, InstallInfoError> {
        let info = InstallInfo {
            manufacturer: &self.manufacturer,
            short_name: &self.short_name,
            version,
            build_id: self.build_id.as_deref().unwrap_or(version),
            per_machine: self.per_machine,
        };
        let contents = serde_json::to_string_pretty(&info).context(SerializeSnafu)?;

        let path = self.file_path(version);
        fs::create_dir_all(&self.dir).context(WriteSnafu {
            file_path: self.dir.display().to_string(),
        })?;
        fs::write(&path, contents).context(WriteSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Wrote install info to {}", path.display());

        Ok(path.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Snafu)]
pub enum InstallInfoError {
    #[snafu(display("Failed to serialize install info"))]
    SerializeError { source: serde_json::Error },
    #[snafu(display("Failed to write install info to {}", file_path))]
    WriteError {
        file_path: String,
        source: std::io::Error,
    },
}
