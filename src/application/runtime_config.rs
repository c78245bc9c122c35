use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config: PathBuf,
    pub directories: PathBuf,
    pub files: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            directories: cli.directories,
            files: cli.files,
        }
    }
}
