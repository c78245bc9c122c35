use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{PackageConfig, PackageConfigError, PathListError, read_path_list};
use crate::filesystem::{TreeNode, render_tree};
use crate::manifest::{ManifestMerger, MergeError};

pub struct Application;

impl Application {
    pub async fn run(runtime: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let tree = Self::package(runtime).await?;

        colored::control::set_override(supports_color::on(Stream::Stdout).is_some());
        print!("{}", render_tree(&tree));
        Ok(())
    }

    /// Builds the versioned directory tree and merges the file manifest
    /// into it.
    pub async fn package(runtime: impl Into<RuntimeConfig>) -> Result<TreeNode, ApplicationError> {
        let runtime: RuntimeConfig = runtime.into();
        let config = PackageConfig::read(&runtime.config)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let directories = read_path_list(&runtime.directories)
            .await
            .context(DirectoryListSnafu)?;
        let files = read_path_list(&runtime.files)
            .await
            .context(FileListSnafu)?;

        let tree = config.tree_builder().build(&directories);
        let merged = ManifestMerger::new(config.merge_options(), config.install_info_file())
            .with_separator(config.separator)
            .merge(&tree, &files)
            .context(MergeSnafu)?;

        info!(
            directories = merged.walk().count(),
            files = merged.file_count(),
            "Package layout ready for {} {}",
            config.executable_name,
            config.version
        );
        Ok(merged)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the installer config"))]
    ConfigError { source: PackageConfigError },
    #[snafu(display("Critical failure encountered while reading the directory list"))]
    DirectoryListError { source: PathListError },
    #[snafu(display("Critical failure encountered while reading the file list"))]
    FileListError { source: PathListError },
    #[snafu(display("Critical failure encountered while merging the file manifest"))]
    MergeError { source: MergeError },
}
