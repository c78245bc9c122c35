use std::path::PathBuf;

use clap::Parser;

use super::LogLevel;
use crate::config::CONFIG_FILE_NAME;

/// Lays out an application's files as an installer directory tree.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// File listing every directory of the application, one per line
    pub directories: PathBuf,

    /// File listing every file to package, one per line
    pub files: PathBuf,

    /// Installer configuration
    #[clap(long, short, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_lists_and_defaults() {
        let cli = Cli::try_parse_from(["wixtree", "dirs.txt", "files.txt"]).unwrap();

        assert_eq!(cli.directories, PathBuf::from("dirs.txt"));
        assert_eq!(cli.files, PathBuf::from("files.txt"));
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE_NAME));
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn parses_options() {
        let cli = Cli::try_parse_from([
            "wixtree",
            "dirs.txt",
            "files.txt",
            "--config",
            "build/msi.yaml",
            "-l",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("build/msi.yaml"));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn requires_both_lists() {
        assert!(Cli::try_parse_from(["wixtree", "dirs.txt"]).is_err());
    }
}
