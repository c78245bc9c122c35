use std::{borrow::Cow, path::Path, path::PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::{
    ext::AbsolutePathExt,
    filesystem::{TreeBuilder, path::SEPARATOR},
    manifest::{DuplicatePolicy, InstallInfoFile, MergeOptions, RegistryHive, RegistryScope},
};

pub const CONFIG_FILE_NAME: &str = "installer.yaml";

/// Installer settings shared by the tree builder and the manifest merger.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageConfig {
    pub root: String,
    pub version: String,
    pub executable_name: String,
    pub stub_executable: String,
    pub manufacturer: String,
    pub short_name: String,
    pub build_id: Option<String>,
    pub auto_update: bool,
    pub updater: Option<String>,
    pub per_machine: bool,
    pub strict_duplicates: bool,
    pub separator: char,
    pub install_info_dir: PathBuf,
}

impl PackageConfig {
    pub async fn read(path: &Path) -> Result<Self, PackageConfigError> {
        debug!("Reading installer config: {}", path.absolute_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.absolute_display(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.absolute_display(),
        })?;
        contents.as_str().try_into()
    }

    pub fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::new(self.root.as_str())
            .with_version_label(self.version.as_str())
            .with_separator(self.separator)
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            executable_name: self.executable_name.clone(),
            stub_executable_path: self.stub_executable.clone(),
            auto_update: self.auto_update,
            version_label: self.version.clone(),
            updater_path: self.updater.clone().unwrap_or_default(),
            registry_scope: RegistryScope {
                manufacturer: self.manufacturer.clone(),
                short_name: self.short_name.clone(),
                hive: RegistryHive::for_install(self.per_machine),
            },
            duplicate_policy: if self.strict_duplicates {
                DuplicatePolicy::Reject
            } else {
                DuplicatePolicy::Skip
            },
        }
    }

    pub fn install_info_file(&self) -> InstallInfoFile {
        InstallInfoFile {
            dir: self.install_info_dir.clone(),
            manufacturer: self.manufacturer.clone(),
            short_name: self.short_name.clone(),
            build_id: self.build_id.clone(),
            per_machine: self.per_machine,
        }
    }

    fn from_mapping(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, PackageConfigError> {
        let required = |field: &'static str| -> Result<String, PackageConfigError> {
            string_field(top_level, field)?.context(MissingFieldSnafu { field })
        };

        let executable_name = required("executable")?;
        let version = required("version")?;
        let auto_update = bool_field(top_level, "autoUpdate")?.unwrap_or(false);
        let updater = string_field(top_level, "updater")?;
        ensure!(
            !auto_update || updater.is_some(),
            MissingFieldSnafu { field: "updater" }
        );

        let separator = match string_field(top_level, "separator")? {
            None => SEPARATOR,
            Some(value) => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(separator), None) => separator,
                    _ => {
                        return InvalidFieldSnafu {
                            field: "separator",
                            expected: "a single character",
                        }
                        .fail();
                    }
                }
            }
        };

        Ok(PackageConfig {
            root: required("root")?,
            stub_executable: required("stub")?,
            manufacturer: required("manufacturer")?,
            short_name: string_field(top_level, "shortName")?
                .unwrap_or_else(|| executable_name.clone()),
            build_id: string_field(top_level, "buildId")?,
            per_machine: bool_field(top_level, "perMachine")?.unwrap_or(false),
            strict_duplicates: bool_field(top_level, "strictDuplicates")?.unwrap_or(false),
            install_info_dir: string_field(top_level, "installInfoDir")?
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            executable_name,
            version,
            auto_update,
            updater,
            separator,
        })
    }
}

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// Reads a scalar as text. Integers are accepted so that `version: 2`
/// works unquoted; floats are not, since `1.10` would lose its zero.
fn string_field(
    top_level: &LinkedHashMap<Yaml, Yaml>,
    field: &'static str,
) -> Result<Option<String>, PackageConfigError> {
    match top_level.get(&key(field)) {
        None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
        Some(Yaml::Value(Scalar::String(value))) => Ok(Some(value.to_string())),
        Some(Yaml::Value(Scalar::Integer(value))) => Ok(Some(value.to_string())),
        Some(_) => InvalidFieldSnafu {
            field,
            expected: "a string (quote numeric values)",
        }
        .fail(),
    }
}

fn bool_field(
    top_level: &LinkedHashMap<Yaml, Yaml>,
    field: &'static str,
) -> Result<Option<bool>, PackageConfigError> {
    match top_level.get(&key(field)) {
        None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
        Some(Yaml::Value(Scalar::Boolean(value))) => Ok(Some(*value)),
        Some(_) => InvalidFieldSnafu {
            field,
            expected: "true or false",
        }
        .fail(),
    }
}

impl TryFrom<&str> for PackageConfig {
    type Error = PackageConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents
            .first()
            .ok_or(PackageConfigError::MalformedConfig)?;
        let top_level = document
            .as_mapping()
            .ok_or(PackageConfigError::TopLevelNotMap)?;

        Self::from_mapping(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum PackageConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config is missing required field '{}'", field))]
    MissingField { field: &'static str },
    #[snafu(display("Config field '{}' should be {}", field, expected))]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}
