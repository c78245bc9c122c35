mod package_config;
mod path_list;

pub use package_config::{CONFIG_FILE_NAME, PackageConfig, PackageConfigError};
pub use path_list::{PathListError, parse_path_list, read_path_list};
