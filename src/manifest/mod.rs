//! Overlaying a file manifest and the installer's own artifacts onto a
//! directory tree.

pub mod install_info;
pub mod merger;
pub mod registry;

pub use install_info::{InstallInfoError, InstallInfoFile, InstallInfoGenerator};
pub use merger::{DuplicatePolicy, ManifestMerger, MergeError, MergeOptions};
pub use registry::{RegistryHive, RegistryScope};
