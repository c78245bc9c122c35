//! Directory tree of an installer package.
//!
//! A flat list of path strings is turned into a tree of [`TreeNode`]s, one
//! per directory, each owning the files and registry values that are
//! installed alongside it.

pub mod builder;
pub mod path;
pub mod render;
pub mod tree;

pub use builder::TreeBuilder;
pub use render::render_tree;
pub use tree::{FileRecord, RegistryRecord, TreeNode, version_dir_name};
