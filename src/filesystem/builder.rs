use tracing::{debug, instrument, trace};

use super::path::{SEPARATOR, basename, is_child, is_direct_child};
use super::tree::{TreeNode, version_dir_name};

/// Builds the directory layout of a package from a flat list of paths.
///
/// Only paths below `root` are considered. With a version label the
/// returned root holds a single `app-<label>` child that carries the real
/// layout, leaving the root level free for unversioned files such as the
/// launcher stub.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root: String,
    version_label: Option<String>,
    separator: char,
}

impl TreeBuilder {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            version_label: None,
            separator: SEPARATOR,
        }
    }

    pub fn with_version_label(mut self, label: impl Into<String>) -> Self {
        self.version_label = Some(label.into());
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    #[instrument(skip(self, paths), fields(root = %self.root, version = ?self.version_label))]
    pub fn build<S: AsRef<str>>(&self, paths: &[S]) -> TreeNode {
        let descendants =
            self.descendants_of(paths.iter().map(AsRef::<str>::as_ref), &self.root);
        debug!(
            input = paths.len(),
            descendants = descendants.len(),
            "Building directory tree"
        );

        let mut root = TreeNode::new(self.root.as_str(), self.separator);
        match &self.version_label {
            Some(label) => {
                let mut entry_point = TreeNode::named(self.root.as_str(), version_dir_name(label));
                self.attach_children(&mut entry_point, &descendants);
                root.insert_child(entry_point);
            }
            None => self.attach_children(&mut root, &descendants),
        }
        root
    }

    fn build_node(&self, path: &str, candidates: &[&str]) -> TreeNode {
        let descendants = self.descendants_of(candidates.iter().copied(), path);
        let mut node = TreeNode::new(path, self.separator);
        self.attach_children(&mut node, &descendants);
        node
    }

    /// Attaches a subtree for every direct child of `node.path` found in
    /// `descendants`. Repeated paths are attached once.
    fn attach_children(&self, node: &mut TreeNode, descendants: &[&str]) {
        let direct = descendants
            .iter()
            .copied()
            .filter(|candidate| is_direct_child(&node.path, candidate, self.separator))
            .collect::<Vec<_>>();

        for child_path in direct {
            if node.children.contains_key(basename(child_path, self.separator)) {
                continue;
            }
            trace!(path = child_path, "Attaching directory");
            let child = self.build_node(child_path, descendants);
            node.insert_child(child);
        }
    }

    fn descendants_of<'a>(
        &self,
        paths: impl Iterator<Item = &'a str>,
        root: &str,
    ) -> Vec<&'a str> {
        paths
            .filter(|path| is_child(root, path, self.separator))
            .collect()
    }
}
