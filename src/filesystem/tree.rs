use hashlink::LinkedHashMap;

use super::path::basename;

/// Prefix of the directory that holds a versioned payload.
pub const VERSION_DIR_PREFIX: &str = "app-";

/// Name of the entry-point directory for a given version label.
pub fn version_dir_name(label: &str) -> String {
    format!("{VERSION_DIR_PREFIX}{label}")
}

/// A file to be packaged, placed in the directory node that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub path: String,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A registry value written at install time and removed on uninstall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRecord {
    pub id: String,
    pub root: String,
    pub name: String,
    pub key: String,
    pub value_type: String,
    pub value: String,
}

/// One directory of the package layout.
///
/// Metadata lives in named fields and subdirectories in `children`, so a
/// directory called `files` can never collide with the file list. Children
/// keep insertion order, which makes the layout reproducible for a given
/// input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: String,
    pub name: String,
    pub files: Vec<FileRecord>,
    pub registry_entries: Vec<RegistryRecord>,
    pub children: LinkedHashMap<String, TreeNode>,
}

impl TreeNode {
    /// Node for `path`, named after its last segment.
    pub fn new(path: impl Into<String>, separator: char) -> Self {
        let path = path.into();
        let name = basename(&path, separator).to_string();
        Self::named(path, name)
    }

    pub fn named(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            files: Vec::new(),
            registry_entries: Vec::new(),
            children: LinkedHashMap::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut TreeNode> {
        self.children.get_mut(name)
    }

    /// Attaches `child` under its own name.
    ///
    /// Returns false and leaves the tree untouched when a sibling with the
    /// same name is already present.
    pub fn insert_child(&mut self, child: TreeNode) -> bool {
        if self.children.contains_key(&child.name) {
            return false;
        }
        self.children.insert(child.name.clone(), child);
        true
    }

    /// Follows `segments` down from this node, one child per segment.
    pub fn find<'a, I>(&self, segments: I) -> Option<&TreeNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.iter().any(|file| file.path == path)
    }

    /// Number of file records in this node and every node below it.
    pub fn file_count(&self) -> usize {
        self.walk().map(|(_, node)| node.files.len()).sum()
    }

    /// Pre-order traversal yielding each node with its depth below `self`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

pub struct Walk<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        let children = node.children.values().collect::<Vec<_>>();
        self.stack
            .extend(children.into_iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}
