use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::{debug, info, instrument};

use crate::filesystem::path::{SEPARATOR, relative_segments};
use crate::filesystem::{FileRecord, TreeNode, version_dir_name};
use crate::manifest::install_info::{InstallInfoError, InstallInfoGenerator};
use crate::manifest::registry::RegistryScope;

pub const INSTALL_INFO_FILE_NAME: &str = ".installInfo.json";
pub const UPDATER_FILE_NAME: &str = "Update.exe";

/// What to do when the same source path is placed twice in one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first record and drop the repeat.
    #[default]
    Skip,
    /// Fail the merge with [`MergeError::DuplicateFileEntry`].
    Reject,
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub executable_name: String,
    pub stub_executable_path: String,
    pub auto_update: bool,
    pub version_label: String,
    pub updater_path: String,
    pub registry_scope: RegistryScope,
    pub duplicate_policy: DuplicatePolicy,
}

/// Places a file manifest onto a tree from [`crate::filesystem::TreeBuilder`].
///
/// Merging never touches the input tree: it is cloned first and only the
/// copy receives the launcher stub, the install info descriptor, the
/// uninstall registry value, the optional updater and every listed file.
/// Files are routed into the `app-<version>` entry point and must land in
/// directories that already exist there.
pub struct ManifestMerger<G> {
    options: MergeOptions,
    generator: G,
    separator: char,
}

impl<G: InstallInfoGenerator> ManifestMerger<G> {
    pub fn new(options: MergeOptions, generator: G) -> Self {
        Self {
            options,
            generator,
            separator: SEPARATOR,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    #[instrument(skip_all, fields(version = %self.options.version_label, files = files.len()))]
    pub fn merge<S: AsRef<str>>(
        &self,
        tree: &TreeNode,
        files: &[S],
    ) -> Result<TreeNode, MergeError> {
        let mut output = tree.clone();

        let install_info_path = self
            .generator
            .generate(&self.options.version_label)
            .context(InstallInfoSnafu)?;
        let mut root_files = vec![
            FileRecord::new(
                format!("{}.exe", self.options.executable_name),
                self.options.stub_executable_path.as_str(),
            ),
            FileRecord::new(INSTALL_INFO_FILE_NAME, install_info_path),
        ];
        output
            .registry_entries
            .push(self.options.registry_scope.install_path_record());
        if self.options.auto_update {
            debug!("Bundling updater from {}", self.options.updater_path);
            root_files.push(FileRecord::new(
                UPDATER_FILE_NAME,
                self.options.updater_path.as_str(),
            ));
        }
        for record in root_files {
            self.place(&mut output, record)?;
        }

        let entry_name = version_dir_name(&self.options.version_label);
        let entry_point = output
            .child_mut(&entry_name)
            .context(MissingEntryPointSnafu { name: entry_name })?;
        for file in files {
            self.place_file(entry_point, file.as_ref())?;
        }

        info!(
            placed = files.len(),
            total = output.file_count(),
            "Merged file manifest"
        );
        Ok(output)
    }

    /// Walks `path` down from `entry_point` and records it in the directory
    /// named by its second-to-last segment.
    fn place_file(&self, entry_point: &mut TreeNode, path: &str) -> Result<(), MergeError> {
        let segments = relative_segments(&entry_point.path, path, self.separator).context(
            InvalidPathRelationshipSnafu {
                path,
                root: entry_point.path.as_str(),
            },
        )?;

        let Some((file_name, directories)) = segments.split_last() else {
            return InvalidPathRelationshipSnafu {
                path,
                root: entry_point.path.as_str(),
            }
            .fail();
        };

        let mut node = entry_point;
        for segment in directories {
            node = node
                .child_mut(segment)
                .context(MissingDirectoryNodeSnafu { path, segment: *segment })?;
        }

        self.place(node, FileRecord::new(*file_name, path))
    }

    fn place(&self, node: &mut TreeNode, record: FileRecord) -> Result<(), MergeError> {
        if node.contains_file(&record.path) {
            ensure!(
                self.options.duplicate_policy == DuplicatePolicy::Skip,
                DuplicateFileEntrySnafu {
                    path: record.path,
                    node: node.path.as_str(),
                }
            );
            debug!("Skipping repeated file {} in {}", record.path, node.path);
            return Ok(());
        }
        node.files.push(record);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum MergeError {
    #[snafu(display(
        "Cannot place '{}': directory '{}' is not part of the tree",
        path,
        segment
    ))]
    MissingDirectoryNode { path: String, segment: String },
    #[snafu(display("Cannot place '{}': it is not inside '{}'", path, root))]
    InvalidPathRelationship { path: String, root: String },
    #[snafu(display("File '{}' is listed more than once in '{}'", path, node))]
    DuplicateFileEntry { path: String, node: String },
    #[snafu(display("Tree has no '{}' entry point", name))]
    MissingEntryPoint { name: String },
    #[snafu(display("Failed to generate the install info file"))]
    InstallInfoError { source: InstallInfoError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::TreeBuilder;
    use crate::manifest::registry::RegistryHive;
    use rstest::*;

    const INFO_PATH: &str = "/tmp/app.installInfo.json";

    struct FixedInstallInfo;

    impl InstallInfoGenerator for FixedInstallInfo {
        fn generate(&self, _version: &str) -> Result<String, InstallInfoError> {
            Ok(INFO_PATH.to_string())
        }
    }

    struct FailingInstallInfo;

    impl InstallInfoGenerator for FailingInstallInfo {
        fn generate(&self, _version: &str) -> Result<String, InstallInfoError> {
            Err(InstallInfoError::WriteError {
                file_path: "/readonly/info.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[fixture]
    fn options() -> MergeOptions {
        MergeOptions {
            executable_name: "App".into(),
            stub_executable_path: "a/App.exe".into(),
            auto_update: false,
            version_label: "1.0".into(),
            updater_path: "vendor/Update.exe".into(),
            registry_scope: RegistryScope {
                manufacturer: "Acme".into(),
                short_name: "app".into(),
                hive: RegistryHive::CurrentUser,
            },
            duplicate_policy: DuplicatePolicy::Skip,
        }
    }

    #[fixture]
    fn tree() -> TreeNode {
        TreeBuilder::new("a")
            .with_version_label("1.0")
            .with_separator('/')
            .build(&["a", "a/b", "a/b/c", "a/d"])
    }

    fn merger(options: MergeOptions) -> ManifestMerger<FixedInstallInfo> {
        ManifestMerger::new(options, FixedInstallInfo).with_separator('/')
    }

    fn file_names(node: &TreeNode) -> Vec<&str> {
        node.files.iter().map(|file| file.name.as_str()).collect()
    }

    #[rstest]
    fn places_file_in_versioned_directory(options: MergeOptions, tree: TreeNode) {
        let merged = merger(options)
            .merge(&tree, &["a/b/c/file.txt"])
            .expect("Merge should succeed");

        assert_eq!(file_names(&merged), vec!["App.exe", ".installInfo.json"]);
        assert_eq!(merged.files[0].path, "a/App.exe");
        assert_eq!(merged.files[1].path, INFO_PATH);

        let c = merged.find(["app-1.0", "b", "c"]).unwrap();
        assert_eq!(c.files, vec![FileRecord::new("file.txt", "a/b/c/file.txt")]);

        assert!(
            merged
                .walk()
                .all(|(_, node)| node.files.iter().all(|file| file.name != UPDATER_FILE_NAME))
        );
    }

    #[rstest]
    fn adds_single_registry_entry_at_root(options: MergeOptions, tree: TreeNode) {
        let merged = merger(options).merge(&tree, &["a/d/x.dll"]).unwrap();

        assert_eq!(merged.registry_entries.len(), 1);
        assert_eq!(merged.registry_entries[0].key, "Software\\Acme\\app");
        assert!(
            merged
                .walk()
                .skip(1)
                .all(|(_, node)| node.registry_entries.is_empty())
        );
    }

    #[rstest]
    fn auto_update_bundles_updater(mut options: MergeOptions, tree: TreeNode) {
        options.auto_update = true;

        let merged = merger(options).merge(&tree, &[] as &[&str]).unwrap();

        assert_eq!(
            file_names(&merged),
            vec!["App.exe", ".installInfo.json", "Update.exe"]
        );
        assert_eq!(merged.files[2].path, "vendor/Update.exe");
    }

    #[rstest]
    fn top_level_files_go_to_entry_point(options: MergeOptions, tree: TreeNode) {
        let merged = merger(options).merge(&tree, &["a/README.md"]).unwrap();

        let entry_point = merged.child("app-1.0").unwrap();
        assert_eq!(file_names(entry_point), vec!["README.md"]);
    }

    #[rstest]
    fn input_tree_is_left_untouched(options: MergeOptions, tree: TreeNode) {
        let before = tree.clone();

        let merged = merger(options).merge(&tree, &["a/b/c/file.txt"]).unwrap();

        assert_eq!(tree, before);
        assert_ne!(merged, tree);
    }

    #[rstest]
    fn merging_is_repeatable(options: MergeOptions, tree: TreeNode) {
        let files = ["a/b/one.txt", "a/b/c/two.txt", "a/d/three.txt"];
        let merger = merger(options);

        let first = merger.merge(&tree.clone(), &files).unwrap();
        let second = merger.merge(&tree.clone(), &files).unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    fn files_keep_manifest_order(options: MergeOptions, tree: TreeNode) {
        let merged = merger(options)
            .merge(&tree, &["a/b/z.txt", "a/b/a.txt", "a/b/m.txt"])
            .unwrap();

        let b = merged.find(["app-1.0", "b"]).unwrap();
        assert_eq!(file_names(b), vec!["z.txt", "a.txt", "m.txt"]);
    }

    #[rstest]
    fn missing_directory_is_reported(options: MergeOptions, tree: TreeNode) {
        let result = merger(options).merge(&tree, &["a/b/missing/file.txt"]);

        match result {
            Err(MergeError::MissingDirectoryNode { path, segment }) => {
                assert_eq!(path, "a/b/missing/file.txt");
                assert_eq!(segment, "missing");
            }
            other => panic!("Expected MissingDirectoryNode, got {other:?}"),
        }
    }

    #[rstest]
    fn error_message_names_the_file(options: MergeOptions, tree: TreeNode) {
        let error = merger(options)
            .merge(&tree, &["a/e/file.txt"])
            .unwrap_err();

        let message = error.to_string();
        assert!(message.contains("a/e/file.txt"));
        assert!(message.contains("'e'"));
    }

    #[rstest]
    #[case("elsewhere/file.txt")]
    #[case("ab/file.txt")]
    #[case("a")]
    fn files_outside_root_are_rejected(
        options: MergeOptions,
        tree: TreeNode,
        #[case] path: &str,
    ) {
        let result = merger(options).merge(&tree, &[path]);

        assert!(matches!(
            result,
            Err(MergeError::InvalidPathRelationship { .. })
        ));
    }

    #[rstest]
    fn repeated_file_is_kept_once_by_default(options: MergeOptions, tree: TreeNode) {
        let merged = merger(options)
            .merge(&tree, &["a/d/x.dll", "a/d/x.dll"])
            .unwrap();

        assert_eq!(merged.find(["app-1.0", "d"]).unwrap().files.len(), 1);
    }

    #[rstest]
    fn repeated_file_fails_when_rejecting(mut options: MergeOptions, tree: TreeNode) {
        options.duplicate_policy = DuplicatePolicy::Reject;

        let result = merger(options).merge(&tree, &["a/d/x.dll", "a/d/x.dll"]);

        assert!(matches!(
            result,
            Err(MergeError::DuplicateFileEntry { ref path, .. }) if path == "a/d/x.dll"
        ));
    }

    #[rstest]
    fn unversioned_tree_has_no_entry_point(options: MergeOptions) {
        let tree = TreeBuilder::new("a").with_separator('/').build(&["a/b"]);

        let result = merger(options).merge(&tree, &["a/b/file.txt"]);

        assert!(matches!(
            result,
            Err(MergeError::MissingEntryPoint { ref name }) if name == "app-1.0"
        ));
    }

    #[rstest]
    fn install_info_failure_propagates(options: MergeOptions, tree: TreeNode) {
        let result = ManifestMerger::new(options, FailingInstallInfo)
            .with_separator('/')
            .merge(&tree, &["a/b/file.txt"]);

        assert!(matches!(
            result,
            Err(MergeError::InstallInfoError {
                source: InstallInfoError::WriteError { .. }
            })
        ));
    }
}
