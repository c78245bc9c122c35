use std::fmt::Write as _;

use colored::Colorize;

use super::tree::TreeNode;

const INDENT: &str = "  ";

/// Renders the tree as an indented listing, one line per directory, file
/// and registry value.
///
/// Colouring follows the global `colored` override, so callers decide once
/// whether the output stream supports it.
pub fn render_tree(tree: &TreeNode) -> String {
    let mut out = String::new();
    for (depth, node) in tree.walk() {
        let indent = INDENT.repeat(depth);
        let _ = writeln!(out, "{indent}{}/", node.name.blue().bold());
        for file in &node.files {
            let _ = writeln!(
                out,
                "{indent}{INDENT}{} {}",
                file.name,
                format!("<- {}", file.path).dimmed()
            );
        }
        for entry in &node.registry_entries {
            let _ = writeln!(
                out,
                "{indent}{INDENT}{} {}\\{}\\{} = {}",
                "reg".yellow(),
                entry.root,
                entry.key,
                entry.name,
                entry.value
            );
        }
    }
    out
}
