use std::path::{Component, Path, PathBuf};

/// Absolute, lexically normalized form of `path` for diagnostics.
///
/// Never touches the filesystem, so it also works for paths that do not
/// exist yet. Falls back to the path as given when the working directory
/// cannot be determined.
pub fn absolute_display(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize(&absolute).display().to_string()
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.last() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            _ => normalized.push(component),
        }
    }
    normalized.iter().collect()
}

pub trait AbsolutePathExt {
    fn absolute_display(&self) -> String;
}

impl AbsolutePathExt for Path {
    fn absolute_display(&self) -> String {
        absolute_display(self)
    }
}

impl AbsolutePathExt for PathBuf {
    fn absolute_display(&self) -> String {
        absolute_display(self)
    }
}
