//! Segment-aware relationships between path strings.
//!
//! Paths are plain strings here; nothing touches the disk. A path is a
//! sequence of segments joined by a separator, and every relationship is
//! decided on segment boundaries rather than raw substrings, so `/my/path`
//! is never mistaken for a child of `/my/pat`.

/// Default separator for the current platform.
pub const SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// Returns true when `candidate` lies anywhere below `parent`.
///
/// `candidate` must start with `parent` immediately followed by the
/// separator. A path is never its own child.
pub fn is_child(parent: &str, candidate: &str, separator: char) -> bool {
    candidate
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with(separator))
}

/// Returns true when `candidate` is exactly one segment below `parent`.
pub fn is_direct_child(parent: &str, candidate: &str, separator: char) -> bool {
    is_child(parent, candidate, separator)
        && segment_count(candidate, separator) == segment_count(parent, separator) + 1
}

pub fn segment_count(path: &str, separator: char) -> usize {
    path.split(separator).count()
}

/// Final segment of `path`, or the whole string when it has no separator.
pub fn basename(path: &str, separator: char) -> &str {
    path.rsplit(separator).next().unwrap_or(path)
}

/// Segments of `path` below `root`, in order from the top.
///
/// Returns `None` when `path` is not a child of `root`.
pub fn relative_segments<'a>(root: &str, path: &'a str, separator: char) -> Option<Vec<&'a str>> {
    if !is_child(root, path, separator) {
        return None;
    }
    let rest = &path[root.len() + separator.len_utf8()..];
    Some(rest.split(separator).collect())
}
