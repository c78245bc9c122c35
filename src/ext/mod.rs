mod absolute_path_ext;

pub use absolute_path_ext::AbsolutePathExt;
