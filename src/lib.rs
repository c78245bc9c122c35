#![allow(clippy::enum_variant_names)]

//! Turns the file listing of a packaged application into the directory
//! tree an installer build walks, with the launcher stub, install info
//! descriptor, uninstall registry value and optional updater overlaid.

pub mod application;
pub mod cli;
pub mod config;
pub mod ext;
pub mod filesystem;
pub mod manifest;
