#[allow(clippy::module_inception)]
mod config;

pub use config::{init_runtime_paths, load_config, RuntimePaths};
