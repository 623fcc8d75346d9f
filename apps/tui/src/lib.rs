// Export our modules for use in binaries and tests
pub mod config;
pub mod report;
pub mod source;

pub use source::FileSource;
