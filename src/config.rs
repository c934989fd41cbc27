//! Interpreter configuration.

use std::path::PathBuf;

/// Default nesting limit for calls, instantiations and includes.
pub const DEFAULT_MAX_DEPTH: usize = 2_500;

/// Default script extension appended to bare include names.
pub const DEFAULT_EXTENSION: &str = "brisk";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directories searched, in order, after the literal path and the
    /// current working directory when resolving `include` targets.
    pub search_paths: Vec<PathBuf>,
    /// Extension used when an include target is given without one.
    pub extension: String,
    /// Activation depth past which evaluation aborts with a fatal error.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_paths: vec![],
            extension: String::from(DEFAULT_EXTENSION),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
