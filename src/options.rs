use crate::error::ConfigError;
use crate::pattern::{DEFAULT_IGNORE_PATTERNS, PatternMatcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Files larger than this many bytes are marked oversized by default.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Unvalidated options, as supplied by a caller or a config document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepotextOptions {
    pub root: PathBuf,
    pub max_file_size: u64,
    /// Extra patterns, appended after the defaults.
    pub ignore_patterns: Vec<String>,
    pub use_default_ignores: bool,
}

impl Default for RepotextOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            ignore_patterns: Vec::new(),
            use_default_ignores: true,
        }
    }
}

impl RepotextOptions {
    /// Validates the options and compiles the ignore rules.
    ///
    /// # Errors
    ///
    /// Fails if the root does not exist or is not a directory, if the size
    /// limit is zero, or if any ignore pattern is malformed.
    pub fn resolve(self) -> Result<Config, ConfigError> {
        let root = fs::canonicalize(&self.root).map_err(|source| ConfigError::RootNotFound {
            path: self.root.clone(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ConfigError::RootNotDirectory(root));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::ZeroSizeLimit);
        }
        let defaults: &[&str] = if self.use_default_ignores {
            DEFAULT_IGNORE_PATTERNS
        } else {
            &[]
        };
        let matcher = PatternMatcher::new(
            defaults
                .iter()
                .copied()
                .chain(self.ignore_patterns.iter().map(String::as_str)),
        )?;
        let root_name = root_name(&root);
        Ok(Config {
            root,
            root_name,
            max_file_size: self.max_file_size,
            matcher,
        })
    }
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// Resolved, immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    root_name: String,
    max_file_size: u64,
    matcher: PatternMatcher,
}

impl Config {
    /// Absolute, canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name shown for the root in the structure section.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }
}

#[derive(Debug, Default)]
pub struct RepotextBuilder {
    options: RepotextOptions,
}

impl RepotextBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: RepotextOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn from_options(options: RepotextOptions) -> Self {
        Self { options }
    }
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.options.max_file_size = bytes;
        self
    }
    /// Replaces the extra patterns. The defaults stay active.
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn add_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.ignore_patterns.push(pattern.into());
        self
    }
    pub fn use_default_ignores(mut self, yes: bool) -> Self {
        self.options.use_default_ignores = yes;
        self
    }
    pub fn options(&self) -> &RepotextOptions {
        &self.options
    }
    pub fn build(self) -> Result<Config, ConfigError> {
        self.options.resolve()
    }
}
