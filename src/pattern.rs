//! Ignore rules and the matcher that decides which entries are pruned.
//!
//! Patterns are glob-style (`*`, `?`, `[...]`, `**`) and case-sensitive:
//!
//! - `node_modules`, `*.pyc`: matched against every single path segment, so the
//!   entry is excluded at any depth.
//! - `src/*.tmp`: contains a separator, matched against the whole path relative
//!   to the root. `*` never crosses a `/`, `**` does.
//! - `/docs/generated`: a leading `/` anchors the pattern to the root.
//! - `logs/`: a trailing `/` restricts the pattern to directories.

use crate::error::ConfigError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// Patterns that are always active unless defaults are disabled.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // python
    "*.pyc",
    "*.pyo",
    "*.pyd",
    "__pycache__",
    // javascript
    "node_modules",
    "bower_components",
    // version control
    ".git",
    ".svn",
    ".hg",
    ".gitignore",
    // images; raster formats are left to binary detection
    "*.svg",
    // virtual environments
    "venv",
    ".venv",
    "env",
    "*venv*",
    // editors
    ".idea",
    ".vscode",
    // temporary files
    "*.log",
    "*.bak",
    "*.swp",
    "*.tmp",
    // os metadata
    ".DS_Store",
    "Thumbs.db",
    // build output
    "build",
    "dist",
    "*.egg-info",
    "*.so",
    "*.dylib",
    "*.dll",
];

/// Where in a relative path a rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Any single path segment.
    Segment,
    /// The whole path relative to the root.
    Path,
}

/// One parsed ignore pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pattern: String,
    glob: String,
    scope: RuleScope,
    directory_only: bool,
}

impl IgnoreRule {
    /// Parses a pattern string into a rule. The glob itself is validated when
    /// the rule is compiled into a [`PatternMatcher`].
    pub fn parse(pattern: &str) -> Self {
        let mut glob = pattern;
        let mut directory_only = false;
        if glob.len() > 1 && glob.ends_with('/') {
            directory_only = true;
            glob = glob.trim_end_matches('/');
        }
        let scope = if let Some(anchored) = glob.strip_prefix('/') {
            glob = anchored;
            RuleScope::Path
        } else if glob.contains('/') {
            RuleScope::Path
        } else {
            RuleScope::Segment
        };
        Self {
            pattern: pattern.to_string(),
            glob: glob.to_string(),
            scope,
            directory_only,
        }
    }

    /// The pattern exactly as configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    pub fn directory_only(&self) -> bool {
        self.directory_only
    }
}

/// Compiled, immutable set of ignore rules.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rules: Vec<IgnoreRule>,
    segments: GlobSet,
    segment_rules: Vec<usize>,
    paths: GlobSet,
    path_rules: Vec<usize>,
}

impl PatternMatcher {
    /// Compiles the given patterns in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first malformed glob.
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        let mut segments = GlobSetBuilder::new();
        let mut segment_rules = Vec::new();
        let mut paths = GlobSetBuilder::new();
        let mut path_rules = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let rule = IgnoreRule::parse(pattern);
            let glob = GlobBuilder::new(&rule.glob)
                .literal_separator(true)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            match rule.scope {
                RuleScope::Segment => {
                    segments.add(glob);
                    segment_rules.push(rules.len());
                }
                RuleScope::Path => {
                    paths.add(glob);
                    path_rules.push(rules.len());
                }
            }
            rules.push(rule);
        }

        let build = |builder: GlobSetBuilder| {
            builder.build().map_err(|source| ConfigError::InvalidPattern {
                pattern: String::new(),
                source,
            })
        };
        Ok(Self {
            rules,
            segments: build(segments)?,
            segment_rules,
            paths: build(paths)?,
            path_rules,
        })
    }

    /// Rules in configuration order.
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Returns true if any rule excludes `relative_path`.
    pub fn matches(&self, relative_path: &Path, is_dir: bool) -> bool {
        self.matching_rule(relative_path, is_dir).is_some()
    }

    /// Returns the first rule (in configuration order) that excludes
    /// `relative_path`, if any.
    pub fn matching_rule(&self, relative_path: &Path, is_dir: bool) -> Option<&IgnoreRule> {
        let segments: Vec<_> = relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        let last = segments.len().checked_sub(1)?;

        let mut hit: Option<usize> = None;
        let mut consider = |rule: usize, entry_is_dir: bool| {
            if self.rules[rule].directory_only && !entry_is_dir {
                return;
            }
            hit = Some(hit.map_or(rule, |h| h.min(rule)));
        };

        for (i, segment) in segments.iter().enumerate() {
            // every segment before the last names an ancestor directory
            let segment_is_dir = i < last || is_dir;
            for idx in self.segments.matches(Path::new(segment)) {
                consider(self.segment_rules[idx], segment_is_dir);
            }
        }

        if !self.path_rules.is_empty() {
            let joined = segments
                .iter()
                .map(|s| s.to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            for idx in self.paths.matches(Path::new(&joined)) {
                consider(self.path_rules[idx], is_dir);
            }
        }

        hit.map(|rule| &self.rules[rule])
    }
}
