//! # Repotext
//!
//! `repotext` flattens a local directory tree into one deterministic text
//! document: a connector-drawn structure diagram followed by the content of
//! every included text file. Binary, oversized and unreadable files are listed
//! with a one-line marker instead of their bytes.
//!
//! Entries are visited in lexicographic order of their names, directories and
//! files interleaved, and ignore patterns prune whole subtrees. Running twice
//! over an unchanged tree yields byte-identical output.
//!
//! # Features
//!
//! - `logging` (default): debug and warning events via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use repotext::{RepotextBuilder, output, repotext};
//!
//! let config = RepotextBuilder::new(".")
//!     .max_file_size(500_000)
//!     .add_ignore_pattern("*.lock")
//!     .build()
//!     .expect("invalid configuration");
//!
//! let snapshot = repotext(&config).expect("walk failed");
//! print!("{}", output::render_document(&snapshot));
//! ```

pub mod classify;
mod engine;
mod error;
mod options;
pub mod output;
pub mod pattern;
pub mod tree;
mod types;

pub use engine::{generate, repotext, walk};
pub use error::{AccessError, AccessErrorKind, ConfigError, RepotextError};
pub use options::{Config, DEFAULT_MAX_FILE_SIZE, RepotextBuilder, RepotextOptions};
pub use pattern::{DEFAULT_IGNORE_PATTERNS, IgnoreRule, PatternMatcher, RuleScope};
pub use types::{Classification, Node, NodeKind, Snapshot, SnapshotStats};
