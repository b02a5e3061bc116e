use crate::classify::classify;
use crate::error::{AccessError, AccessErrorKind, RepotextError};
use crate::options::Config;
use crate::output::render_document;
use crate::types::{Classification, Node, Snapshot};
use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

struct Walker {
    inner: ignore::Walk,
    root: PathBuf,
}

impl Walker {
    fn new(config: &Config) -> Self {
        let root = config.root().to_path_buf();
        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b));
        let matcher = config.matcher().clone();
        let filter_root = root.clone();
        builder.filter_entry(move |entry| {
            let relative = entry
                .path()
                .strip_prefix(&filter_root)
                .unwrap_or(entry.path());
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            match matcher.matching_rule(relative, is_dir) {
                Some(_rule) => {
                    #[cfg(feature = "logging")]
                    tracing::debug!(
                        "Pruned {} (pattern '{}')",
                        relative.display(),
                        _rule.pattern()
                    );
                    false
                }
                None => true,
            }
        });
        Self {
            inner: builder.build(),
            root,
        }
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Directories still being filled; `open[d]` is the directory at depth `d`.
struct TreeBuilder {
    open: Vec<Node>,
}

impl TreeBuilder {
    fn new(root: Node) -> Self {
        Self { open: vec![root] }
    }

    /// Closes every directory deeper than `depth - 1`, so that the next
    /// entry at `depth` lands in its parent.
    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth.max(1) {
            if let Some(done) = self.open.pop() {
                if let Some(parent) = self.open.last_mut() {
                    parent.push_child(done);
                }
            }
        }
    }

    fn attach(&mut self, depth: usize, node: Node) {
        self.close_to(depth);
        if let Some(parent) = self.open.last_mut() {
            parent.push_child(node);
        }
    }

    fn enter(&mut self, depth: usize, node: Node) {
        self.close_to(depth);
        self.open.push(node);
    }

    /// The open directory at `path`, if the walker is currently inside it.
    fn open_dir_mut(&mut self, path: &Path) -> Option<&mut Node> {
        self.open.iter_mut().rev().find(|n| n.path == path)
    }

    fn finish(mut self) -> Option<Node> {
        self.close_to(1);
        self.open.pop()
    }
}

/// Walks the configured root and returns the filtered, classified tree.
///
/// Per-entry failures are recorded on the affected node and never abort the
/// walk. File contents are not kept; text files are read again when the
/// document is written.
pub fn walk(config: &Config) -> Result<Node, RepotextError> {
    #[cfg(feature = "logging")]
    tracing::debug!("Starting walk with root: {}", config.root().display());
    let Walker { inner, root: base } = Walker::new(config);
    let root = Node::directory(
        config.root_name().to_string(),
        PathBuf::new(),
        config.root().to_path_buf(),
    );
    let mut tree = TreeBuilder::new(root);

    for result in inner {
        match result {
            Ok(entry) if entry.depth() == 0 => {}
            Ok(entry) => visit(&base, config, &mut tree, entry),
            Err(err) => record_error(&base, config, &mut tree, err),
        }
    }

    tree.finish()
        .ok_or_else(|| RepotextError::Walk("walk produced no root".to_string()))
}

fn visit(base: &Path, config: &Config, tree: &mut TreeBuilder, entry: DirEntry) {
    let path = entry.path().to_path_buf();
    let relative = relative_to(base, &path);
    let depth = relative.components().count();
    let name = entry.file_name().to_string_lossy().into_owned();
    let file_type = entry.file_type();

    if file_type.is_some_and(|t| t.is_dir()) {
        tree.enter(depth, Node::directory(name, relative, path));
        return;
    }

    let (size, classification) = if file_type.is_some_and(|t| t.is_file()) {
        match entry.metadata() {
            Ok(meta) => {
                let size = meta.len();
                (size, classify(&path, size, config.max_file_size()))
            }
            Err(err) => {
                let (kind, source) = flatten_error(err, &mut None);
                (0, Classification::Unreadable(AccessError::with_kind(kind, source)))
            }
        }
    } else {
        let source = io::Error::other("not a regular file");
        let err = AccessError::with_kind(AccessErrorKind::NotRegular, source);
        (0, Classification::Unreadable(err))
    };
    tree.attach(depth, Node::file(name, relative, path, size, classification));
}

fn record_error(base: &Path, config: &Config, tree: &mut TreeBuilder, err: ignore::Error) {
    let mut path = None;
    let (mut kind, source) = flatten_error(err, &mut path);
    let Some(path) = path else {
        #[cfg(feature = "logging")]
        tracing::warn!("Walk error without location: {}", source);
        return;
    };

    #[cfg(feature = "logging")]
    tracing::warn!("Cannot access {}: {}", path.display(), source);

    // a directory that was entered but could not be listed
    if let Some(dir) = tree.open_dir_mut(&path) {
        dir.set_error(AccessError::with_kind(kind, source));
        return;
    }

    let relative = relative_to(base, &path);
    let depth = relative.components().count();
    if depth == 0 || config.matcher().matches(&relative, false) {
        return;
    }
    if kind == AccessErrorKind::NotFound && is_symlink(&path) {
        kind = AccessErrorKind::BrokenLink;
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let classification = Classification::Unreadable(AccessError::with_kind(kind, source));
    tree.attach(depth, Node::file(name, relative, path, 0, classification));
}

/// Unwraps the location wrappers of a walk error, keeping the path it
/// refers to, and returns the error class with the underlying I/O error.
fn flatten_error(err: ignore::Error, path: &mut Option<PathBuf>) -> (AccessErrorKind, io::Error) {
    match err {
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            flatten_error(*err, path)
        }
        ignore::Error::WithPath { path: p, err } => {
            *path = Some(p);
            flatten_error(*err, path)
        }
        ignore::Error::Loop { ancestor, child } => {
            *path = Some(child);
            let source = io::Error::other(format!("loops back to {}", ancestor.display()));
            (AccessErrorKind::LinkLoop, source)
        }
        ignore::Error::Io(source) => (AccessErrorKind::from_io(&source), source),
        other => (AccessErrorKind::Other, io::Error::other(other.to_string())),
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

/// Walks the configured root.
///
/// # Errors
///
/// Only a walk that cannot produce a root node fails; per-entry failures are
/// recorded in the tree.
pub fn repotext(config: &Config) -> Result<Snapshot, RepotextError> {
    let root = walk(config)?;
    Ok(Snapshot { root })
}

/// Walks the configured root and renders the whole document into a string.
pub fn generate(config: &Config) -> Result<String, RepotextError> {
    let snapshot = repotext(config)?;
    Ok(render_document(&snapshot))
}
