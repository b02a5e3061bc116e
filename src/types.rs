use crate::error::AccessError;
use std::path::{Component, Path, PathBuf};

/// Verdict assigned to a file before rendering.
#[derive(Debug)]
pub enum Classification {
    /// Content is emitted verbatim.
    Text,
    /// Content would corrupt the document and is replaced by a marker.
    Binary,
    /// The file is larger than `limit` bytes and was never read.
    Oversized { limit: u64 },
    /// The file could not be read.
    Unreadable(AccessError),
}

#[derive(Debug)]
pub enum NodeKind {
    Directory {
        /// Children in traversal order (lexicographic by name).
        children: Vec<Node>,
        /// Set when the directory itself could not be listed.
        error: Option<AccessError>,
    },
    File {
        size: u64,
        classification: Classification,
    },
}

/// One filesystem entry under the root.
#[derive(Debug)]
pub struct Node {
    /// Final path segment; for the root, the directory's own name.
    pub name: String,
    /// Path relative to the root; empty for the root itself.
    pub relative_path: PathBuf,
    /// Location on disk, used to read text content at render time.
    pub path: PathBuf,
    pub kind: NodeKind,
}

impl Node {
    pub(crate) fn directory(name: String, relative_path: PathBuf, path: PathBuf) -> Self {
        Self {
            name,
            relative_path,
            path,
            kind: NodeKind::Directory {
                children: Vec::new(),
                error: None,
            },
        }
    }

    pub(crate) fn file(
        name: String,
        relative_path: PathBuf,
        path: PathBuf,
        size: u64,
        classification: Classification,
    ) -> Self {
        Self {
            name,
            relative_path,
            path,
            kind: NodeKind::File {
                size,
                classification,
            },
        }
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        if let NodeKind::Directory { children, .. } = &mut self.kind {
            children.push(child);
        }
    }

    pub(crate) fn set_error(&mut self, err: AccessError) {
        if let NodeKind::Directory { error, .. } = &mut self.kind {
            *error = Some(err);
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Directory { children, .. } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match &self.kind {
            NodeKind::File { classification, .. } => Some(classification),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Relative path joined with `/` regardless of platform.
    pub fn display_path(&self) -> String {
        display_path(&self.relative_path)
    }

    /// File nodes in depth-first order, the order of the content section.
    pub fn files(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_files(self, &mut out);
        out
    }
}

fn collect_files<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    match &node.kind {
        NodeKind::File { .. } => out.push(node),
        NodeKind::Directory { children, .. } => {
            for child in children {
                collect_files(child, out);
            }
        }
    }
}

pub(crate) fn display_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Counts gathered over a finished walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    /// Directories below the root.
    pub directories: usize,
    pub files: usize,
    /// Sum of file sizes, including files whose content is not emitted.
    pub total_bytes: u64,
    pub text: usize,
    pub binary: usize,
    pub oversized: usize,
    pub unreadable: usize,
}

/// The complete result of a walk, ready to be rendered.
#[derive(Debug)]
pub struct Snapshot {
    pub root: Node,
}

impl Snapshot {
    pub fn stats(&self) -> SnapshotStats {
        let mut stats = SnapshotStats::default();
        for child in self.root.children() {
            tally(child, &mut stats);
        }
        stats
    }
}

fn tally(node: &Node, stats: &mut SnapshotStats) {
    match &node.kind {
        NodeKind::Directory { children, .. } => {
            stats.directories += 1;
            for child in children {
                tally(child, stats);
            }
        }
        NodeKind::File {
            size,
            classification,
        } => {
            stats.files += 1;
            stats.total_bytes += size;
            match classification {
                Classification::Text => stats.text += 1,
                Classification::Binary => stats.binary += 1,
                Classification::Oversized { .. } => stats.oversized += 1,
                Classification::Unreadable(_) => stats.unreadable += 1,
            }
        }
    }
}
