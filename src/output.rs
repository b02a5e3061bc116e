//! Rendering of a [`Snapshot`] into the tree + content document.
//!
//! ```text
//! Repository Structure:
//! └── <root-name>
//!     ├── <entry>
//!     │   └── <entry>
//!     └── <entry>
//!
//! Files Content:
//! ================================================
//! File: <relative/path>
//! ================================================
//! <content-or-marker>
//!
//! ```
//!
//! Text files are read while their block is written, so at most one file's
//! content is held in memory at a time.

use crate::error::{AccessError, RepotextError};
use crate::tree::write_structure;
use crate::types::{Classification, Node, Snapshot};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
#[cfg(feature = "logging")]
use tracing;

/// Separator around each file header. The width is fixed for compatibility
/// with documents produced by earlier versions.
pub const SEPARATOR: &str = "================================================";

pub const CONTENT_HEADER: &str = "Files Content:";
pub const BINARY_MARKER: &str = "[Binary file]";

/// Renders the whole document into a string.
pub fn render_document(snapshot: &Snapshot) -> String {
    let mut buf = Vec::with_capacity(4096);
    write_document(snapshot, &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

/// Streams the document into `out`, structure section first.
///
/// Failing to re-read a text file is not an error: its block gets the
/// unreadable marker instead. Only failures of `out` itself are returned.
pub fn write_document<W: Write>(snapshot: &Snapshot, mut out: W) -> io::Result<()> {
    write_structure(&snapshot.root, &mut out)?;
    writeln!(out)?;
    writeln!(out, "{}", CONTENT_HEADER)?;
    for file in snapshot.root.files() {
        write_file_block(file, &mut out)?;
    }
    out.flush()
}

/// Writes the document to `path` through a temporary file in the same
/// directory, renamed into place only once complete.
pub fn write_document_to_file(
    snapshot: &Snapshot,
    path: impl AsRef<Path>,
) -> Result<(), RepotextError> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let tmp = NamedTempFile::new_in(dir).map_err(|e| RepotextError::io(dir, e))?;
    let mut writer = BufWriter::new(tmp);
    write_document(snapshot, &mut writer).map_err(|e| RepotextError::io(path, e))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| RepotextError::io(path, e.into_error()))?;
    tmp.persist(path)
        .map_err(|e| RepotextError::io(path, e.error))?;
    Ok(())
}

fn write_file_block<W: Write>(file: &Node, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "File: {}", file.display_path())?;
    writeln!(out, "{}", SEPARATOR)?;
    match file.classification() {
        Some(Classification::Text) => match fs::read(&file.path) {
            Ok(bytes) => out.write_all(String::from_utf8_lossy(&bytes).as_bytes())?,
            Err(e) => {
                #[cfg(feature = "logging")]
                tracing::warn!("Cannot re-read {}: {}", file.path.display(), e);
                out.write_all(unreadable_marker(&AccessError::new(e)).as_bytes())?
            }
        },
        Some(Classification::Binary) => out.write_all(BINARY_MARKER.as_bytes())?,
        Some(Classification::Oversized { limit }) => {
            out.write_all(oversized_marker(*limit).as_bytes())?
        }
        Some(Classification::Unreadable(err)) => {
            out.write_all(unreadable_marker(err).as_bytes())?
        }
        None => {}
    }
    out.write_all(b"\n\n")
}

/// Marker for a file above the size limit.
pub fn oversized_marker(limit: u64) -> String {
    format!("[File too large to include: exceeds {} bytes]", limit)
}

/// Marker for a file that could not be read, naming only the error class.
pub fn unreadable_marker(err: &AccessError) -> String {
    format!("[Unreadable file: {}]", err.kind.label())
}
