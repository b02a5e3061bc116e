//! Text/binary/oversized classification of individual files.

use crate::error::AccessError;
use crate::types::Classification;
use std::fs::File;
use std::io::Read;
use std::path::Path;
#[cfg(feature = "logging")]
use tracing;

/// Number of leading bytes inspected by the binary heuristic.
pub const SAMPLE_SIZE: usize = 8 * 1024;

/// Percentage of non-printable bytes in the sample at which a file counts as
/// binary. Reaching the threshold exactly already counts.
pub const NON_PRINTABLE_PERCENT: usize = 10;

/// Classifies a file from its size and leading bytes.
///
/// Only the first [`SAMPLE_SIZE`] bytes are read; oversized files are not
/// opened at all.
pub fn classify(path: &Path, size: u64, max_file_size: u64) -> Classification {
    if size > max_file_size {
        #[cfg(feature = "logging")]
        tracing::debug!(
            "File too large ({} > {}): {}",
            size,
            max_file_size,
            path.display()
        );
        return Classification::Oversized {
            limit: max_file_size,
        };
    }
    let sample = match read_sample(path) {
        Ok(sample) => sample,
        Err(e) => {
            #[cfg(feature = "logging")]
            tracing::warn!("Cannot read {}: {}", path.display(), e);
            return Classification::Unreadable(AccessError::new(e));
        }
    };
    if looks_binary(&sample) {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary file detected: {}", path.display());
        Classification::Binary
    } else {
        Classification::Text
    }
}

fn read_sample(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64).read_to_end(&mut sample)?;
    Ok(sample)
}

/// Binary heuristic over a byte sample.
///
/// A null byte always means binary, as does anything `content_inspector`
/// recognises as binary. Otherwise the sample is binary once control bytes
/// (other than the usual whitespace, bell, backspace, form feed and escape)
/// make up [`NON_PRINTABLE_PERCENT`] of it.
pub fn looks_binary(sample: &[u8]) -> bool {
    if sample.contains(&0) {
        return true;
    }
    if content_inspector::inspect(sample).is_binary() {
        return true;
    }
    let non_printable = sample.iter().filter(|b| !is_printable(**b)).count();
    non_printable > 0 && non_printable * 100 >= sample.len() * NON_PRINTABLE_PERCENT
}

fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x07 | 0x08 | b'\t' | b'\n' | 0x0c | b'\r' | 0x1b)
        || (byte >= 0x20 && byte != 0x7f)
}
