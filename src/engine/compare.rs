//! Exact file content comparison
//!
//! Size check first, then a streaming byte comparison with a fixed buffer so
//! memory use stays bounded on large files. No sampling, no hashing shortcut;
//! equality means byte-identical. Assumes the files are not being modified
//! concurrently by the host system.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{FusionError, Result};

const CHUNK_SIZE: usize = 64 * 1024;

/// Returns true when both files have identical byte content.
///
/// Symmetric and stable across repeated calls on quiescent files. An
/// unreadable path yields an `Io` error; callers treat that as an error for
/// the file in question, not as fatal to the run.
pub fn files_equal(a: &Path, b: &Path) -> Result<bool> {
    let meta_a = a.metadata().map_err(|e| FusionError::io(a, e))?;
    let meta_b = b.metadata().map_err(|e| FusionError::io(b, e))?;

    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(File::open(a).map_err(|e| FusionError::io(a, e))?);
    let mut reader_b = BufReader::new(File::open(b).map_err(|e| FusionError::io(b, e))?);

    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];

    loop {
        let read_a = read_full(&mut reader_a, &mut buf_a).map_err(|e| FusionError::io(a, e))?;
        let read_b = read_full(&mut reader_b, &mut buf_b).map_err(|e| FusionError::io(b, e))?;

        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

/// Read until the buffer is full or EOF is reached, returning bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
