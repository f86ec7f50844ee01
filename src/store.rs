use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::ranges::SortedAddresses;

/// Reads the address file left by a previous run.
///
/// Used for reporting only; the saved file is always rebuilt from scratch.
/// A missing or unreadable file reads as empty, and lines come back
/// verbatim with no validation.
pub fn load_existing(path: &Path) -> HashSet<String> {
    match fs::read_to_string(path) {
        Ok(contents) => contents.lines().map(str::to_owned).collect(),
        Err(error) => {
            if error.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), %error, "could not read existing address file");
            }
            HashSet::new()
        }
    }
}

/// Writes one address per line in ascending numeric order, replacing any
/// previous content.
///
/// Addresses are streamed straight off the span iterator, so the full list
/// is never materialized in memory.
pub fn save(path: &Path, addresses: &SortedAddresses) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for address in addresses.iter() {
        writeln!(writer, "{address}")?;
    }
    writer.flush()
}
