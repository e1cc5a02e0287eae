//! ZIP archive member access.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{IngestError, Result};

const MEMBER_PREFIX: &str = "consulta_cand_";

/// Names of all members in an in-memory archive, in archive order.
///
/// # Errors
///
/// Fails when `archive` is not a readable ZIP.
pub fn member_names(archive: &[u8]) -> Result<Vec<String>> {
    let archive = ZipArchive::new(Cursor::new(archive))?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Extract one member from an in-memory archive.
///
/// # Errors
///
/// Returns [`IngestError::MemberNotFound`] when no member has that name.
pub fn read_member(archive: &[u8], member: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(archive))?;
    let mut file = match archive.by_name(member) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => {
            return Err(IngestError::MemberNotFound {
                member: member.to_string(),
            });
        }
        Err(error) => return Err(error.into()),
    };
    let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut bytes)?;
    debug!(member, bytes = bytes.len(), "archive member extracted");
    Ok(bytes)
}

/// Member holding the national candidate table of a TSE archive.
///
/// The archive stem is taken from `source` when it contains
/// `consulta_cand_<year>`, and built from `year` otherwise. `target` is the
/// geographic scope, upper-cased (`BRASIL`).
pub fn candidate_member_name(source: &str, year: &str, target: &str) -> String {
    let stem = archive_stem(source).unwrap_or_else(|| format!("{MEMBER_PREFIX}{year}"));
    format!("{stem}_{}.csv", target.to_uppercase())
}

fn archive_stem(source: &str) -> Option<String> {
    let start = source.rfind(MEMBER_PREFIX)?;
    let digits: String = source[start + MEMBER_PREFIX.len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    (digits.len() == 4).then(|| format!("{MEMBER_PREFIX}{digits}"))
}
