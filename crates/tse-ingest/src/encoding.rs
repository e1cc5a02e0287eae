//! Text encoding for CSV payloads.
//!
//! TSE publishes Latin-1 files. Labels follow the WHATWG encoding standard,
//! so `latin-1` and `iso-8859-1` both resolve to windows-1252.

use std::borrow::Cow;

use encoding_rs::Encoding;
use tracing::warn;

use crate::error::{IngestError, Result};

/// Encoding label of TSE source files.
pub const LATIN_1: &str = "latin-1";

fn lookup(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| IngestError::UnknownEncoding(label.to_string()))
}

/// Decode `bytes` from the encoding named by `label`. A leading BOM is removed.
///
/// # Errors
///
/// Fails when `label` is not a known encoding.
pub fn decode<'a>(bytes: &'a [u8], label: &str) -> Result<Cow<'a, str>> {
    let encoding = lookup(label)?;
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = actual.name(), "malformed input replaced while decoding");
    }
    Ok(text)
}

/// Encode `text` into the encoding named by `label`.
///
/// Characters the target encoding cannot represent are written as numeric
/// character references.
///
/// # Errors
///
/// Fails when `label` is not a known encoding.
pub fn encode(text: &str, label: &str) -> Result<Vec<u8>> {
    let encoding = lookup(label)?;
    let (bytes, actual, had_unmappable) = encoding.encode(text);
    if had_unmappable {
        warn!(encoding = actual.name(), "unmappable characters replaced while encoding");
    }
    Ok(bytes.into_owned())
}
