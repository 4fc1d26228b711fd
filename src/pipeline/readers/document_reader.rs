use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::data_model::RawDocument;
use crate::error::{PipelineError, Result};

pub const DEFAULT_ENCODING: &str = "utf-8";
const ENCODING_TOKEN_START: &[u8] = b"encoding=\"";
const ENCODING_TOKEN_END: u8 = b'"';
/// Longest encoding name taken from a header; registered labels are far shorter.
const MAX_ENCODING_NAME_LEN: usize = 40;

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Best-effort sniff of the `encoding="..."` declaration in a document header.
///
/// The name is returned as written and never checked against known encodings;
/// an unknown name surfaces when the document is decoded.
pub fn resolve_encoding(bytes: &[u8]) -> String {
    let Some(start) = find_bytes(bytes, ENCODING_TOKEN_START) else {
        return DEFAULT_ENCODING.to_string();
    };
    let value_start = start + ENCODING_TOKEN_START.len();
    let rest = &bytes[value_start..];
    // An unclosed value also stops at the end of the declaration.
    let end = rest
        .iter()
        .position(|&b| b == ENCODING_TOKEN_END || b == b'?' || b == b'>' || b.is_ascii_whitespace())
        .unwrap_or(rest.len())
        .min(MAX_ENCODING_NAME_LEN);
    let value = &rest[..end];

    if value.is_empty() {
        DEFAULT_ENCODING.to_string()
    } else {
        String::from_utf8_lossy(value).into_owned()
    }
}

/// Reads one input file into memory and resolves its declared encoding.
pub fn read_raw_document(path: &Path) -> Result<RawDocument> {
    if !path.exists() {
        return Err(PipelineError::InputNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let encoding = resolve_encoding(&bytes);
    debug!(path = %path.display(), %encoding, size = bytes.len(), "Read raw document");
    Ok(RawDocument {
        path: path.to_path_buf(),
        bytes,
        encoding,
    })
}

/// Decodes a raw document to text using its declared encoding.
///
/// A leading BOM takes precedence over the declared label. Malformed sequences
/// are replaced with U+FFFD; an unknown encoding label fails.
pub fn decode_document(document: &RawDocument) -> Result<String> {
    let encoding = Encoding::for_label(document.encoding.trim().as_bytes())
        .ok_or_else(|| PipelineError::UnsupportedEncoding(document.encoding.clone()))?;

    let (text, used, had_errors) = encoding.decode(&document.bytes);
    if had_errors {
        warn!(
            path = %document.path.display(),
            encoding = used.name(),
            "Document contains malformed byte sequences; replaced with U+FFFD"
        );
    }
    Ok(text.into_owned())
}
