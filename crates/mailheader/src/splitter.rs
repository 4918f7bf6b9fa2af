use crate::{HeaderFieldError, Result};

/// Locate the first line break in `data` that is not a valid
/// folding point, which is to say a CRLF, lone CR or lone LF
/// that is not immediately followed by a space or tab.
/// Returns the offset of the offending line break.
fn find_orphan_line_break(data: &[u8]) -> Option<usize> {
    let mut skip_lf_at = None;

    for i in memchr::memchr2_iter(b'\r', b'\n', data) {
        if skip_lf_at == Some(i) {
            // Second half of a CRLF that was already checked
            continue;
        }

        let mut next = i + 1;
        if data[i] == b'\r' && data.get(next).copied() == Some(b'\n') {
            skip_lf_at.replace(next);
            next += 1;
        }

        match data.get(next) {
            Some(b' ') | Some(b'\t') => {}
            _ => return Some(i),
        }
    }
    None
}

/// Split a single logical (possibly folded) header line into its
/// name and still-encoded value.
///
/// A single trailing CRLF or LF terminator is permitted and is not
/// part of the value.  Any other line break must be a fold, that is,
/// be followed by whitespace.  The name is returned verbatim and is
/// not validated beyond the absence of whitespace; use
/// `validate_header_name` for that.
pub fn split_header_line(line: &str) -> Result<(&str, &str)> {
    let line = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line);

    let colon = memchr::memchr(b':', line.as_bytes()).ok_or_else(|| {
        tracing::debug!("rejecting header line {line:?}: no colon");
        HeaderFieldError::Malformed("missing colon separator".to_string())
    })?;

    let name = &line[..colon];
    if let Some(idx) = name.bytes().position(|c| c.is_ascii_whitespace()) {
        tracing::debug!("rejecting header line {line:?}: whitespace in name at {idx}");
        return Err(HeaderFieldError::Malformed(format!(
            "header name must not contain whitespace, found {:?} at offset {idx}",
            char::from(name.as_bytes()[idx])
        )));
    }

    let value = &line[colon + 1..];
    if let Some(idx) = find_orphan_line_break(value.as_bytes()) {
        tracing::debug!("rejecting header line {line:?}: unfolded line break");
        return Err(HeaderFieldError::Malformed(format!(
            "line break at offset {} is not followed by whitespace",
            colon + 1 + idx
        )));
    }

    let value = value.strip_prefix(' ').unwrap_or(value);

    Ok((name, value))
}
