use crate::{HeaderFieldError, Result};
use bstr::BStr;

/// Returns true if `c` may appear in a header field name:
/// printable US-ASCII, excluding colon
fn is_ftext(c: u8) -> bool {
    (0x21..=0x7e).contains(&c) && c != b':'
}

pub fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_ftext)
}

/// Validate a header field name against the RFC 5322 `field-name`
/// grammar.  The error is always an `InvalidArgument` for the
/// name, so that callers can tell it apart from a value error.
pub fn validate_header_name(name: &str) -> Result<()> {
    if name.is_empty() {
        tracing::debug!("rejecting empty header name");
        return Err(HeaderFieldError::invalid_name("must not be empty"));
    }

    if let Some(idx) = name.bytes().position(|c| !is_ftext(c)) {
        let c = name.as_bytes()[idx];
        tracing::debug!(
            "rejecting header name {:?}: byte {c:#04x} at {idx}",
            BStr::new(name)
        );
        return Err(HeaderFieldError::invalid_name(format!(
            "must be comprised of printable US-ASCII characters except colon. \
            Found {c:#04x} at offset {idx} of {:?}",
            BStr::new(name)
        )));
    }

    Ok(())
}
