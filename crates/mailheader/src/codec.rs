//! Conversion between the raw (decoded) form of a header value and
//! its encoded form, which is safe to place on the wire.
//!
//! The encoded form never contains a CR or LF byte.  Values made
//! up solely of printable US-ASCII are left untouched; anything else
//! is represented as a single RFC 2047 `Q` encoded-word.
use crate::{HeaderFieldError, Result, SharedString};
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::char;
use nom::combinator::opt;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

/// The charset declared in every encoded-word that we produce
pub const DEFAULT_CHARSET: &str = "UTF-8";

static HEX_CHARS: &[u8] = &[
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F',
];

/// Control characters and everything that is not US-ASCII
fn needs_escape(c: u8) -> bool {
    c < 0x20 || c >= 0x7f
}

/// Bytes that are printable but have meaning inside Q encoded text
fn is_q_special(c: u8) -> bool {
    matches!(c, b' ' | b'=' | b'?' | b'_')
}

// ctl = { '\u{00}'..'\u{1f}' | "\u{7f}" }
fn is_ctl(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}')
}

fn is_especial(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '/' | '[' | ']' | '?' | '.' | '='
    )
}

fn is_token(c: char) -> bool {
    c.is_ascii() && c != ' ' && !is_especial(c) && !is_ctl(c)
}

// charset = @{ (!"*" ~ token)+ }
fn charset(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '*' && is_token(c)).parse(input)
}

// language = @{ token+ }
fn language(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '*' && is_token(c)).parse(input)
}

// encoding = @{ token+ }
fn encoding(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '*' && is_token(c)).parse(input)
}

// encoded_text = @{ (!( " " | "?") ~ vchar)+ }
fn encoded_text(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| ('!'..='~').contains(&c) && c != '?').parse(input)
}

#[derive(Debug, PartialEq)]
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: &'a str,
    text: &'a str,
}

// encoded_word = { "=?" ~ charset ~ ("*" ~ language)? ~ "?" ~ encoding ~ "?" ~ encoded_text ~ "?=" }
fn encoded_word(input: &str) -> IResult<&str, EncodedWord<'_>> {
    let (loc, (charset, _language, _, encoding, _, text)) = delimited(
        tag("=?"),
        (
            charset,
            opt(preceded(char('*'), language)),
            char('?'),
            encoding,
            char('?'),
            encoded_text,
        ),
        tag("?="),
    )
    .parse(input)?;

    Ok((
        loc,
        EncodedWord {
            charset,
            encoding,
            text,
        },
    ))
}

impl EncodedWord<'_> {
    fn decode(&self) -> Result<String> {
        let bytes = match self.encoding {
            "B" | "b" => data_encoding::BASE64_MIME
                .decode(self.text.as_bytes())
                .map_err(|err| {
                    HeaderFieldError::invalid_value(format!(
                        "encoded_word: base64 decode failed: {err:#}"
                    ))
                })?,
            "Q" | "q" => decode_q(self.text)?,
            encoding => {
                return Err(HeaderFieldError::invalid_value(format!(
                    "encoded_word: invalid encoding '{encoding}', expected one of b, B, q or Q"
                )));
            }
        };

        if self.charset.eq_ignore_ascii_case("utf-8") {
            String::from_utf8(bytes).map_err(|err| {
                HeaderFieldError::invalid_value(format!(
                    "encoded_word: decoded text is not valid UTF-8: {err:#}"
                ))
            })
        } else if self.charset.eq_ignore_ascii_case("us-ascii") {
            if let Some(c) = bytes.iter().find(|c| !c.is_ascii()) {
                return Err(HeaderFieldError::invalid_value(format!(
                    "encoded_word: byte {c:#04x} is not valid US-ASCII"
                )));
            }
            Ok(bytes.into_iter().map(char::from).collect())
        } else {
            Err(HeaderFieldError::invalid_value(format!(
                "encoded_word: unsupported charset '{}'",
                self.charset
            )))
        }
    }
}

/// Reverse the `Q` encoding: `_` is a space and `=XX` is the byte
/// with that hex value.  Unlike general quoted-printable there are
/// no soft line breaks, and every `=` must introduce two hex digits.
fn decode_q(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'_' => {
                result.push(b' ');
                idx += 1;
            }
            b'=' => {
                let decoded = bytes
                    .get(idx + 1..idx + 3)
                    .and_then(|hex| data_encoding::HEXUPPER_PERMISSIVE.decode(hex).ok())
                    .ok_or_else(|| {
                        HeaderFieldError::invalid_value(format!(
                            "encoded_word: invalid escape sequence at offset {idx} of '{text}'"
                        ))
                    })?;
                result.extend_from_slice(&decoded);
                idx += 3;
            }
            c => {
                result.push(c);
                idx += 1;
            }
        }
    }

    Ok(result)
}

/// Returns true if `text` contains something that `decode_value`
/// would interpret as an encoded-word
fn contains_encoded_word(text: &str) -> bool {
    memchr::memmem::find_iter(text.as_bytes(), b"=?")
        .any(|idx| encoded_word(&text[idx..]).is_ok())
}

fn is_linear_whitespace(text: &str) -> bool {
    text.bytes().all(|c| matches!(c, b' ' | b'\t' | b'\r' | b'\n'))
}

/// Encode a raw header value for inclusion in a header line.
///
/// Printable US-ASCII is returned as-is.  Otherwise the whole value
/// becomes one `=?UTF-8?Q?...?=` word, in which every control byte,
/// every non-ASCII byte, and the bytes that are significant to the
/// Q encoding are written as `=XX`.
pub fn encode_value(raw: &str) -> SharedString<'_> {
    if !raw.bytes().any(needs_escape) && !contains_encoded_word(raw) {
        return raw.into();
    }

    let prefix = b"=?";
    let suffix = b"?=";

    let mut result = Vec::with_capacity(raw.len() * 3 + DEFAULT_CHARSET.len() + 7);
    result.extend_from_slice(prefix);
    result.extend_from_slice(DEFAULT_CHARSET.as_bytes());
    result.extend_from_slice(b"?Q?");

    for c in raw.bytes() {
        if needs_escape(c) || is_q_special(c) {
            result.push(b'=');
            result.push(HEX_CHARS[(c as usize) >> 4]);
            result.push(HEX_CHARS[(c as usize) & 0x0f]);
        } else {
            result.push(c);
        }
    }

    result.extend_from_slice(suffix);
    tracing::trace!("encoded header value {raw:?} as {} bytes", result.len());

    // Safety: we ensured that everything we output is in the ASCII
    // range, therefore the string is valid UTF-8
    unsafe { String::from_utf8_unchecked(result) }.into()
}

/// Decode an encoded header value into its raw form.
///
/// Text that contains no encoded-words is returned unchanged.
/// Encoded-words may be mixed with plain text; whitespace that
/// separates two adjacent encoded-words is not part of the value.
/// An encoded-word that is well formed but cannot be decoded is
/// an error rather than being passed through.
pub fn decode_value(encoded: &str) -> Result<SharedString<'_>> {
    if memchr::memmem::find(encoded.as_bytes(), b"=?").is_none() {
        return Ok(encoded.into());
    }

    let mut result = String::with_capacity(encoded.len());
    let mut remaining = encoded;
    let mut last_was_word = false;

    while let Some(idx) = memchr::memmem::find(remaining.as_bytes(), b"=?") {
        let (text, candidate) = remaining.split_at(idx);
        match encoded_word(candidate) {
            Ok((rest, word)) => {
                let decoded = word.decode().inspect_err(|err| {
                    tracing::debug!("failed to decode {candidate:?}: {err:#}");
                })?;
                if !(last_was_word && is_linear_whitespace(text)) {
                    result.push_str(text);
                }
                result.push_str(&decoded);
                remaining = rest;
                last_was_word = true;
            }
            Err(_) => {
                result.push_str(text);
                result.push_str("=?");
                remaining = &candidate[2..];
                last_was_word = false;
            }
        }
    }
    result.push_str(remaining);

    Ok(result.into())
}
