use crate::codec::{decode_value, encode_value};
use crate::name::validate_header_name;
use crate::splitter::split_header_line;
use crate::{HeaderFieldError, Result, SharedString, ValueFormat};
use bstr::ByteSlice;
use std::str::FromStr;

/// A single header field.
///
/// The value is always held in its raw, decoded form, and may contain
/// line breaks that are part of the logical content.  It is encoded
/// only when the field is serialized, so the serialized form never
/// contains a CR or LF.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderField<'a> {
    /// The name portion of the header, stored verbatim
    name: SharedString<'a>,
    /// The decoded value portion of the header
    value: SharedString<'a>,
}

impl<'a> HeaderField<'a> {
    /// Construct a field from a trusted name and raw value.
    /// The name is validated; the value is accepted as-is.
    pub fn new<N: Into<SharedString<'a>>, V: Into<SharedString<'a>>>(
        name: N,
        value: V,
    ) -> Result<Self> {
        let name = name.into();
        validate_header_name(&name)?;
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    /// Construct a field from a name and a value that is in its
    /// encoded (wire) form, such as one obtained from another message
    pub fn from_encoded<N: Into<SharedString<'a>>>(name: N, encoded: &'a str) -> Result<Self> {
        let name = name.into();
        validate_header_name(&name)?;
        Ok(Self {
            name,
            value: decode_value(encoded)?,
        })
    }

    /// Parse a single logical header line, which may be folded and
    /// may carry one trailing line terminator
    pub fn parse(line: &'a str) -> Result<Self> {
        let (name, encoded) = split_header_line(line)?;
        Self::from_encoded(name, encoded)
    }

    /// Parse a header line supplied as bytes.  Header lines are
    /// required to be UTF-8 (and in practice ASCII).
    pub fn parse_bytes(line: &'a [u8]) -> Result<Self> {
        let line = line.to_str().map_err(|err| {
            HeaderFieldError::Malformed(format!("header line is not UTF-8: {err:#}"))
        })?;
        Self::parse(line)
    }

    pub fn to_owned(&self) -> HeaderField<'static> {
        HeaderField {
            name: self.name.to_owned(),
            value: self.value.to_owned(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Field names are compared case-insensitively
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn get_raw_value(&self) -> &str {
        &self.value
    }

    pub fn get_encoded_value(&self) -> SharedString<'_> {
        encode_value(&self.value)
    }

    pub fn get_value(&self, format: ValueFormat) -> SharedString<'_> {
        match format {
            ValueFormat::Raw => self.value.as_str().into(),
            ValueFormat::Encoded => self.get_encoded_value(),
        }
    }

    /// Replace the name.  If the new name is invalid the field is
    /// left unchanged.
    pub fn set_field_name<N: Into<SharedString<'a>>>(&mut self, name: N) -> Result<()> {
        let name = name.into();
        validate_header_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Replace the value with a new raw value
    pub fn set_field_value<V: Into<SharedString<'a>>>(&mut self, value: V) {
        self.value = value.into();
    }

    /// Replace the value with one given in encoded form.  If it cannot
    /// be decoded the field is left unchanged.
    pub fn set_encoded_field_value(&mut self, encoded: &'a str) -> Result<()> {
        self.value = decode_value(encoded)?;
        Ok(())
    }

    /// Format the header into the provided output stream,
    /// followed by a CRLF line terminator
    pub fn write_header<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(self.name.as_bytes())?;
        out.write_all(b": ")?;
        out.write_all(self.get_encoded_value().as_bytes())?;
        out.write_all(b"\r\n")
    }

    /// Returns `name: encoded-value`, without a line terminator
    pub fn to_header_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for HeaderField<'_> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{}: {}", self.name, self.get_encoded_value())
    }
}

impl FromStr for HeaderField<'static> {
    type Err = HeaderFieldError;

    fn from_str(s: &str) -> Result<Self> {
        HeaderField::parse(s).map(|header| header.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::HeaderArgument;

    fn assert_static_lifetime(_header: HeaderField<'static>) {
        assert!(true, "I wouldn't compile if this wasn't true");
    }

    #[test]
    fn header_construction() {
        let header = HeaderField::new("To", "someone@example.com").unwrap();
        k9::assert_equal!(header.get_name(), "To");
        k9::assert_equal!(header.get_raw_value(), "someone@example.com");
        k9::assert_equal!(header.to_header_string(), "To: someone@example.com");
        assert_static_lifetime(header);
    }

    #[test]
    fn split_raises_on_invalid_header() {
        let err = HeaderField::parse(
            "Content-Type : text/html; charset = \"iso-8859-1\"\nThis is a test",
        )
        .unwrap_err();
        assert!(matches!(err, HeaderFieldError::Malformed(_)), "{err:?}");
    }

    #[test]
    fn raises_on_invalid_field_name() {
        for name in ["Subject\r", "Subject\x7f"] {
            let mut header = HeaderField::new("Foo", "").unwrap();
            let err = header.set_field_name(name).unwrap_err();
            match &err {
                HeaderFieldError::InvalidArgument { argument, .. } => {
                    k9::assert_equal!(*argument, HeaderArgument::Name);
                }
                wat => panic!("unexpected {wat:?}"),
            }
            assert!(err.to_string().contains("name"));
            k9::assert_equal!(header.get_name(), "Foo");

            assert!(HeaderField::new(name, "value").is_err());
        }
    }

    #[test]
    fn crlf_sequences_are_encoded_on_to_string() {
        for value in [
            "\n\n\r\n\r\n\n",
            "Value\n\n\r\n\r\n\n",
            "\n\n\r\n\r\n\nValue",
            "\n\n\r\n\r\n\nValue\n\n\r\n\r\n\n",
            "Some\n\n\r\n\r\n\nValue",
            "\n\n\r\n\r\n\nSome\n\n\r\n\r\n\nValue",
            "Some\n\n\r\n\r\n\nValue\n\n\r\n\r\n\n",
            "\n\n\r\n\r\n\nSome\n\n\r\n\r\n\nValue\n\n\r\n\r\n\n",
        ] {
            let mut header = HeaderField::new("Foo", "").unwrap();
            header.set_field_value(value);

            let serialized = header.to_header_string();
            assert!(!serialized.contains('\n'), "{serialized:?}");
            assert!(!serialized.contains('\r'), "{serialized:?}");
            k9::assert_equal!(header.get_raw_value(), value);
        }
    }

    #[test]
    fn to_string_handles_continuations() {
        let encoded = "=?UTF-8?Q?foo=0D=0A=20bar?=";
        let raw = "foo\r\n bar";

        let mut header = HeaderField::new("Foo", "").unwrap();
        header.set_field_value(raw);

        k9::assert_equal!(header.get_raw_value(), raw);
        k9::assert_equal!(header.get_value(ValueFormat::default()).as_str(), raw);
        k9::assert_equal!(header.get_value(ValueFormat::Encoded).as_str(), encoded);
        k9::assert_equal!(header.to_header_string(), format!("Foo: {encoded}"));
        k9::assert_equal!(header.to_string(), format!("Foo: {encoded}"));

        let from_wire = HeaderField::from_encoded("Foo", encoded).unwrap();
        k9::assert_equal!(from_wire.get_raw_value(), raw);
        k9::assert_equal!(&from_wire, &header);
    }

    #[test]
    fn parse_line() {
        let header = HeaderField::parse("Subject: =?UTF-8?Q?hello=20Andr=C3=A9?=\r\n").unwrap();
        k9::assert_equal!(header.get_name(), "Subject");
        k9::assert_equal!(header.get_raw_value(), "hello André");
        assert!(header.is_named("subject"));
        assert!(!header.is_named("Subjects"));

        let header = HeaderField::parse("X-Folded: one\r\n two").unwrap();
        k9::assert_equal!(header.get_raw_value(), "one\r\n two");
        k9::assert_equal!(
            header.to_header_string(),
            "X-Folded: =?UTF-8?Q?one=0D=0A=20two?="
        );

        let header = HeaderField::parse_bytes(b"Subject: plain").unwrap();
        k9::assert_equal!(header.get_raw_value(), "plain");
        assert!(header.get_encoded_value().is_borrowed());
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            HeaderField::parse("Subject hello"),
            Err(HeaderFieldError::Malformed(_))
        ));
        assert!(matches!(
            HeaderField::parse("Subject: hello\r\nBcc: victim@example.com"),
            Err(HeaderFieldError::Malformed(_))
        ));
        assert!(matches!(
            HeaderField::parse_bytes(b"Subject: \xff"),
            Err(HeaderFieldError::Malformed(_))
        ));
        k9::assert_equal!(
            HeaderField::parse(": value").unwrap_err(),
            HeaderFieldError::InvalidArgument {
                argument: HeaderArgument::Name,
                reason: "must not be empty".to_string(),
            }
        );
        assert!(matches!(
            HeaderField::parse("Subject: =?UTF-8?Q?Andr=E?="),
            Err(HeaderFieldError::InvalidArgument {
                argument: HeaderArgument::Value,
                ..
            })
        ));
    }

    #[test]
    fn set_encoded_value() {
        let mut header = HeaderField::new("Subject", "before").unwrap();
        header
            .set_encoded_field_value("=?US-ASCII?Q?Keith_Moore?=")
            .unwrap();
        k9::assert_equal!(header.get_raw_value(), "Keith Moore");

        assert!(header.set_encoded_field_value("=?KOI8-R?Q?x?=").is_err());
        k9::assert_equal!(header.get_raw_value(), "Keith Moore");
    }

    #[test]
    fn from_str_is_owned() {
        let header: HeaderField<'static> = {
            let line = String::from("Subject: hello");
            line.parse().unwrap()
        };
        k9::assert_equal!(header.get_name(), "Subject");
        assert_static_lifetime(header);
    }

    #[test]
    fn write_header() {
        let header = HeaderField::new("Subject", "tab\there").unwrap();
        let mut out = vec![];
        header.write_header(&mut out).unwrap();
        k9::assert_equal!(
            String::from_utf8(out).unwrap(),
            "Subject: =?UTF-8?Q?tab=09here?=\r\n"
        );
    }
}
