use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selects which representation of a header value to return.
/// `Raw` is the decoded logical value; `Encoded` is the form that
/// is safe to place directly on the wire.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    #[default]
    Raw,
    Encoded,
}

impl FromStr for ValueFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        if s.eq_ignore_ascii_case("raw") {
            Ok(Self::Raw)
        } else if s.eq_ignore_ascii_case("encoded") {
            Ok(Self::Encoded)
        } else {
            Err(format!(
                "invalid ValueFormat '{s}', possible values are 'encoded', 'raw'"
            ))
        }
    }
}
