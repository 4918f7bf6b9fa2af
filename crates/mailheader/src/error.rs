use thiserror::Error;

/// Identifies which half of a header field an `InvalidArgument`
/// error refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderArgument {
    Name,
    Value,
}

impl std::fmt::Display for HeaderArgument {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Name => fmt.write_str("name"),
            Self::Value => fmt.write_str("value"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeaderFieldError {
    #[error("malformed header line: {0}")]
    Malformed(String),
    #[error("invalid header {argument}: {reason}")]
    InvalidArgument {
        argument: HeaderArgument,
        reason: String,
    },
}

impl HeaderFieldError {
    pub(crate) fn invalid_name<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArgument {
            argument: HeaderArgument::Name,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_value<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArgument {
            argument: HeaderArgument::Value,
            reason: reason.into(),
        }
    }
}
