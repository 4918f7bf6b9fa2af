use std::sync::Arc;

/// Helper for holding either an owned or borrowed string.
/// Values that pass through the codec unchanged remain borrowed
/// from the caller's buffer; transformed values are owned.
pub enum SharedString<'a> {
    Owned(Arc<String>),
    Borrowed(&'a str),
}

impl<'a> std::cmp::PartialEq<Self> for SharedString<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str().eq(other.as_str())
    }
}

impl<'a> std::cmp::PartialEq<&str> for SharedString<'a> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str().eq(*other)
    }
}

impl<'a> std::fmt::Display for SharedString<'a> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl<'a> std::fmt::Debug for SharedString<'a> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let str = self.as_str();
        write!(fmt, "{str:?}")
    }
}

impl<'a> std::ops::Deref for SharedString<'a> {
    type Target = str;
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<'a> Clone for SharedString<'a> {
    fn clone(&self) -> Self {
        match self {
            Self::Owned(s) => Self::Owned(Arc::clone(s)),
            Self::Borrowed(s) => Self::Borrowed(s),
        }
    }
}

impl<'a> SharedString<'a> {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Owned(s) => s.as_str(),
            Self::Borrowed(s) => s,
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Detach from any borrowed buffer
    pub fn to_owned(&self) -> SharedString<'static> {
        match self {
            Self::Owned(s) => SharedString::Owned(Arc::clone(s)),
            Self::Borrowed(s) => SharedString::Owned(Arc::new(s.to_string())),
        }
    }
}

impl<'a> From<String> for SharedString<'a> {
    fn from(s: String) -> Self {
        Self::Owned(Arc::new(s))
    }
}

impl<'a> From<&'a str> for SharedString<'a> {
    fn from(s: &'a str) -> Self {
        Self::Borrowed(s)
    }
}
