mod codec;
mod error;
mod format;
mod header;
mod name;
mod splitter;
mod strings;

pub use codec::{decode_value, encode_value, DEFAULT_CHARSET};
pub use error::{HeaderArgument, HeaderFieldError};
pub type Result<T> = std::result::Result<T, HeaderFieldError>;

pub use format::ValueFormat;
pub use header::HeaderField;
pub use name::{is_valid_header_name, validate_header_name};
pub use splitter::split_header_line;
pub use strings::SharedString;
