//! Error types for EDI tokenizing, reading and envelope generation.
//!
//! ## Error Categories
//!
//! - **Invalid Argument**: a required part is missing or unusable (empty separator,
//!   container built without a trailer strategy)
//! - **Segment Too Short**: tag classification on text with fewer than three characters
//! - **I/O Errors**: stream read failures and invalid UTF-8 input
//! - **Custom**: failures raised by [`SegmentTree`](crate::SegmentTree) implementations
//!
//! ## Examples
//!
//! ```rust
//! use edi_text::{classify_segment_tag, Error};
//!
//! let result = classify_segment_tag("UN");
//! assert!(matches!(result, Err(Error::SegmentTooShort { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required argument is missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Segment text cannot be classified because it is shorter than a tag
    #[error("Segment too short to classify: {segment:?} has {len} characters, expected at least 3")]
    SegmentTooShort { segment: String, len: usize },

    /// IO error during reading
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid argument error naming the offending parameter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edi_text::Error;
    ///
    /// let err = Error::invalid_argument("separator must not be empty");
    /// assert!(err.to_string().contains("separator"));
    /// ```
    pub fn invalid_argument(msg: &str) -> Self {
        Error::InvalidArgument(msg.to_string())
    }

    /// Creates a segment-too-short error for `segment`.
    pub fn segment_too_short(segment: &str) -> Self {
        Error::SegmentTooShort {
            segment: segment.to_string(),
            len: segment.chars().count(),
        }
    }

    /// Creates an I/O error for stream failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edi_text::Error;
    ///
    /// let err = Error::custom("schema lookup failed");
    /// assert!(err.to_string().contains("schema lookup failed"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
