//! Error types for the IRC line codec.
//!
//! Parsing is total: [`Event::parse`](crate::Event::parse) returns `None` for
//! lines it cannot make sense of. The errors here exist for the two places a
//! caller can violate a protocol constraint (tag names and tag length), and for
//! the `FromStr` impl which reports why a line was rejected.

use thiserror::Error;

/// Errors returned when mutating a [`Tags`](crate::Tags) map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TagError {
    /// Tag name is empty or contains characters outside `[A-Za-z0-9/_.-]`.
    #[error("tag {0:?} is invalid")]
    InvalidTagName(String),

    /// Adding the tag would push the encoded tag segment past its ceiling.
    #[error("unable to set tag {key:?}: tags too long for message ({actual} > {limit})")]
    TooLong {
        /// The rejected tag name.
        key: String,
        /// Encoded length the segment would have had.
        actual: usize,
        /// Maximum allowed encoded length.
        limit: usize,
    },
}

/// Reasons a raw line was rejected by the event parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Line was shorter than two octets once CR/LF were trimmed.
    #[error("line too short")]
    TooShort,

    /// `@` was present but no tag data or no terminating space followed.
    #[error("empty or unterminated tag segment")]
    EmptyTags,

    /// `:` was present but no source or no terminating space followed.
    #[error("empty or unterminated source")]
    EmptySource,
}
