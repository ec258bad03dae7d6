//! # slirc-proto
//!
//! The line codec underneath the slirc client engine: parsing and
//! serializing IRC lines, IRCv3 message tags and message sources.
//!
//! ## Features
//!
//! - Permissive, non-failing line parsing into [`Event`]
//! - Tag values escaped/unescaped at the API boundary ([`Tags`])
//! - Line length ceilings enforced on output, CR/LF stripped
//! - CTCP framing and a one-line human-readable renderer
//! - RFC 1459 case mapping and nick/channel validation
//!
//! Everything here is synchronous and free of I/O.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{Event, Tags};
//!
//! let e = Event::parse("@time=12:00 :nick!user@host PRIVMSG #rust :hello\r\n").unwrap();
//! assert_eq!(e.command, "PRIVMSG");
//! assert_eq!(e.source_name(), Some("nick"));
//! assert_eq!(e.trailing, "hello");
//!
//! let mut tags = Tags::new();
//! tags.set("label", "a b").unwrap();
//! let reply = Event::new("PRIVMSG")
//!     .with_params(["#rust"])
//!     .with_trailing("hi")
//!     .with_tags(tags);
//! assert_eq!(reply.to_string(), "@label=a\\sb PRIVMSG #rust :hi");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod command;
pub mod ctcp;
pub mod error;
pub mod event;
pub mod humanize;
pub mod source;
pub mod tags;
pub mod validate;

pub use self::casemap::{rfc1459_eq, to_rfc1459};
pub use self::ctcp::Ctcp;
pub use self::error::{ParseError, TagError};
pub use self::event::{Event, MAX_LENGTH};
pub use self::source::Source;
pub use self::tags::{Tags, MAX_TAG_LENGTH};
pub use self::validate::{is_valid_channel, is_valid_nick};
