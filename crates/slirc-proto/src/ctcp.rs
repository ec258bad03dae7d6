//! CTCP (Client-to-Client Protocol) framing.
//!
//! CTCP rides inside PRIVMSG (queries) and NOTICE (replies) bodies, wrapped
//! in `\x01` delimiters: `\x01VERSION\x01`, `\x01ACTION waves\x01`.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>
//!
//! # Example
//!
//! ```
//! use slirc_proto::{Ctcp, Event};
//!
//! let e = Event::parse(":nick!u@h PRIVMSG me :\x01PING 1234\x01").unwrap();
//! let ctcp = Ctcp::decode(&e).unwrap();
//! assert_eq!(ctcp.command, "PING");
//! assert_eq!(ctcp.text, "1234");
//! assert!(!ctcp.reply);
//!
//! assert_eq!(Ctcp::encode("ACTION", "dances").as_deref(), Some("\x01ACTION dances\x01"));
//! ```

use crate::command::{NOTICE, PRIVMSG};
use crate::event::Event;
use crate::source::Source;

/// The CTCP delimiter character (`\x01`).
pub(crate) const CTCP_DELIM: char = '\x01';

/// Command name of `/me` actions.
pub const CTCP_ACTION: &str = "ACTION";

/// A CTCP query or reply extracted from an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp {
    /// Sender of the enclosing message.
    pub source: Source,
    /// Target of the enclosing message (our nick or a channel).
    pub target: String,
    /// Upper-case CTCP command, e.g. `VERSION`.
    pub command: String,
    /// Everything after the command and its space; may be empty.
    pub text: String,
    /// True when carried by NOTICE, i.e. an answer to an earlier query.
    pub reply: bool,
}

/// CTCP command names are upper-case letters and digits only.
fn is_ctcp_command(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

impl Ctcp {
    /// Decode the CTCP payload of `event`, if it has one.
    ///
    /// Requires a source, exactly one target, a PRIVMSG or NOTICE command,
    /// and a body framed by delimiters on both ends.
    pub fn decode(event: &Event) -> Option<Self> {
        let source = event.source.as_ref()?;

        if event.params.len() != 1 || event.trailing.len() < 3 {
            return None;
        }
        if event.command != PRIVMSG && event.command != NOTICE {
            return None;
        }

        let inner = event
            .trailing
            .strip_prefix(CTCP_DELIM)?
            .strip_suffix(CTCP_DELIM)?;

        let (command, text) = match inner.split_once(' ') {
            Some((command, text)) => (command, text),
            None => (inner, ""),
        };
        if !is_ctcp_command(command) {
            return None;
        }

        Some(Self {
            source: source.clone(),
            target: event.params[0].clone(),
            command: command.to_owned(),
            text: text.to_owned(),
            reply: event.command == NOTICE,
        })
    }

    /// Frame `command` and optional `text` for sending. `None` for an empty command.
    pub fn encode(command: &str, text: &str) -> Option<String> {
        if command.is_empty() {
            return None;
        }
        let mut out = String::with_capacity(command.len() + text.len() + 3);
        out.push(CTCP_DELIM);
        out.push_str(command);
        if !text.is_empty() {
            out.push(' ');
            out.push_str(text);
        }
        out.push(CTCP_DELIM);
        Some(out)
    }

    /// Whether this is a `/me` action.
    pub fn is_action(&self) -> bool {
        self.command == CTCP_ACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Option<Ctcp> {
        Ctcp::decode(&Event::parse(raw).unwrap())
    }

    #[test]
    fn query_without_text() {
        let c = decode(":n!u@h PRIVMSG me :\x01VERSION\x01").unwrap();
        assert_eq!(c.command, "VERSION");
        assert_eq!(c.text, "");
        assert_eq!(c.target, "me");
        assert!(!c.reply);
    }

    #[test]
    fn reply_via_notice() {
        let c = decode(":n!u@h NOTICE me :\x01VERSION client 1.0\x01").unwrap();
        assert!(c.reply);
        assert_eq!(c.text, "client 1.0");
    }

    #[test]
    fn action_is_recognized() {
        let c = decode(":n!u@h PRIVMSG #c :\x01ACTION waves hello\x01").unwrap();
        assert!(c.is_action());
        assert_eq!(c.text, "waves hello");
    }

    #[test]
    fn rejects_unframed_or_lowercase() {
        assert!(decode(":n!u@h PRIVMSG me :hello").is_none());
        assert!(decode(":n!u@h PRIVMSG me :\x01VERSION").is_none());
        assert!(decode(":n!u@h PRIVMSG me :\x01version\x01").is_none());
        assert!(decode(":n!u@h PRIVMSG me :\x01\x01").is_none());
    }

    #[test]
    fn rejects_without_source_or_with_many_targets() {
        assert!(decode("PRIVMSG me :\x01VERSION\x01").is_none());
        assert!(decode(":n PRIVMSG a b :\x01VERSION\x01").is_none());
        assert!(decode(":n JOIN #c :\x01VERSION\x01").is_none());
    }

    #[test]
    fn encode_frames() {
        assert_eq!(Ctcp::encode("VERSION", "").as_deref(), Some("\x01VERSION\x01"));
        assert_eq!(Ctcp::encode("", "x"), None);
    }
}
