//! Message source (prefix) parsing.
//!
//! The source names who sent a message: a server (`irc.example.com`) or a
//! user hostmask (`nick!ident@host`). Parsing never fails; anything that does
//! not split cleanly ends up entirely in [`Source::name`].
//!
//! # Reference
//! - RFC 1459 Section 2.3.1: `<servername> | <nick> [ '!' <user> ] [ '@' <host> ]`

use std::fmt;
use std::str::FromStr;

const PREFIX_IDENT: char = '!';
const PREFIX_HOST: char = '@';

/// The sender of an event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Source {
    /// Nickname, server name, or service name. Always set.
    pub name: String,
    /// The "user" part of a hostmask.
    pub ident: String,
    /// Hostname or address. Servers can spoof this freely.
    pub host: String,
}

impl Source {
    /// Build a full `nick!ident@host` source.
    pub fn new(name: impl Into<String>, ident: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ident: ident.into(),
            host: host.into(),
        }
    }

    /// Build a bare server (or name-only) source.
    pub fn server(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Split a raw prefix into its parts.
    ///
    /// The first `!` and first `@` decide the split:
    ///
    /// ```
    /// use slirc_proto::Source;
    ///
    /// let s = Source::parse("nick!user@host");
    /// assert_eq!((s.name.as_str(), s.ident.as_str(), s.host.as_str()), ("nick", "user", "host"));
    ///
    /// let s = Source::parse("nick@host");
    /// assert_eq!((s.name.as_str(), s.ident.as_str(), s.host.as_str()), ("nick", "", "host"));
    ///
    /// let s = Source::parse("irc.example.com");
    /// assert!(s.is_server());
    /// ```
    pub fn parse(raw: &str) -> Self {
        let user = raw.find(PREFIX_IDENT).filter(|&i| i > 0);
        let host = raw.find(PREFIX_HOST).filter(|&i| i > 0);

        match (user, host) {
            (Some(u), Some(h)) if h > u => Self::new(&raw[..u], &raw[u + 1..h], &raw[h + 1..]),
            (Some(u), _) => Self::new(&raw[..u], &raw[u + 1..], ""),
            (None, Some(h)) => Self::new(&raw[..h], "", &raw[h + 1..]),
            (None, None) => Self::server(raw),
        }
    }

    /// Length of the serialized form, without the leading `:`.
    pub fn len(&self) -> usize {
        let mut len = self.name.len();
        if !self.ident.is_empty() {
            len += 1 + self.ident.len();
        }
        if !self.host.is_empty() {
            len += 1 + self.host.len();
        }
        len
    }

    /// Whether every part is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when both ident and host are known, i.e. a full user hostmask.
    pub fn is_hostmask(&self) -> bool {
        !self.ident.is_empty() && !self.host.is_empty()
    }

    /// True when neither ident nor host is present.
    pub fn is_server(&self) -> bool {
        self.ident.is_empty() && self.host.is_empty()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.ident.is_empty() {
            write!(f, "{PREFIX_IDENT}{}", self.ident)?;
        }
        if !self.host.is_empty() {
            write!(f, "{PREFIX_HOST}{}", self.host)?;
        }
        Ok(())
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(s: &Source) -> (&str, &str, &str) {
        (&s.name, &s.ident, &s.host)
    }

    #[test]
    fn full_hostmask() {
        let s = Source::parse("nick!user@host.example");
        assert_eq!(parts(&s), ("nick", "user", "host.example"));
        assert!(s.is_hostmask());
        assert!(!s.is_server());
    }

    #[test]
    fn nick_and_host() {
        let s = Source::parse("nick@host");
        assert_eq!(parts(&s), ("nick", "", "host"));
        assert!(!s.is_hostmask());
        assert!(!s.is_server());
    }

    #[test]
    fn nick_and_ident() {
        let s = Source::parse("nick!user");
        assert_eq!(parts(&s), ("nick", "user", ""));
        assert!(!s.is_hostmask());
        assert!(!s.is_server());
    }

    #[test]
    fn server_name() {
        let s = Source::parse("irc.example.com");
        assert_eq!(parts(&s), ("irc.example.com", "", ""));
        assert!(s.is_server());
        assert!(!s.is_hostmask());
    }

    #[test]
    fn at_before_bang_splits_on_bang() {
        // First '!' wins even when an '@' precedes it.
        let s = Source::parse("nick@odd!user");
        assert_eq!(parts(&s), ("nick@odd", "user", ""));
    }

    #[test]
    fn leading_separators_stay_in_name() {
        assert_eq!(parts(&Source::parse("!user")), ("!user", "", ""));
        assert_eq!(parts(&Source::parse("@host")), ("@host", "", ""));
    }

    #[test]
    fn display_omits_empty_parts() {
        assert_eq!(Source::new("n", "u", "h").to_string(), "n!u@h");
        assert_eq!(Source::new("n", "", "h").to_string(), "n@h");
        assert_eq!(Source::new("n", "u", "").to_string(), "n!u");
        assert_eq!(Source::server("srv").to_string(), "srv");
    }

    #[test]
    fn len_matches_display() {
        for raw in ["n!u@h", "n@h", "n!u", "srv", ""] {
            let s = Source::parse(raw);
            assert_eq!(s.len(), s.to_string().len(), "{raw}");
        }
    }
}
