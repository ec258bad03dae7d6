//! IRC events: one protocol line, parsed.
//!
//! ```text
//! message  := [ '@' tags SPACE ] [ ':' prefix SPACE ] command [ params ] [ SPACE ':' trailing ]
//! ```
//!
//! [`Event::parse`] is total and permissive: it accepts anything that has a
//! command and leaves judging the rest to whoever handles the event.
//! [`Event::to_bytes`] is its inverse, capped to the protocol line limits and
//! stripped of CR/LF so no field can smuggle in a second line.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::{take_till, take_until},
    character::complete::char,
    combinator::{opt, verify},
    sequence::{delimited, terminated},
    IResult,
};

use crate::command::{NOTICE, PRIVMSG};
use crate::ctcp::{CTCP_ACTION, CTCP_DELIM};
use crate::error::ParseError;
use crate::source::Source;
use crate::tags::{Tags, MAX_TAG_LENGTH};
use crate::validate::{is_valid_channel, is_valid_nick};

/// Longest line body, excluding CRLF and the tag segment.
pub const MAX_LENGTH: usize = 510;

const SPACE: char = ' ';
const MESSAGE_PREFIX: char = ':';

/// `@<tags> ` - the tag data must be non-empty and space-terminated.
fn tag_segment(input: &str) -> IResult<&str, &str> {
    delimited(
        char('@'),
        verify(take_until(" "), |s: &str| !s.is_empty()),
        char(' '),
    )(input)
}

/// `:<source> ` - same shape as the tag segment.
fn source_segment(input: &str) -> IResult<&str, &str> {
    delimited(
        char(':'),
        verify(take_until(" "), |s: &str| !s.is_empty()),
        char(' '),
    )(input)
}

/// Command token up to the next space, consuming that space if present.
fn command_token(input: &str) -> IResult<&str, &str> {
    terminated(take_till(|c| c == SPACE), opt(char(SPACE)))(input)
}

/// Index of the `:` that starts the trailing parameter, if any.
///
/// A colon only counts at the very start of the parameter text or right after
/// a space; `a:b` inside a middle parameter is just data.
fn trailing_marker(params: &str) -> Option<usize> {
    params
        .match_indices(MESSAGE_PREFIX)
        .map(|(i, _)| i)
        .find(|&i| i == 0 || params.as_bytes()[i - 1] == b' ')
}

fn split_params(raw: &str) -> Vec<String> {
    raw.split(SPACE).map(str::to_owned).collect()
}

/// A single IRC protocol message.
///
/// `Clone` is a deep copy: source, tags and params are all owned, so a clone
/// can be handed to an untrusted handler without the original changing
/// underneath anyone else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Event {
    /// Who sent the event. `None` for events we originate.
    pub source: Option<Source>,
    /// IRCv3 message tags, if the line carried any.
    pub tags: Option<Tags>,
    /// Upper-case command or three digit numeric.
    pub command: String,
    /// Middle parameters, in order.
    pub params: Vec<String>,
    /// The final, space-permitting parameter.
    pub trailing: String,
    /// Emit the `:` marker even when `trailing` is empty.
    pub empty_trailing: bool,
    /// Carries credentials or similar; never rendered by [`Event::humanize`].
    pub sensitive: bool,
}

impl Event {
    /// An event with only a command set.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Set the middle parameters.
    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the trailing parameter.
    #[must_use]
    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = trailing.into();
        self
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Mark the event as sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Parse one line. Returns `None` if it cannot be an IRC message.
    ///
    /// Surrounding CR/LF are trimmed first. See [`Event::try_parse`] for why a
    /// line was rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::try_parse(raw).ok()
    }

    /// Parse one line, reporting why it was rejected.
    pub fn try_parse(raw: &str) -> Result<Self, ParseError> {
        let mut line = raw.trim_matches(|c| c == '\r' || c == '\n');
        if line.len() < 2 {
            return Err(ParseError::TooShort);
        }

        let mut event = Event::default();

        if line.starts_with('@') {
            let (rest, tags) = tag_segment(line).map_err(|_| ParseError::EmptyTags)?;
            event.tags = Some(Tags::parse(tags));
            line = rest;
        }

        if line.starts_with(MESSAGE_PREFIX) {
            let (rest, source) = source_segment(line).map_err(|_| ParseError::EmptySource)?;
            event.source = Some(Source::parse(source));
            line = rest;
        }

        let had_params = line.contains(SPACE);
        let (rest, command) = command_token(line).map_err(|_| ParseError::TooShort)?;
        if command.is_empty() {
            return Err(ParseError::TooShort);
        }
        event.command = command.to_ascii_uppercase();

        if !had_params {
            return Ok(event);
        }

        match trailing_marker(rest) {
            None => event.params = split_params(rest),
            Some(i) => {
                if i > 0 {
                    event.params = split_params(&rest[..i - 1]);
                }
                event.trailing = rest[i + 1..].to_owned();
                event.empty_trailing = event.trailing.is_empty();
            }
        }

        Ok(event)
    }

    /// Serialized length before truncation and CR/LF stripping.
    ///
    /// Lets callers check a budget without building the line.
    pub fn len(&self) -> usize {
        let mut len = self.tags.as_ref().map_or(0, Tags::segment_len);

        if let Some(source) = &self.source {
            // ':' and the trailing space
            len += source.len() + 2;
        }

        len += self.command.len();

        if !self.params.is_empty() {
            // one space before each param
            len += self.params.len() + self.params.iter().map(String::len).sum::<usize>();
        }

        if self.has_trailing() {
            len += self.trailing.len() + 2;
        }

        len
    }

    /// Whether the event would serialize to nothing at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn has_trailing(&self) -> bool {
        !self.trailing.is_empty() || self.empty_trailing
    }

    fn has_tag_segment(&self) -> bool {
        self.tags.as_ref().is_some_and(|t| t.segment_len() > 0)
    }

    /// Render the wire form, without CRLF.
    ///
    /// Lines longer than [`MAX_LENGTH`] are cut; events carrying tags get an
    /// extra [`MAX_TAG_LENGTH`] + 1 octets of allowance. Any CR or LF in the
    /// result is removed afterwards.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.len());

        if let Some(tags) = &self.tags {
            tags.write_segment(&mut out);
        }

        if let Some(source) = &self.source {
            out.push(MESSAGE_PREFIX);
            out.push_str(&source.to_string());
            out.push(SPACE);
        }

        out.push_str(&self.command);

        if !self.params.is_empty() {
            out.push(SPACE);
            out.push_str(&self.params.join(" "));
        }

        if self.has_trailing() {
            out.push(SPACE);
            out.push(MESSAGE_PREFIX);
            out.push_str(&self.trailing);
        }

        let limit = if self.has_tag_segment() {
            MAX_LENGTH + MAX_TAG_LENGTH + 1
        } else {
            MAX_LENGTH
        };
        if out.len() > limit {
            let mut cut = limit;
            while !out.is_char_boundary(cut) {
                cut -= 1;
            }
            out.truncate(cut);
        }

        out.retain(|c| c != '\r' && c != '\n');
        out
    }

    /// [`render`](Self::render) as bytes, ready for the transport to append CRLF.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }

    /// Nick (or server name) of the sender.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name.as_str())
    }

    /// Last middle parameter.
    pub fn last_param(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// PRIVMSG carrying a CTCP ACTION (`/me`).
    pub fn is_action(&self) -> bool {
        self.command == PRIVMSG
            && self.trailing.starts_with("\x01ACTION")
            && self.trailing.ends_with(CTCP_DELIM)
    }

    /// Text of an ACTION without its framing; the plain trailing otherwise.
    pub fn strip_action(&self) -> &str {
        if self.command != PRIVMSG {
            return &self.trailing;
        }
        let body = self
            .trailing
            .strip_prefix(CTCP_DELIM)
            .and_then(|s| s.strip_prefix(CTCP_ACTION))
            .and_then(|s| s.strip_suffix(CTCP_DELIM));
        match body {
            Some(text) => text.strip_prefix(' ').unwrap_or(text),
            None => &self.trailing,
        }
    }

    /// PRIVMSG addressed to a channel.
    pub fn is_from_channel(&self) -> bool {
        self.params.len() == 1 && self.command == PRIVMSG && is_valid_channel(&self.params[0])
    }

    /// PRIVMSG addressed to a nick (a private message).
    pub fn is_from_user(&self) -> bool {
        self.params.len() == 1 && self.command == PRIVMSG && is_valid_nick(&self.params[0])
    }

    /// PRIVMSG or NOTICE.
    pub fn is_message(&self) -> bool {
        self.command == PRIVMSG || self.command == NOTICE
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Event {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}
