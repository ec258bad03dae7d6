//! IRCv3 message tags.
//!
//! Values are kept in their escaped (wire) form. [`Tags::get`] unescapes on the
//! way out and [`Tags::set`] escapes on the way in, so a value read from the
//! network can be re-serialized byte for byte without ever being decoded.
//!
//! A `Tags` value is plain data: sharing one between threads needs external
//! synchronization like any other `&mut` access.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::TagError;

/// Ceiling for the whole tag segment on the wire, `@` and trailing space included.
pub const MAX_TAG_LENGTH: usize = 511;

const TAG_PREFIX: char = '@';
const TAG_SEPARATOR: char = ';';
const TAG_VALUE: char = '=';

/// Escape a tag value for the wire.
///
/// `;` → `\:`, space → `\s`, `\` → `\\`, CR → `\r`, LF → `\n`.
pub fn escape_tag_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ';' => out.push_str("\\:"),
            ' ' => out.push_str("\\s"),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_tag_value`].
///
/// Only the five known sequences are replaced. Anything else, including a
/// lone trailing backslash, is left as it was received.
pub fn unescape_tag_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.peek() {
            Some(':') => ';',
            Some('s') => ' ',
            Some('\\') => '\\',
            Some('r') => '\r',
            Some('n') => '\n',
            _ => {
                out.push('\\');
                continue;
            }
        };
        chars.next();
        out.push(decoded);
    }
    out
}

/// Whether `name` is an acceptable tag name: non-empty, `[A-Za-z0-9/_.-]` only.
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'.' | b'-'))
}

/// Encoded length of one `name[=value]` entry.
fn entry_len(name: &str, value: &str) -> usize {
    if value.is_empty() {
        name.len()
    } else {
        name.len() + 1 + value.len()
    }
}

/// Key/value map of IRCv3 tags with escaped values.
///
/// Iteration (and therefore serialization) order is by tag name. The protocol
/// gives order no meaning; a sorted map just keeps output reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Empty tag map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the tag data of a line, without the leading `@`.
    ///
    /// `aaa=bbb;ccc;example.com/ddd=eee` yields three tags, `ccc` with an
    /// empty value. Nothing is rejected here; names are not validated and
    /// values are stored exactly as received. Empty segments are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut tags = BTreeMap::new();
        for segment in raw.split(TAG_SEPARATOR) {
            if segment.is_empty() {
                continue;
            }
            match segment.find(TAG_VALUE) {
                Some(idx) if idx >= 1 => {
                    tags.insert(segment[..idx].to_owned(), segment[idx + 1..].to_owned());
                }
                _ => {
                    tags.insert(segment.to_owned(), String::new());
                }
            }
        }
        Self(tags)
    }

    /// Number of tags.
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `key` is present (with or without a value).
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Unescaped value for `key`. Present-without-value tags yield `Some("")`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| unescape_tag_value(v))
    }

    /// The value for `key` exactly as it appears on the wire.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Escape `value` and store it under `key`.
    ///
    /// Fails if the name is invalid, or if the encoded segment (with `@` and
    /// the separating space) would exceed [`MAX_TAG_LENGTH`]. On failure the
    /// map is left untouched.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), TagError> {
        if !is_valid_tag_name(key) {
            return Err(TagError::InvalidTagName(key.to_owned()));
        }

        let value = escape_tag_value(value);

        let others: usize = self
            .0
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| entry_len(k, v) + 1)
            .sum();
        // '@' + entries joined by ';' + ' '
        let actual = 1 + others + entry_len(key, &value) + 1;
        if actual > MAX_TAG_LENGTH {
            return Err(TagError::TooLong {
                key: key.to_owned(),
                actual,
                limit: MAX_TAG_LENGTH,
            });
        }

        self.0.insert(key.to_owned(), value);
        Ok(())
    }

    /// Remove `key`, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    /// Iterate `(name, escaped value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Length of the serialized tag data, excluding `@` and the trailing space.
    ///
    /// Matches what [`fmt::Display`] writes, truncation included.
    pub fn encoded_len(&self) -> usize {
        let mut len = 0;
        self.fold_within_limit(|name, value, first| {
            len += entry_len(name, value) + usize::from(!first);
        });
        len
    }

    /// Write `@tags ` to `out`. Writes nothing if no tag fits.
    pub fn write_segment(&self, out: &mut String) {
        let encoded = self.to_string();
        if encoded.is_empty() {
            return;
        }
        out.push(TAG_PREFIX);
        out.push_str(&encoded);
        out.push(' ');
    }

    /// Length [`write_segment`](Self::write_segment) would add.
    pub fn segment_len(&self) -> usize {
        match self.encoded_len() {
            0 => 0,
            n => n + 2,
        }
    }

    /// Visit entries in order until the next one would overflow the ceiling.
    ///
    /// Tags that do not fit are silently dropped; this is the only place
    /// where serialization loses data.
    fn fold_within_limit(&self, mut visit: impl FnMut(&str, &str, bool)) {
        // '@' and the separating space
        let mut used = 2;
        for (i, (name, value)) in self.0.iter().enumerate() {
            let needed = entry_len(name, value) + usize::from(i > 0);
            if used + needed > MAX_TAG_LENGTH {
                return;
            }
            used += needed;
            visit(name, value, i == 0);
        }
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.fold_within_limit(|name, value, first| {
            if !first {
                out.push(TAG_SEPARATOR);
            }
            out.push_str(name);
            if !value.is_empty() {
                out.push(TAG_VALUE);
                out.push_str(value);
            }
        });
        f.write_str(&out)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Tags {
    /// Build from already-escaped pairs, bypassing validation.
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        )
    }
}
