//! RFC 1459 case mapping.
//!
//! Nicknames and channel names are compared case-insensitively, with the
//! Scandinavian quirk that `[]\~` are the upper-case forms of `{}|^`. Every
//! place that uses a nick or channel as a map key must go through
//! [`to_rfc1459`], otherwise the same user shows up twice under two spellings.

/// Fold a single character to its RFC 1459 lower-case form.
#[inline]
pub const fn fold_char(c: char) -> char {
    match c {
        'A'..='Z' => (c as u8 + 32) as char,
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c,
    }
}

/// Canonical key for a nick or channel name.
pub fn to_rfc1459(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Case-insensitive equality under RFC 1459 rules.
pub fn rfc1459_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(fold_char).eq(b.chars().map(fold_char))
}
