//! Nickname and channel-name validity checks.
//!
//! These are deliberately looser than RFC 2812: servers in the wild hand out
//! nicks and channel names the RFC never anticipated, and the state tracker
//! would rather accept them than drop users.

/// Longest channel name accepted, prefix included.
pub const MAX_CHANNEL_LEN: usize = 50;

/// Check whether `nick` looks like a usable nickname.
///
/// The first octet must be in `A..=}` (letters plus `[\]^_`{|}`) or `?`;
/// the rest may also contain digits and `-`.
///
/// ```
/// use slirc_proto::validate::is_valid_nick;
///
/// assert!(is_valid_nick("nick"));
/// assert!(is_valid_nick("[away]"));
/// assert!(!is_valid_nick("1nick"));
/// assert!(!is_valid_nick("ni ck"));
/// ```
pub fn is_valid_nick(nick: &str) -> bool {
    let mut bytes = nick.bytes();
    match bytes.next() {
        Some(b'A'..=b'}') | Some(b'?') => {}
        _ => return false,
    }
    bytes.all(|b| matches!(b, b'A'..=b'}' | b'0'..=b'9' | b'-'))
}

/// Check whether `channel` looks like a channel name.
///
/// Accepts the `#`, `&`, `+`, `!`, `*` and `~` prefixes (the last two are
/// used by bouncers). `!` channels need a five character upper-case ID.
///
/// ```
/// use slirc_proto::validate::is_valid_channel;
///
/// assert!(is_valid_channel("#rust"));
/// assert!(is_valid_channel("!ABCDEfoo"));
/// assert!(!is_valid_channel("#"));
/// assert!(!is_valid_channel("#a,b"));
/// ```
pub fn is_valid_channel(channel: &str) -> bool {
    let bytes = channel.as_bytes();
    if bytes.len() <= 1 || bytes.len() > MAX_CHANNEL_LEN {
        return false;
    }

    if !matches!(bytes[0], b'!' | b'#' | b'&' | b'*' | b'+' | b'~') {
        return false;
    }

    if bytes[0] == b'!' {
        if bytes.len() < 7 {
            return false;
        }
        if !bytes[1..6]
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        {
            return false;
        }
    }

    !bytes[1..]
        .iter()
        .any(|b| matches!(b, 0x00 | 0x07 | b'\r' | b'\n' | b' ' | b',' | b':'))
}

/// Check whether `ident` is a plausible username (no separators or controls).
pub fn is_valid_user(ident: &str) -> bool {
    !ident.is_empty()
        && !ident
            .chars()
            .any(|c| c == ' ' || c == '@' || c == '!' || c.is_control())
}
