//! Channel modes and per-channel member permissions.
//!
//! Which mode letters take an argument is not fixed by the protocol; servers
//! advertise it through ISUPPORT `CHANMODES` and `PREFIX`. [`ModeSpec`] holds
//! that advertisement and turns a `+o-v nick nick` style change into a list
//! of [`ModeChange`]s.

use std::collections::BTreeMap;
use std::fmt;

/// `CHANMODES` assumed until the server advertises its own.
pub const DEFAULT_CHANMODES: &str = "beI,k,l,imnpst";

/// `PREFIX` assumed until the server advertises its own.
pub const DEFAULT_PREFIX: &str = "(ov)@+";

/// Membership prefixes recognised in NAMES replies, highest rank first.
pub const NAMES_PREFIXES: &str = "~&@%+";

/// Member permissions in one channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Perms {
    pub owner: bool,  // +q (~)
    pub admin: bool,  // +a (&)
    pub op: bool,     // +o (@)
    pub halfop: bool, // +h (%)
    pub voice: bool,  // +v (+)
}

impl Perms {
    /// Build from NAMES prefix characters; unknown characters are skipped.
    pub fn from_prefixes(prefixes: &str) -> Self {
        let mut perms = Self::default();
        for mode in prefixes.chars().filter_map(prefix_mode) {
            perms.set_mode(mode, true);
        }
        perms
    }

    /// Apply a membership mode letter (`q a o h v`).
    ///
    /// Returns `false` and changes nothing for any other letter.
    pub fn set_mode(&mut self, mode: char, on: bool) -> bool {
        let slot = match mode {
            'q' => &mut self.owner,
            'a' => &mut self.admin,
            'o' => &mut self.op,
            'h' => &mut self.halfop,
            'v' => &mut self.voice,
            _ => return false,
        };
        *slot = on;
        true
    }

    /// Get the highest prefix character for this member.
    /// Priority: ~ > & > @ > % > +
    pub fn prefix_char(&self) -> Option<char> {
        if self.owner {
            Some('~')
        } else if self.admin {
            Some('&')
        } else if self.op {
            Some('@')
        } else if self.halfop {
            Some('%')
        } else if self.voice {
            Some('+')
        } else {
            None
        }
    }

    /// All prefix characters, highest first (the multi-prefix form).
    pub fn all_prefix_chars(&self) -> String {
        [
            (self.owner, '~'),
            (self.admin, '&'),
            (self.op, '@'),
            (self.halfop, '%'),
            (self.voice, '+'),
        ]
        .into_iter()
        .filter_map(|(on, c)| on.then_some(c))
        .collect()
    }

    /// Owner or admin.
    pub fn is_admin(&self) -> bool {
        self.owner || self.admin
    }

    /// Halfop or higher.
    pub fn is_trusted(&self) -> bool {
        self.is_admin() || self.op || self.halfop
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn prefix_mode(prefix: char) -> Option<char> {
    match prefix {
        '~' => Some('q'),
        '&' => Some('a'),
        '@' => Some('o'),
        '%' => Some('h'),
        '+' => Some('v'),
        _ => None,
    }
}

/// Split the leading NAMES prefixes off an entry: `"@+nick"` -> `("@+", "nick")`.
pub fn split_prefixes(entry: &str) -> (&str, &str) {
    let idx = entry
        .find(|c: char| !NAMES_PREFIXES.contains(c))
        .unwrap_or(entry.len());
    entry.split_at(idx)
}

/// One parsed mode change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub add: bool,
    pub mode: char,
    pub arg: Option<String>,
}

/// Argument rules for channel modes, from ISUPPORT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSpec {
    /// Type A: list modes, always take an argument.
    list: String,
    /// Type B: always take an argument.
    always: String,
    /// Type C: take an argument only when set.
    when_set: String,
    /// Type D: plain flags.
    flags: String,
    /// Membership modes from `PREFIX`, e.g. `ov`.
    membership: String,
}

impl Default for ModeSpec {
    fn default() -> Self {
        Self::new(DEFAULT_CHANMODES, DEFAULT_PREFIX)
    }
}

impl ModeSpec {
    /// Build from `CHANMODES` (`A,B,C,D`) and `PREFIX` (`(modes)symbols`).
    ///
    /// Missing groups are treated as empty, and a malformed `PREFIX` yields
    /// no membership modes.
    pub fn new(chanmodes: &str, prefix: &str) -> Self {
        let mut groups = chanmodes.split(',');
        let mut next = || groups.next().unwrap_or_default().to_owned();
        let (list, always, when_set, flags) = (next(), next(), next(), next());

        let membership = prefix
            .strip_prefix('(')
            .and_then(|p| p.split_once(')'))
            .map(|(modes, _)| modes.to_owned())
            .unwrap_or_default();

        Self {
            list,
            always,
            when_set,
            flags,
            membership,
        }
    }

    pub fn is_list(&self, mode: char) -> bool {
        self.list.contains(mode)
    }

    pub fn is_membership(&self, mode: char) -> bool {
        self.membership.contains(mode)
    }

    /// Whether `mode` is known at all.
    pub fn is_known(&self, mode: char) -> bool {
        self.is_list(mode)
            || self.is_membership(mode)
            || self.always.contains(mode)
            || self.when_set.contains(mode)
            || self.flags.contains(mode)
    }

    fn takes_arg(&self, mode: char, add: bool) -> bool {
        self.is_list(mode)
            || self.is_membership(mode)
            || self.always.contains(mode)
            || (add && self.when_set.contains(mode))
    }

    /// Parse a mode string and its arguments.
    ///
    /// A change whose argument is missing is dropped, so `MODE #c +b` (a
    /// ban list query) yields nothing.
    pub fn parse(&self, modes: &str, args: &[String]) -> Vec<ModeChange> {
        let mut args = args.iter();
        let mut add = true;
        let mut changes = Vec::new();

        for c in modes.chars() {
            match c {
                '+' => add = true,
                '-' => add = false,
                mode => {
                    let arg = if self.takes_arg(mode, add) {
                        match args.next() {
                            Some(arg) => Some(arg.clone()),
                            None => continue,
                        }
                    } else {
                        None
                    };
                    changes.push(ModeChange { add, mode, arg });
                }
            }
        }

        changes
    }
}

/// Non-list, non-membership modes currently set on a channel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelModes(BTreeMap<char, Option<String>>);

impl ChannelModes {
    pub fn has(&self, mode: char) -> bool {
        self.0.contains_key(&mode)
    }

    /// Argument of a set mode, e.g. the key for `+k`.
    pub fn arg(&self, mode: char) -> Option<&str> {
        self.0.get(&mode).and_then(|a| a.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn apply(&mut self, change: &ModeChange) {
        if change.add {
            self.0.insert(change.mode, change.arg.clone());
        } else {
            self.0.remove(&change.mode);
        }
    }
}

impl fmt::Display for ChannelModes {
    /// `+klnt key 10`, or nothing when no modes are set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str("+")?;
        for mode in self.0.keys() {
            write!(f, "{mode}")?;
        }
        for arg in self.0.values().flatten() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
