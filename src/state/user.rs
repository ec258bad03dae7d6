//! User-related types and state.

use chrono::{DateTime, Utc};
use slirc_proto::{to_rfc1459, Source};
use std::collections::{BTreeSet, HashMap};

use super::mode::Perms;

/// Information learned about a user beyond the hostmask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserExtras {
    /// Services account, empty when not logged in or unknown.
    pub account: String,
    /// Real name (gecos).
    pub name: String,
    /// Away message, empty when not away.
    pub away: String,
    /// Last time the user spoke, kicked, set a topic or changed nick.
    pub last_active: DateTime<Utc>,
}

/// A user sharing at least one channel with the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub nick: String,
    pub ident: String,
    pub host: String,
    /// Channels shared with the client (canonical names).
    pub channels: BTreeSet<String>,
    /// Membership modes per channel (canonical names).
    pub(crate) perms: HashMap<String, Perms>,
    pub first_seen: DateTime<Utc>,
    pub extras: UserExtras,
}

impl User {
    pub(crate) fn new(nick: &str) -> Self {
        let now = Utc::now();
        Self {
            nick: nick.to_owned(),
            ident: String::new(),
            host: String::new(),
            channels: BTreeSet::new(),
            perms: HashMap::new(),
            first_seen: now,
            extras: UserExtras {
                account: String::new(),
                name: String::new(),
                away: String::new(),
                last_active: now,
            },
        }
    }

    pub fn is_in_channel(&self, channel: &str) -> bool {
        self.channels.contains(&to_rfc1459(channel))
    }

    /// Membership modes in `channel`; empty if not a member.
    pub fn perms(&self, channel: &str) -> Perms {
        self.perms
            .get(&to_rfc1459(channel))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_away(&self) -> bool {
        !self.extras.away.is_empty()
    }

    pub fn account(&self) -> Option<&str> {
        Some(self.extras.account.as_str()).filter(|a| !a.is_empty())
    }

    /// `nick!ident@host` with whatever parts are known.
    pub fn hostmask(&self) -> String {
        Source::new(&self.nick, &self.ident, &self.host).to_string()
    }

    pub(crate) fn perms_mut(&mut self, channel_key: &str) -> &mut Perms {
        self.perms.entry(channel_key.to_owned()).or_default()
    }

    pub(crate) fn forget_channel(&mut self, channel_key: &str) {
        self.channels.remove(channel_key);
        self.perms.remove(channel_key);
    }

    pub(crate) fn touch(&mut self) {
        self.extras.last_active = Utc::now();
    }
}
