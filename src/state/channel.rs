//! Channel-related types and state.

use chrono::{DateTime, Utc};
use slirc_proto::to_rfc1459;
use std::collections::BTreeSet;

use super::mode::ChannelModes;

/// A channel the client is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Name as first seen on the wire.
    pub name: String,
    pub topic: String,
    pub modes: ChannelModes,
    /// Members (canonical nicks).
    pub(crate) users: BTreeSet<String>,
    pub joined: DateTime<Utc>,
}

impl Channel {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            topic: String::new(),
            modes: ChannelModes::default(),
            users: BTreeSet::new(),
            joined: Utc::now(),
        }
    }

    pub fn has_user(&self, nick: &str) -> bool {
        self.users.contains(&to_rfc1459(nick))
    }

    /// Canonical nicks of all members.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
