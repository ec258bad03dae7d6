//! Session state store.
//!
//! [`State`] is the client's model of the network: its own identity, the
//! users and channels it can see, and what the server advertised. It is
//! only ever mutated by the built-in handlers, each of which holds the
//! client's state lock for the duration of one mutation.
//!
//! Users and channels are keyed by their RFC 1459 canonical form. The store
//! keeps membership consistent in both directions: a user lists the
//! channels it is in, a channel lists its members, and a user that no
//! longer shares a channel with the client is dropped.

mod channel;
mod mode;
mod user;

pub use channel::Channel;
pub use mode::{
    split_prefixes, ChannelModes, ModeChange, ModeSpec, Perms, DEFAULT_CHANMODES, DEFAULT_PREFIX,
    NAMES_PREFIXES,
};
pub use user::{User, UserExtras};

use chrono::{DateTime, Utc};
use slirc_proto::{is_valid_channel, is_valid_nick, rfc1459_eq, to_rfc1459};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Everything the client knows about its session.
#[derive(Debug, Default)]
pub struct State {
    pub(crate) nick: String,
    pub(crate) ident: String,
    pub(crate) host: String,
    users: HashMap<String, User>,
    channels: HashMap<String, Channel>,
    server_options: HashMap<String, String>,
    motd: String,
    available_caps: BTreeMap<String, String>,
    enabled_caps: BTreeSet<String>,
    pub(crate) last_pong: Option<DateTime<Utc>>,
    /// Set by the welcome numeric; from then on the server confirms nick
    /// changes with NICK.
    pub(crate) registered: bool,
}

impl State {
    pub(crate) fn new(nick: &str, ident: &str) -> Self {
        Self {
            nick: nick.to_owned(),
            ident: ident.to_owned(),
            ..Self::default()
        }
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether `nick` is the client's own nick.
    pub fn is_self(&self, nick: &str) -> bool {
        rfc1459_eq(&self.nick, nick)
    }

    pub fn user(&self, nick: &str) -> Option<&User> {
        self.users.get(&to_rfc1459(nick))
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&to_rfc1459(name))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn server_option(&self, key: &str) -> Option<&str> {
        self.server_options.get(key).map(String::as_str)
    }

    pub fn server_options(&self) -> &HashMap<String, String> {
        &self.server_options
    }

    pub fn motd(&self) -> &str {
        &self.motd
    }

    pub fn enabled_caps(&self) -> impl Iterator<Item = &str> {
        self.enabled_caps.iter().map(String::as_str)
    }

    pub fn has_cap(&self, cap: &str) -> bool {
        self.enabled_caps.contains(cap)
    }

    /// Capabilities the server offers, with their values (`sasl=PLAIN`).
    pub fn available_caps(&self) -> &BTreeMap<String, String> {
        &self.available_caps
    }

    /// Mode argument rules as currently advertised.
    pub fn mode_spec(&self) -> ModeSpec {
        ModeSpec::new(
            self.server_option("CHANMODES").unwrap_or(DEFAULT_CHANMODES),
            self.server_option("PREFIX").unwrap_or(DEFAULT_PREFIX),
        )
    }

    // =========================================================================
    // Users and channels
    // =========================================================================

    pub(crate) fn user_mut(&mut self, nick: &str) -> Option<&mut User> {
        self.users.get_mut(&to_rfc1459(nick))
    }

    pub(crate) fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(&to_rfc1459(name))
    }

    /// Look up a channel, creating it first if the name is valid.
    pub(crate) fn create_channel(&mut self, name: &str) -> Option<&mut Channel> {
        if !is_valid_channel(name) {
            return None;
        }
        Some(
            self.channels
                .entry(to_rfc1459(name))
                .or_insert_with(|| Channel::new(name)),
        )
    }

    /// Look up a user, creating it (and the channel) as needed, and make
    /// sure it is a member of `channel`.
    pub(crate) fn create_user(&mut self, channel: &str, nick: &str) -> Option<&mut User> {
        if !is_valid_nick(nick) {
            return None;
        }

        let user_key = to_rfc1459(nick);
        let channel_key = to_rfc1459(channel);
        self.create_channel(channel)?.users.insert(user_key.clone());

        let user = self
            .users
            .entry(user_key)
            .or_insert_with(|| User::new(nick));
        user.channels.insert(channel_key);
        Some(user)
    }

    /// Remove `nick` from one channel, dropping the user if that was the
    /// last channel it shared with the client.
    pub(crate) fn part_user(&mut self, channel: &str, nick: &str) {
        let user_key = to_rfc1459(nick);
        let channel_key = to_rfc1459(channel);

        if let Some(channel) = self.channels.get_mut(&channel_key) {
            channel.users.remove(&user_key);
        }

        let orphaned = match self.users.get_mut(&user_key) {
            Some(user) => {
                user.forget_channel(&channel_key);
                user.channels.is_empty()
            }
            None => false,
        };
        if orphaned && !self.is_self(nick) {
            self.users.remove(&user_key);
        }
    }

    /// Remove a user everywhere.
    pub(crate) fn delete_user(&mut self, nick: &str) {
        let user_key = to_rfc1459(nick);
        let Some(user) = self.users.remove(&user_key) else {
            return;
        };
        for channel_key in &user.channels {
            if let Some(channel) = self.channels.get_mut(channel_key) {
                channel.users.remove(&user_key);
            }
        }
    }

    /// Remove a channel and its memberships, dropping users left with no
    /// shared channel.
    pub(crate) fn delete_channel(&mut self, name: &str) {
        let channel_key = to_rfc1459(name);
        let Some(channel) = self.channels.remove(&channel_key) else {
            return;
        };

        let own_key = to_rfc1459(&self.nick);
        for user_key in &channel.users {
            let orphaned = match self.users.get_mut(user_key) {
                Some(user) => {
                    user.forget_channel(&channel_key);
                    user.channels.is_empty()
                }
                None => false,
            };
            if orphaned && *user_key != own_key {
                self.users.remove(user_key);
            }
        }
    }

    /// Rename a user across every structure. Renaming the client itself
    /// also updates the own nick.
    pub(crate) fn rename_user(&mut self, from: &str, to: &str) {
        let from_key = to_rfc1459(from);
        let to_key = to_rfc1459(to);

        if self.is_self(from) {
            self.nick = to.to_owned();
        }

        let Some(mut user) = self.users.remove(&from_key) else {
            return;
        };

        // A stale entry under the new nick would otherwise be overwritten
        // while its channels still point at it.
        if from_key != to_key {
            self.delete_user(to);
        }

        user.nick = to.to_owned();
        user.touch();
        for channel_key in &user.channels {
            if let Some(channel) = self.channels.get_mut(channel_key) {
                channel.users.remove(&from_key);
                channel.users.insert(to_key.clone());
            }
        }
        self.users.insert(to_key, user);
    }

    // =========================================================================
    // Server information
    // =========================================================================

    pub(crate) fn set_server_option(&mut self, key: &str, value: &str) {
        self.server_options.insert(key.to_owned(), value.to_owned());
    }

    pub(crate) fn remove_server_option(&mut self, key: &str) {
        self.server_options.remove(key);
    }

    pub(crate) fn reset_motd(&mut self) {
        self.motd.clear();
    }

    pub(crate) fn push_motd_line(&mut self, line: &str) {
        if !self.motd.is_empty() {
            self.motd.push('\n');
        }
        self.motd.push_str(line);
    }

    pub(crate) fn offer_cap(&mut self, name: &str, value: &str) {
        self.available_caps.insert(name.to_owned(), value.to_owned());
    }

    pub(crate) fn enable_cap(&mut self, name: &str) {
        self.enabled_caps.insert(name.to_owned());
    }

    pub(crate) fn disable_cap(&mut self, name: &str) {
        self.enabled_caps.remove(name);
    }

    /// Server withdrew a capability (`CAP DEL`).
    pub(crate) fn withdraw_cap(&mut self, name: &str) {
        self.available_caps.remove(name);
        self.enabled_caps.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State::new("me", "ident")
    }

    #[test]
    fn create_user_links_both_directions() {
        let mut s = state();
        s.create_user("#Rust", "Alice").unwrap();

        let user = s.user("alice").unwrap();
        assert_eq!(user.nick, "Alice");
        assert!(user.is_in_channel("#rust"));

        let channel = s.channel("#RUST").unwrap();
        assert_eq!(channel.name, "#Rust");
        assert!(channel.has_user("ALICE"));
    }

    #[test]
    fn create_user_rejects_invalid_names() {
        let mut s = state();
        assert!(s.create_user("#c", "1bad").is_none());
        assert!(s.create_user("nochan", "alice").is_none());
        assert!(s.user("alice").is_none());
        assert_eq!(s.channels().count(), 0);
    }

    #[test]
    fn part_drops_user_with_no_shared_channel() {
        let mut s = state();
        s.create_user("#a", "bob");
        s.create_user("#b", "bob");

        s.part_user("#a", "bob");
        assert!(!s.channel("#a").unwrap().has_user("bob"));
        assert!(s.user("bob").unwrap().is_in_channel("#b"));

        s.part_user("#b", "bob");
        assert!(s.user("bob").is_none());
    }

    #[test]
    fn part_keeps_own_user() {
        let mut s = state();
        s.create_user("#a", "me");
        s.part_user("#a", "me");
        assert!(s.user("me").is_some());
    }

    #[test]
    fn delete_user_clears_every_membership() {
        let mut s = state();
        s.create_user("#a", "bob");
        s.create_user("#b", "bob");
        s.delete_user("BOB");
        assert!(s.user("bob").is_none());
        assert!(!s.channel("#a").unwrap().has_user("bob"));
        assert!(!s.channel("#b").unwrap().has_user("bob"));
    }

    #[test]
    fn delete_channel_prunes_orphans() {
        let mut s = state();
        s.create_user("#a", "me");
        s.create_user("#a", "bob");
        s.create_user("#a", "carol");
        s.create_user("#b", "carol");
        s.user_mut("carol").unwrap().perms_mut("#a").op = true;

        s.delete_channel("#A");
        assert!(s.channel("#a").is_none());
        assert!(s.user("bob").is_none());
        assert!(s.user("me").is_some());

        let carol = s.user("carol").unwrap();
        assert!(!carol.is_in_channel("#a"));
        assert!(carol.perms("#a").is_empty());
    }

    #[test]
    fn rename_moves_keys_and_memberships() {
        let mut s = state();
        s.create_user("#a", "bob");
        s.rename_user("bob", "Robert");

        assert!(s.user("bob").is_none());
        let user = s.user("robert").unwrap();
        assert_eq!(user.nick, "Robert");
        let channel = s.channel("#a").unwrap();
        assert!(channel.has_user("robert"));
        assert!(!channel.has_user("bob"));
    }

    #[test]
    fn rename_case_only_keeps_entry() {
        let mut s = state();
        s.create_user("#a", "bob");
        s.rename_user("bob", "BOB");
        assert_eq!(s.user("bob").unwrap().nick, "BOB");
        assert!(s.channel("#a").unwrap().has_user("bob"));
    }

    #[test]
    fn rename_over_stale_entry() {
        let mut s = state();
        s.create_user("#a", "bob");
        s.create_user("#b", "ghost");
        s.rename_user("bob", "ghost");

        let user = s.user("ghost").unwrap();
        assert!(user.is_in_channel("#a"));
        assert!(!user.is_in_channel("#b"));
        assert!(!s.channel("#b").unwrap().has_user("ghost"));
    }

    #[test]
    fn rename_self_updates_own_nick() {
        let mut s = state();
        s.rename_user("ME", "me2");
        assert_eq!(s.nick(), "me2");
    }

    #[test]
    fn motd_joins_lines() {
        let mut s = state();
        s.push_motd_line("one");
        s.push_motd_line("two");
        assert_eq!(s.motd(), "one\ntwo");
        s.reset_motd();
        assert_eq!(s.motd(), "");
    }

    #[test]
    fn mode_spec_follows_isupport() {
        let mut s = state();
        assert!(!s.mode_spec().is_membership('h'));
        s.set_server_option("PREFIX", "(ohv)@%+");
        assert!(s.mode_spec().is_membership('h'));
    }

    #[test]
    fn caps_lifecycle() {
        let mut s = state();
        s.offer_cap("sasl", "PLAIN");
        s.enable_cap("sasl");
        assert!(s.has_cap("sasl"));
        s.withdraw_cap("sasl");
        assert!(!s.has_cap("sasl"));
        assert!(s.available_caps().is_empty());
    }
}
