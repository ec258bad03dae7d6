//! User identity and activity tracking.

use slirc_proto::command::RPL_WHOSPCRPL;
use slirc_proto::Event;

use super::ignore;
use crate::client::Client;

pub(super) fn handle_quit(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return ignore(&e, "no source");
    };
    client.state().delete_user(&source.name);
}

/// NICK; the new nick may arrive as a middle or trailing parameter.
pub(super) fn handle_nick(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return ignore(&e, "no source");
    };
    let new_nick = match e.params.as_slice() {
        [nick] => nick.as_str(),
        [] if !e.trailing.is_empty() => e.trailing.as_str(),
        _ => return ignore(&e, "no new nick"),
    };
    client.state().rename_user(&source.name, new_nick);
}

/// Fields of a WHO or WHOX reply.
struct WhoReply<'a> {
    channel: &'a str,
    ident: &'a str,
    host: &'a str,
    nick: &'a str,
    account: Option<&'a str>,
    name: &'a str,
}

impl<'a> WhoReply<'a> {
    /// RPL_WHOREPLY: `<me> <channel> <user> <host> <server> <nick> <flags> :<hops> <real name>`
    fn standard(e: &'a Event) -> Option<Self> {
        if e.params.len() < 6 {
            return None;
        }
        let name = match e.trailing.split_once(' ') {
            Some((hops, name)) if hops.bytes().all(|b| b.is_ascii_digit()) => name,
            None if e.trailing.bytes().all(|b| b.is_ascii_digit()) => "",
            _ => e.trailing.as_str(),
        };
        Some(Self {
            channel: &e.params[1],
            ident: &e.params[2],
            host: &e.params[3],
            nick: &e.params[5],
            account: None,
            name,
        })
    }

    /// RPL_WHOSPCRPL for our `%tacuhnr` query:
    /// `<me> <tag> <channel> <user> <host> <nick> <account> :<real name>`
    fn whox(e: &'a Event, query_tag: &str) -> Option<Self> {
        let [_, tag, channel, ident, host, nick, account] = e.params.as_slice() else {
            return None;
        };
        if tag != query_tag {
            // not a reply to one of our queries
            return None;
        }
        Some(Self {
            channel,
            ident,
            host,
            nick,
            account: Some(account.as_str()).filter(|a| *a != "0"),
            name: &e.trailing,
        })
    }
}

/// RPL_WHOREPLY and RPL_WHOSPCRPL.
///
/// A reply for a tracked channel creates the member if needed; otherwise
/// only an already known user is updated.
pub(super) fn handle_who(client: &Client, e: Event) {
    let reply = if e.command == RPL_WHOSPCRPL {
        WhoReply::whox(&e, &client.config().whox_query_tag)
    } else {
        WhoReply::standard(&e)
    };
    let Some(reply) = reply else {
        return ignore(&e, "malformed who reply");
    };

    let mut state = client.state();
    let tracked = state.channel(reply.channel).is_some();
    let user = if tracked {
        state.create_user(reply.channel, reply.nick)
    } else {
        state.user_mut(reply.nick)
    };
    let Some(user) = user else {
        return;
    };

    user.ident = reply.ident.to_owned();
    user.host = reply.host.to_owned();
    user.extras.name = reply.name.to_owned();
    if let Some(account) = reply.account {
        user.extras.account = account.to_owned();
    }
}

/// Refresh the sender's last-active time.
pub(super) fn update_last_active(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return;
    };
    if let Some(user) = client.state().user_mut(&source.name) {
        user.touch();
    }
}

/// CHGHOST `<new ident> <new host>`.
pub(super) fn handle_chghost(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return ignore(&e, "no source");
    };
    let [ident, host] = e.params.as_slice() else {
        return ignore(&e, "needs ident and host");
    };

    let mut state = client.state();
    if let Some(user) = state.user_mut(&source.name) {
        user.ident = ident.clone();
        user.host = host.clone();
    }
    if state.is_self(&source.name) {
        state.ident = ident.clone();
        state.host = host.clone();
    }
}

/// AWAY with a message marks the user away; without one, back.
pub(super) fn handle_away(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return ignore(&e, "no source");
    };
    if let Some(user) = client.state().user_mut(&source.name) {
        user.extras.away = e.trailing.clone();
    }
}

/// ACCOUNT `<account>`, or `*` when logged out.
pub(super) fn handle_account(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return ignore(&e, "no source");
    };
    let account = match e.params.as_slice() {
        [account] => account.as_str(),
        [] if !e.trailing.is_empty() => e.trailing.as_str(),
        _ => return ignore(&e, "no account"),
    };
    let account = if account == "*" { "" } else { account };

    if let Some(user) = client.state().user_mut(&source.name) {
        user.extras.account = account.to_owned();
    }
}

/// Any event carrying an `account` tag (IRCv3 account-tag) tells us the
/// sender's account.
pub(super) fn handle_account_tag(client: &Client, e: Event) {
    let (Some(source), Some(tags)) = (&e.source, &e.tags) else {
        return;
    };
    let Some(account) = tags.get("account") else {
        return;
    };
    if let Some(user) = client.state().user_mut(&source.name) {
        user.extras.account = account;
    }
}
