//! Channel membership, topic and mode tracking.

use slirc_proto::command::{MODE, RPL_CHANNELMODEIS, WHO};
use slirc_proto::{is_valid_channel, to_rfc1459, Event, Source};

use super::ignore;
use crate::client::Client;
use crate::state::{split_prefixes, Perms};

/// JOIN, including the IRCv3 extended-join form
/// (`JOIN #chan account :real name`).
pub(super) fn handle_join(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return ignore(&e, "no source");
    };
    let channel = match e.params.first() {
        Some(channel) => channel.as_str(),
        None if !e.trailing.is_empty() => e.trailing.as_str(),
        None => return ignore(&e, "no channel"),
    };

    let joined = {
        let mut state = client.state();
        let is_self = state.is_self(&source.name);
        if let Some(user) = state.create_user(channel, &source.name) {
            if !source.ident.is_empty() {
                user.ident = source.ident.clone();
            }
            if !source.host.is_empty() {
                user.host = source.host.clone();
            }
            if e.params.len() == 2 {
                if e.params[1] != "*" {
                    user.extras.account = e.params[1].clone();
                }
                if !e.trailing.is_empty() {
                    user.extras.name = e.trailing.clone();
                }
            }

            if is_self {
                state.ident = source.ident.clone();
                state.host = source.host.clone();
            }
            Some(is_self)
        } else {
            None
        }
    };
    let Some(is_self) = joined else {
        return ignore(&e, "invalid nick or channel");
    };

    let whox = client.config().whox_query();
    if is_self {
        // Learn the whole member list and the channel modes.
        client.queue(Event::new(WHO).with_params([channel, whox.as_str()]));
        client.queue(Event::new(MODE).with_params([channel]));
    } else {
        client.queue(Event::new(WHO).with_params([source.name.as_str(), whox.as_str()]));
    }
}

pub(super) fn handle_part(client: &Client, e: Event) {
    let Some(source) = &e.source else {
        return ignore(&e, "no source");
    };
    let Some(channel) = e.params.first() else {
        return ignore(&e, "no channel");
    };

    let mut state = client.state();
    if state.is_self(&source.name) {
        state.delete_channel(channel);
    } else {
        state.part_user(channel, &source.name);
    }
}

pub(super) fn handle_kick(client: &Client, e: Event) {
    let [channel, target, ..] = e.params.as_slice() else {
        return ignore(&e, "needs channel and target");
    };

    let mut state = client.state();
    if state.is_self(target) {
        state.delete_channel(channel);
    } else {
        state.part_user(channel, target);
    }
}

/// TOPIC and RPL_TOPIC. The channel is the last middle parameter.
pub(super) fn handle_topic(client: &Client, e: Event) {
    let Some(name) = e.last_param() else {
        return ignore(&e, "no channel");
    };

    let updated = match client.state().create_channel(name) {
        Some(channel) => {
            channel.topic = e.trailing.clone();
            true
        }
        None => false,
    };
    if !updated {
        ignore(&e, "invalid channel");
    }
}

/// RPL_NAMREPLY, with or without multi-prefix and userhost-in-names.
pub(super) fn handle_names(client: &Client, e: Event) {
    let Some(channel) = e.last_param().filter(|c| is_valid_channel(c)) else {
        return ignore(&e, "no valid channel");
    };
    let channel_key = to_rfc1459(channel);

    let mut state = client.state();
    for entry in e.trailing.split(' ').filter(|s| !s.is_empty()) {
        let (prefixes, name) = split_prefixes(entry);
        let member = if name.contains('@') {
            Source::parse(name)
        } else {
            Source::server(name)
        };

        let Some(user) = state.create_user(channel, &member.name) else {
            continue;
        };
        if !member.host.is_empty() {
            user.host = member.host;
        }
        if !member.ident.is_empty() {
            user.ident = member.ident;
        }
        // NAMES carries the full set; overwrite rather than merge.
        *user.perms_mut(&channel_key) = Perms::from_prefixes(prefixes);
    }
}

/// MODE and RPL_CHANNELMODEIS on a tracked channel.
///
/// List modes are not stored, membership modes update the member's
/// permissions and everything else is set on the channel.
pub(super) fn handle_mode(client: &Client, e: Event) {
    let mut params = e.params.clone();
    if e.command == RPL_CHANNELMODEIS && !params.is_empty() {
        // leading own nick
        params.remove(0);
    }
    if !e.trailing.is_empty() {
        params.push(e.trailing.clone());
    }
    let [target, modes, args @ ..] = params.as_slice() else {
        return ignore(&e, "needs target and modes");
    };
    if !is_valid_channel(target) {
        // user modes are not tracked
        return;
    }

    let mut state = client.state();
    let spec = state.mode_spec();
    let changes = spec.parse(modes, args);

    let Some(channel) = state.channel_mut(target) else {
        return ignore(&e, "untracked channel");
    };
    for change in &changes {
        if !spec.is_list(change.mode) && !spec.is_membership(change.mode) {
            channel.modes.apply(change);
        }
    }

    let channel_key = to_rfc1459(target);
    for change in changes.iter().filter(|c| spec.is_membership(c.mode)) {
        let Some(nick) = &change.arg else { continue };
        if let Some(user) = state.user_mut(nick) {
            if user.channels.contains(&channel_key) {
                user.perms_mut(&channel_key).set_mode(change.mode, change.add);
            }
        }
    }
}
