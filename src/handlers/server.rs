//! Server information: MYINFO, ISUPPORT and the MOTD.

use slirc_proto::command::RPL_MOTDSTART;
use slirc_proto::Event;

use super::ignore;
use crate::client::Client;

/// Trailing text that marks a 005 as ISUPPORT; the numeric is also used for
/// RPL_BOUNCE on some servers.
const ISUPPORT_MARKER: &str = "this server";

/// RPL_MYINFO: `<me> <server> <version> <user modes> <channel modes>`.
pub(super) fn handle_myinfo(client: &Client, e: Event) {
    let [_, server, version, ..] = e.params.as_slice() else {
        return ignore(&e, "short myinfo");
    };

    let mut state = client.state();
    state.set_server_option("SERVER", server);
    state.set_server_option("VERSION", version);
}

/// RPL_ISUPPORT: `<me> TOKEN[=value] -TOKEN ... :are supported by this server`.
pub(super) fn handle_isupport(client: &Client, e: Event) {
    if !e.trailing.ends_with(ISUPPORT_MARKER) {
        return ignore(&e, "not an isupport reply");
    }
    if e.params.len() < 2 {
        return ignore(&e, "no isupport tokens");
    }

    let mut state = client.state();
    for token in &e.params[1..] {
        if let Some(key) = token.strip_prefix('-') {
            state.remove_server_option(key);
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => state.set_server_option(key, value),
            _ => state.set_server_option(token, ""),
        }
    }
}

/// RPL_MOTDSTART resets the buffer; each RPL_MOTD appends one line.
pub(super) fn handle_motd(client: &Client, e: Event) {
    let mut state = client.state();
    if e.command == RPL_MOTDSTART {
        state.reset_motd();
    } else {
        state.push_motd_line(&e.trailing);
    }
}
