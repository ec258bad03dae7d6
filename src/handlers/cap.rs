//! IRCv3 capability tracking.
//!
//! Only the server's side of CAP is observed here: what it offers (LS/NEW),
//! what it acknowledged (ACK) and what it withdrew (DEL). Requesting
//! capabilities is left to the caller.

use slirc_proto::Event;
use tracing::debug;

use super::ignore;
use crate::client::Client;

/// `CAP <target> <subcommand> [*] :<capabilities>`
pub(super) fn handle_cap(client: &Client, e: Event) {
    let Some(subcommand) = e.params.get(1) else {
        return ignore(&e, "no cap subcommand");
    };
    // A single capability may arrive without the trailing marker.
    let list = if e.trailing.is_empty() && e.params.len() > 2 {
        e.params[e.params.len() - 1].as_str()
    } else {
        e.trailing.as_str()
    };
    let caps = list.split(' ').filter(|c| !c.is_empty());

    let subcommand = subcommand.to_ascii_uppercase();
    let mut state = client.state();
    match subcommand.as_str() {
        "LS" | "NEW" => {
            for cap in caps {
                let (name, value) = cap.split_once('=').unwrap_or((cap, ""));
                state.offer_cap(name, value);
            }
        }
        "ACK" => {
            for cap in caps {
                match cap.strip_prefix('-') {
                    Some(name) => state.disable_cap(name),
                    None => state.enable_cap(cap),
                }
            }
        }
        "DEL" => {
            for cap in caps {
                state.withdraw_cap(cap);
            }
        }
        other => debug!(subcommand = other, list, "Unhandled CAP reply"),
    }
}
