//! Registration, keepalive and nick collision handlers.

use chrono::Utc;
use slirc_proto::command::{NICK, PONG};
use slirc_proto::Event;
use tracing::debug;

use crate::client::Client;

/// RPL_WELCOME: record the nick the server actually assigned, then announce
/// the connection once the grace period has passed.
pub(super) fn handle_welcome(client: &Client, e: Event) {
    {
        let mut state = client.state();
        if let Some(nick) = e.params.first() {
            state.nick = nick.clone();
        }
        state.registered = true;
    }
    client.schedule_connected();
}

pub(super) fn handle_ping(client: &Client, e: Event) {
    let payload = if e.trailing.is_empty() {
        e.params.last().cloned().unwrap_or_default()
    } else {
        e.trailing
    };
    client.queue(Event::new(PONG).with_trailing(payload));
}

pub(super) fn handle_pong(client: &Client, _e: Event) {
    client.state().last_pong = Some(Utc::now());
}

/// ERR_NICKNAMEINUSE and friends: `<client> <rejected nick> :<reason>`.
///
/// The collision strategy derives the retry from the rejected nick. Before
/// registration the retry becomes the own nick right away; afterwards the
/// own nick only changes when the server echoes the NICK.
pub(super) fn handle_nick_collision(client: &Client, e: Event) {
    let (rejected, registered) = {
        let state = client.state();
        let rejected = e.params.get(1).cloned().unwrap_or_else(|| state.nick.clone());
        (rejected, state.registered)
    };
    // The strategy is caller code; never run it under the state lock.
    let next = client.config().resolve_nick_collision(&rejected);
    if !registered {
        client.state().nick = next.clone();
    }

    debug!(
        command = %e.command,
        from = %rejected,
        to = %next,
        registered,
        "Nick collision, retrying"
    );
    client.queue(Event::new(NICK).with_params([next]));
}
