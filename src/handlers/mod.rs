//! Event handlers.
//!
//! [`Registry`] holds and dispatches handlers. The remaining modules are the
//! built-in handlers that keep [`State`](crate::state::State) in sync with
//! the event stream:
//!
//! - `connection`: welcome bootstrap, PING/PONG, nick collisions
//! - `channel`: JOIN, PART, KICK, TOPIC, NAMES, MODE
//! - `user`: QUIT, NICK, WHO/WHOX, activity, IRCv3 user notifications
//! - `server`: MYINFO, ISUPPORT, MOTD
//! - `cap`: CAP capability tracking
//!
//! Built-ins never fail. An event too malformed to act on is logged at
//! debug level and otherwise ignored, leaving state untouched.

mod cap;
mod channel;
mod connection;
mod registry;
mod server;
mod user;

pub use registry::{Handler, HandlerId, Registry};

use slirc_proto::command::*;
use slirc_proto::Event;
use tracing::debug;

use crate::config::Config;

/// Install the built-in handlers.
pub(crate) fn register_builtins(registry: &Registry, config: &Config) {
    debug!(tracking = !config.disable_tracking, "Registering built-in handlers");

    // Always needed to stay connected
    registry.register_builtin(RPL_WELCOME, connection::handle_welcome);
    registry.register_builtin(PING, connection::handle_ping);
    registry.register_builtin(PONG, connection::handle_pong);

    if !config.disable_tracking {
        // Anything that adds, removes or renames users
        registry.register_builtin(JOIN, channel::handle_join);
        registry.register_builtin(PART, channel::handle_part);
        registry.register_builtin(KICK, channel::handle_kick);
        registry.register_builtin(QUIT, user::handle_quit);
        registry.register_builtin(NICK, user::handle_nick);
        registry.register_builtin(RPL_NAMREPLY, channel::handle_names);

        registry.register_builtin(MODE, channel::handle_mode);
        registry.register_builtin(RPL_CHANNELMODEIS, channel::handle_mode);

        registry.register_builtin(RPL_WHOREPLY, user::handle_who);
        registry.register_builtin(RPL_WHOSPCRPL, user::handle_who);

        registry.register_builtin(TOPIC, channel::handle_topic);
        registry.register_builtin(RPL_TOPIC, channel::handle_topic);
        registry.register_builtin(RPL_MYINFO, server::handle_myinfo);
        registry.register_builtin(RPL_ISUPPORT, server::handle_isupport);
        registry.register_builtin(RPL_MOTDSTART, server::handle_motd);
        registry.register_builtin(RPL_MOTD, server::handle_motd);

        // Activity tracking
        registry.register_builtin(PRIVMSG, user::update_last_active);
        registry.register_builtin(NOTICE, user::update_last_active);
        registry.register_builtin(TOPIC, user::update_last_active);
        registry.register_builtin(KICK, user::update_last_active);

        // IRCv3
        registry.register_builtin(CAP, cap::handle_cap);
        registry.register_builtin(CHGHOST, user::handle_chghost);
        registry.register_builtin(AWAY, user::handle_away);
        registry.register_builtin(ACCOUNT, user::handle_account);
        registry.register_builtin(ALL_EVENTS, user::handle_account_tag);
    }

    registry.register_builtin(ERR_NICKNAMEINUSE, connection::handle_nick_collision);
    registry.register_builtin(ERR_NICKCOLLISION, connection::handle_nick_collision);
    registry.register_builtin(ERR_UNAVAILRESOURCE, connection::handle_nick_collision);
}

/// Log an event a built-in could not act on.
fn ignore(event: &Event, reason: &'static str) {
    debug!(command = %event.command, reason, "Ignoring event");
}
