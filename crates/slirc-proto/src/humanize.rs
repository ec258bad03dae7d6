//! One-line, human-readable rendering of events.
//!
//! This is presentation only: nothing here affects protocol behavior. It
//! doubles as a filter, since events a typical client would not show (WHO
//! replies, numerics other than the banner ones) render as `None`.
//!
//! | Command | Needs | Rendering |
//! |---|---|---|
//! | `CLIENT_INIT` | - | `[*] connection to <trailing> initialized` |
//! | `CLIENT_CONNECTED` | - | `[*] successfully connected to <trailing>` |
//! | PRIVMSG/NOTICE, no source | params or trailing | `[>] writing <cmd> [<params>]: <text>` |
//! | PRIVMSG/NOTICE, CTCP query | source, 1 param | `[*] CTCP query from <nick>: <CMD> <text>` |
//! | PRIVMSG/NOTICE | source, params | `[<params>] (<nick>) <text>` |
//! | 001 002 003 251 372 375 | source | `[*] <trailing>` |
//! | JOIN | source, params | `[*] <nick> (<host>) has joined <chan>` |
//! | PART | source, params | `[*] <nick> (<host>) has left <chan> (<reason>)` |
//! | ERROR | source | `[*] an error occurred: <trailing>` |
//! | QUIT | source | `[*] <nick> has quit (<reason>)` |
//! | KICK | source, 2 params | `[<chan>] *** <nick> has kicked <target>: <reason>` |
//! | NICK | source, 1 param or trailing | `[*] <nick> is now known as <new>` |
//! | TOPIC | source, params | `[<chan>] *** <nick> has set the topic to: <topic>` |
//! | MODE | source, 3+ params | `[<target>] *** <nick> set modes: <modes>` |
//! | AWAY | source | `[*] <nick> is now away: <msg>` / `is no longer away` |
//! | CHGHOST | source, 2 params | `[*] <nick> has changed their host to <host> (was <old>)` |
//! | ACCOUNT | source, 1 param | `[*] <nick> has authenticated for account: <acct>` / `un-authenticated` |
//! | 332 | source, params, trailing | `[*] topic for <chan> is: <topic>` |
//!
//! Sensitive events and CTCP replies never render.

use crate::command::*;
use crate::ctcp::Ctcp;
use crate::event::Event;

impl Event {
    /// Render this event for display, or `None` if it has no rendering.
    pub fn humanize(&self) -> Option<String> {
        if self.sensitive {
            return None;
        }

        match self.command.as_str() {
            CLIENT_INIT => return Some(format!("[*] connection to {} initialized", self.trailing)),
            CLIENT_CONNECTED => {
                return Some(format!("[*] successfully connected to {}", self.trailing))
            }
            _ => {}
        }

        let Some(source) = &self.source else {
            return self.humanize_outgoing();
        };
        let nick = &source.name;
        let params = &self.params;
        let trailing = &self.trailing;

        let out = match self.command.as_str() {
            PRIVMSG | NOTICE if !params.is_empty() => match Ctcp::decode(self) {
                Some(ctcp) if ctcp.reply => return None,
                Some(ctcp) if ctcp.text.is_empty() => {
                    format!("[*] CTCP query from {nick}: {}", ctcp.command)
                }
                Some(ctcp) => format!("[*] CTCP query from {nick}: {} {}", ctcp.command, ctcp.text),
                None => format!("[{}] ({nick}) {trailing}", params.join(",")),
            },
            RPL_MOTD | RPL_MOTDSTART | RPL_WELCOME | RPL_YOURHOST | RPL_CREATED
            | RPL_LUSERCLIENT => format!("[*] {trailing}"),
            JOIN if !params.is_empty() => {
                format!("[*] {nick} ({}) has joined {}", source.host, params[0])
            }
            PART if !params.is_empty() => format!(
                "[*] {nick} ({}) has left {} ({trailing})",
                source.host, params[0]
            ),
            ERROR => format!("[*] an error occurred: {trailing}"),
            QUIT => format!("[*] {nick} has quit ({trailing})"),
            KICK if params.len() == 2 => format!(
                "[{}] *** {nick} has kicked {}: {trailing}",
                params[0], params[1]
            ),
            NICK if params.len() == 1 => format!("[*] {nick} is now known as {}", params[0]),
            NICK if params.is_empty() && !trailing.is_empty() => {
                format!("[*] {nick} is now known as {trailing}")
            }
            TOPIC if !params.is_empty() => format!(
                "[{}] *** {nick} has set the topic to: {trailing}",
                params[params.len() - 1]
            ),
            MODE if params.len() > 2 => format!(
                "[{}] *** {nick} set modes: {}",
                params[0],
                params[1..].join(" ")
            ),
            AWAY if trailing.is_empty() => format!("[*] {nick} is no longer away"),
            AWAY => format!("[*] {nick} is now away: {trailing}"),
            CHGHOST if params.len() == 2 => format!(
                "[*] {nick} has changed their host to {} (was {})",
                params[1], source.host
            ),
            ACCOUNT if params.len() == 1 && params[0] == "*" => {
                format!("[*] {nick} has become un-authenticated")
            }
            ACCOUNT if params.len() == 1 => {
                format!("[*] {nick} has authenticated for account: {}", params[0])
            }
            RPL_TOPIC if !params.is_empty() && !trailing.is_empty() => format!(
                "[*] topic for {} is: {trailing}",
                params[params.len() - 1]
            ),
            _ => return None,
        };

        Some(out)
    }

    /// Messages we are sending ourselves (no source yet).
    fn humanize_outgoing(&self) -> Option<String> {
        if !self.is_message() {
            return None;
        }

        let command = self.command.to_ascii_lowercase();
        let targets = self.params.join(", ");
        match (self.params.is_empty(), self.trailing.is_empty()) {
            (false, false) => Some(format!("[>] writing {command} [{targets}]: {}", self.trailing)),
            (false, true) => Some(format!("[>] writing {command} [{targets}]")),
            (true, false) => Some(format!("[>] writing {command}: {}", self.trailing)),
            (true, true) => None,
        }
    }
}
