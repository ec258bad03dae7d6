//! Command names and numeric replies the client engine cares about.
//!
//! Commands are plain upper-case strings; [`Event::parse`](crate::Event::parse)
//! upper-cases whatever it receives so these compare directly.

#![allow(missing_docs)]

/// Pseudo-command matching every event in a handler registry.
pub const ALL_EVENTS: &str = "*";
/// Emitted by the transport once a connection is opened.
pub const CLIENT_INIT: &str = "CLIENT_INIT";
/// Emitted after registration plus the grace delay; commands may be sent.
pub const CLIENT_CONNECTED: &str = "CLIENT_CONNECTED";

pub const ACCOUNT: &str = "ACCOUNT";
pub const AWAY: &str = "AWAY";
pub const CAP: &str = "CAP";
pub const CHGHOST: &str = "CHGHOST";
pub const ERROR: &str = "ERROR";
pub const JOIN: &str = "JOIN";
pub const KICK: &str = "KICK";
pub const MODE: &str = "MODE";
pub const NICK: &str = "NICK";
pub const NOTICE: &str = "NOTICE";
pub const PART: &str = "PART";
pub const PASS: &str = "PASS";
pub const PING: &str = "PING";
pub const PONG: &str = "PONG";
pub const PRIVMSG: &str = "PRIVMSG";
pub const QUIT: &str = "QUIT";
pub const TOPIC: &str = "TOPIC";
pub const USER: &str = "USER";
pub const WHO: &str = "WHO";

pub const RPL_WELCOME: &str = "001";
pub const RPL_YOURHOST: &str = "002";
pub const RPL_CREATED: &str = "003";
pub const RPL_MYINFO: &str = "004";
/// Also sent as RPL_BOUNCE by some servers; see the ISUPPORT handler.
pub const RPL_ISUPPORT: &str = "005";
pub const RPL_LUSERCLIENT: &str = "251";
pub const RPL_CHANNELMODEIS: &str = "324";
pub const RPL_TOPIC: &str = "332";
pub const RPL_WHOREPLY: &str = "352";
pub const RPL_NAMREPLY: &str = "353";
pub const RPL_WHOSPCRPL: &str = "354";
pub const RPL_MOTD: &str = "372";
pub const RPL_MOTDSTART: &str = "375";
pub const RPL_ENDOFMOTD: &str = "376";
pub const ERR_NICKNAMEINUSE: &str = "433";
pub const ERR_NICKCOLLISION: &str = "436";
pub const ERR_UNAVAILRESOURCE: &str = "437";
