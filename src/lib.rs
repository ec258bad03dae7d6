//! slirc-client - Straylight IRC client engine.
//!
//! Turns a stream of raw IRC lines into dispatched events and a tracked
//! model of the session: who the client is, which channels it is in, who is
//! in them and what the server advertised. Bring your own transport; the
//! engine neither opens sockets nor writes to them.
//!
//! ```no_run
//! use slirc_client::{Client, Config};
//! use slirc_client::proto::Event;
//!
//! let (client, mut outbound) = Client::new(Config::new("irc.example.com", "bot")).unwrap();
//! client.handlers().register("PRIVMSG", |_: &Client, e: Event| {
//!     println!("{}", e.trailing);
//! });
//!
//! client.handle_line(":irc.example.com 001 bot :Welcome");
//! client.handle_line(":bot!b@host JOIN #rust");
//! assert!(client.is_in_channel("#rust"));
//!
//! // WHO and MODE probes queued by the JOIN
//! while let Ok(event) = outbound.try_recv() {
//!     println!("-> {event}");
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use slirc_proto as proto;

pub use client::Client;
pub use config::{Config, ConfigError};
pub use error::ClientError;
pub use handlers::{Handler, HandlerId, Registry};
pub use state::{Channel, Perms, State, User};
