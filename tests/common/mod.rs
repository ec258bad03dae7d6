//! Integration test common infrastructure.
//!
//! Provides a scripted session: feed it server lines, then inspect the
//! tracked state and the lines the client queued in response.

#![allow(dead_code)]

use slirc_client::proto::Event;
use slirc_client::{Client, Config};
use tokio::sync::mpsc;

/// A client wired to an in-memory outbound queue.
pub struct TestSession {
    pub client: Client,
    outbound: mpsc::UnboundedReceiver<Event>,
}

impl TestSession {
    /// Session for nick `me` on `irc.example.com`.
    pub fn new() -> Self {
        Self::with_config(Config::new("irc.example.com", "me"))
    }

    pub fn with_config(config: Config) -> Self {
        let (client, outbound) = Client::new(config).expect("valid test config");
        Self { client, outbound }
    }

    /// Dispatch each line, panicking on any the codec rejects.
    pub fn feed(&self, lines: &[&str]) {
        for line in lines {
            assert!(self.client.handle_line(line), "line rejected: {line}");
        }
    }

    /// Register as `me` and join `channel` with the given members.
    pub fn join_with(&mut self, channel: &str, members: &str) {
        let join = format!(":me!ident@my.host JOIN {channel}");
        let names = format!(":srv 353 me = {channel} :{members}");
        self.feed(&[":srv 001 me :Welcome", join.as_str(), names.as_str()]);
        self.drain();
    }

    /// Everything queued so far, rendered.
    pub fn drain(&mut self) -> Vec<String> {
        let mut sent = Vec::new();
        while let Ok(event) = self.outbound.try_recv() {
            sent.push(event.render());
        }
        sent
    }
}
