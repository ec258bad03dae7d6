//! The client handle.
//!
//! A [`Client`] owns the session state, the handler registry and the
//! outbound queue. It does no I/O: the transport feeds it lines through
//! [`Client::handle_line`] and drains the receiver returned by
//! [`Client::new`] to write events back to the server.
//!
//! `Client` is a cheap `Arc` handle; clones share one session.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use slirc_proto::command::CLIENT_CONNECTED;
use slirc_proto::Event;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ClientError;
use crate::handlers::{self, Registry};
use crate::state::{Channel, State, User};

struct Inner {
    config: Config,
    state: Mutex<State>,
    handlers: Registry,
    outbound: mpsc::UnboundedSender<Event>,
    /// Cancelled by [`Client::close`]; stops the delayed connect announcement.
    shutdown: CancellationToken,
    connected: AtomicBool,
}

/// Handle to one IRC session.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("server", &self.inner.config.server)
            .field("nick", &self.inner.state.try_lock().map(|s| s.nick().to_owned()))
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client and the receiving end of its outbound queue.
    ///
    /// Built-in handlers are registered according to the configuration.
    pub fn new(config: Config) -> Result<(Self, mpsc::UnboundedReceiver<Event>), ClientError> {
        config.validate()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let handlers = Registry::new();
        handlers::register_builtins(&handlers, &config);

        let state = State::new(&config.nick, config.ident());
        let client = Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(state),
                handlers,
                outbound: tx,
                shutdown: CancellationToken::new(),
                connected: AtomicBool::new(false),
            }),
        };
        Ok((client, rx))
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The handler registry, for registering caller handlers.
    pub fn handlers(&self) -> &Registry {
        &self.inner.handlers
    }

    /// Parse and dispatch one raw line. Returns `false` if the line was not
    /// a valid message and was dropped.
    pub fn handle_line(&self, raw: &str) -> bool {
        match Event::parse(raw) {
            Some(event) => {
                self.dispatch(&event);
                true
            }
            None => {
                debug!(line = raw, "Dropping unparseable line");
                false
            }
        }
    }

    /// Run every handler matching `event`.
    pub fn dispatch(&self, event: &Event) {
        self.inner.handlers.dispatch(self, event);
    }

    /// Queue an event for the transport.
    pub fn send(&self, event: Event) -> Result<(), ClientError> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        self.inner
            .outbound
            .send(event)
            .map_err(|_| ClientError::Closed)
    }

    /// Queue from a built-in; a closed client just drops the event.
    pub(crate) fn queue(&self, event: Event) {
        if let Err(e) = self.send(event) {
            debug!(error = %e, "Dropping outbound event");
        }
    }

    /// End the session: pending connect announcements are cancelled and
    /// further sends fail.
    pub fn close(&self) {
        self.inner.shutdown.cancel();
        self.inner.connected.store(false, Ordering::Release);
        debug!(server = %self.inner.config.server, "Client closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// True once `CLIENT_CONNECTED` has been announced and until `close`.
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock()
    }

    /// Announce `CLIENT_CONNECTED` after the configured grace period, off
    /// the dispatch path. Does nothing if the client is closed first.
    pub(crate) fn schedule_connected(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No tokio runtime; skipping connect announcement");
            return;
        };

        let client = self.clone();
        let token = self.inner.shutdown.clone();
        // deadline counts from the welcome, not from the task's first poll
        let grace = {
            let _guard = runtime.enter();
            tokio::time::sleep(self.inner.config.connect_delay())
        };
        runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Client closed during connect grace period");
                }
                _ = grace => {
                    let server = client.inner.config.server.clone();
                    client.inner.connected.store(true, Ordering::Release);
                    info!(server = %server, nick = %client.nick(), "Connected");
                    client.dispatch(&Event::new(CLIENT_CONNECTED).with_trailing(server));
                }
            }
        });
    }

    // =========================================================================
    // State queries (snapshots taken under the lock)
    // =========================================================================

    pub fn nick(&self) -> String {
        self.state().nick().to_owned()
    }

    pub fn ident(&self) -> String {
        self.state().ident().to_owned()
    }

    pub fn host(&self) -> String {
        self.state().host().to_owned()
    }

    pub fn lookup_user(&self, nick: &str) -> Option<User> {
        self.state().user(nick).cloned()
    }

    pub fn lookup_channel(&self, name: &str) -> Option<Channel> {
        self.state().channel(name).cloned()
    }

    /// Names of the channels the client is in, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<_> = self.state().channels().map(|c| c.name.clone()).collect();
        names.sort();
        names
    }

    /// Nicks of all tracked users, sorted.
    pub fn users(&self) -> Vec<String> {
        let mut nicks: Vec<_> = self.state().users().map(|u| u.nick.clone()).collect();
        nicks.sort();
        nicks
    }

    pub fn is_in_channel(&self, name: &str) -> bool {
        self.state().channel(name).is_some()
    }

    pub fn server_option(&self, key: &str) -> Option<String> {
        self.state().server_option(key).map(str::to_owned)
    }

    pub fn server_options(&self) -> HashMap<String, String> {
        self.state().server_options().clone()
    }

    /// Network name from ISUPPORT `NETWORK`.
    pub fn network_name(&self) -> Option<String> {
        self.server_option("NETWORK")
    }

    /// Server software version from MYINFO.
    pub fn server_version(&self) -> Option<String> {
        self.server_option("VERSION")
    }

    pub fn motd(&self) -> String {
        self.state().motd().to_owned()
    }

    pub fn enabled_caps(&self) -> Vec<String> {
        self.state().enabled_caps().map(str::to_owned).collect()
    }

    pub fn has_capability(&self, cap: &str) -> bool {
        self.state().has_cap(cap)
    }

    /// When the server last answered a PING of ours.
    pub fn last_pong(&self) -> Option<DateTime<Utc>> {
        self.state().last_pong
    }
}
