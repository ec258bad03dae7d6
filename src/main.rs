//! slirc-replay - feed a recorded IRC session through the client engine.
//!
//! Reads raw server lines from a log file (or stdin), dispatches them
//! through a [`Client`], prints each event that has a human-readable form
//! and the lines the client would have sent back, then summarizes the
//! tracked state.
//!
//! Usage: `slirc-replay [config.toml] [session.log]`

use futures_util::StreamExt;
use slirc_client::proto::command::{ALL_EVENTS, CLIENT_INIT, NICK, USER};
use slirc_client::proto::{Event, MAX_LENGTH, MAX_TAG_LENGTH};
use slirc_client::{Client, Config};
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());
    let log_path = args.next();

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    info!(server = %config.server, nick = %config.nick, "Starting replay");

    let server = config.server.clone();
    let (client, mut outbound) = Client::new(config)?;
    client.handlers().register(ALL_EVENTS, |_: &Client, e: Event| {
        if let Some(line) = e.humanize() {
            println!("{line}");
        }
    });
    client.dispatch(&Event::new(CLIENT_INIT).with_trailing(server));

    // registration a live transport would send first
    let config = client.config();
    println!("-> {}", Event::new(NICK).with_params([config.nick.as_str()]));
    println!(
        "-> {}",
        Event::new(USER)
            .with_params([config.ident(), "0", "*"])
            .with_trailing(config.real_name())
    );

    let input: Box<dyn AsyncRead + Unpin + Send> = match &log_path {
        Some(path) => Box::new(tokio::fs::File::open(path).await.map_err(|e| {
            error!(path = %path, error = %e, "Failed to open session log");
            e
        })?),
        None => Box::new(tokio::io::stdin()),
    };

    // body, tags, and the CRLF the codec leaves on
    let max_line = MAX_LENGTH + MAX_TAG_LENGTH + 3;
    let mut lines = FramedRead::new(input, LinesCodec::new_with_max_length(max_line));

    let (mut read, mut dropped) = (0u64, 0u64);
    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, line = read + 1, "Stopping replay");
                break;
            }
        };
        read += 1;
        if !client.handle_line(&line) {
            dropped += 1;
        }
        while let Ok(event) = outbound.try_recv() {
            println!("-> {event}");
        }
    }

    client.close();
    info!(lines = read, dropped, "Replay finished");
    print_summary(&client);
    Ok(())
}

fn print_summary(client: &Client) {
    println!();
    println!("nick:     {}!{}@{}", client.nick(), client.ident(), client.host());
    if let Some(network) = client.network_name() {
        println!("network:  {network}");
    }
    if let Some(version) = client.server_version() {
        println!("version:  {version}");
    }
    let caps = client.enabled_caps();
    if !caps.is_empty() {
        println!("caps:     {}", caps.join(" "));
    }

    for name in client.channels() {
        let Some(channel) = client.lookup_channel(&name) else {
            continue;
        };
        println!(
            "{} [{}] {} users: {}",
            channel.name,
            channel.modes,
            channel.user_count(),
            channel.topic
        );
    }
}
