//! Integration tests for handler registration and dispatch.

mod common;

use common::TestSession;
use parking_lot::Mutex;
use slirc_client::proto::command::ALL_EVENTS;
use slirc_client::proto::Event;
use slirc_client::Client;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, label: &'static str) -> impl Fn(&Client, Event) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |_: &Client, _: Event| log.lock().push(label.to_string())
}

#[test]
fn test_exact_handlers_run_before_wildcards() {
    let s = TestSession::new();
    let log: Log = Arc::default();
    let handlers = s.client.handlers();

    handlers.register(ALL_EVENTS, recorder(&log, "any-1"));
    handlers.register("privmsg", recorder(&log, "privmsg-1"));
    handlers.register(ALL_EVENTS, recorder(&log, "any-2"));
    handlers.register("PRIVMSG", recorder(&log, "privmsg-2"));

    s.feed(&[":bob!b@h PRIVMSG #c :hi"]);
    assert_eq!(*log.lock(), vec!["privmsg-1", "privmsg-2", "any-1", "any-2"]);

    log.lock().clear();
    s.feed(&[":bob!b@h NOTICE #c :hi"]);
    assert_eq!(*log.lock(), vec!["any-1", "any-2"]);
}

#[test]
fn test_handlers_get_independent_copies() {
    let s = TestSession::new();
    let seen: Log = Arc::default();

    s.client.handlers().register("PRIVMSG", |_: &Client, mut e: Event| {
        e.trailing = "tampered".to_string();
        e.params.clear();
    });
    let sink = Arc::clone(&seen);
    s.client.handlers().register("PRIVMSG", move |_: &Client, e: Event| {
        sink.lock().push(format!("{} {}", e.params.join(","), e.trailing));
    });

    s.feed(&[":bob!b@h PRIVMSG #c :original"]);
    assert_eq!(*seen.lock(), vec!["#c original"]);
}

#[test]
fn test_builtins_run_before_caller_handlers() {
    let s = TestSession::new();
    let observed: Log = Arc::default();

    let sink = Arc::clone(&observed);
    s.client.handlers().register("JOIN", move |c: &Client, _: Event| {
        sink.lock().push(c.channels().join(","));
    });

    s.feed(&[":me!ident@my.host JOIN #c"]);
    assert_eq!(*observed.lock(), vec!["#c"]);
}

#[test]
fn test_unregister_caller_handler() {
    let s = TestSession::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let id = s.client.handlers().register("PRIVMSG", move |_: &Client, _: Event| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(id.command(), "PRIVMSG");

    s.feed(&[":bob!b@h PRIVMSG #c :one"]);
    assert!(s.client.handlers().unregister(&id));
    assert!(!s.client.handlers().unregister(&id));
    s.feed(&[":bob!b@h PRIVMSG #c :two"]);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_leaves_builtins() {
    let mut s = TestSession::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    s.client.handlers().register("PING", move |_: &Client, _: Event| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    s.client.handlers().clear("ping");
    assert_eq!(s.client.handlers().count("PING"), 1);

    s.feed(&["PING :still-here"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(s.drain(), vec!["PONG :still-here"]);
}

#[test]
fn test_registration_during_dispatch_applies_next_time() {
    let s = TestSession::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    s.client.handlers().register("PRIVMSG", move |c: &Client, _: Event| {
        let counter = Arc::clone(&counter);
        c.handlers().register("PRIVMSG", move |_: &Client, _: Event| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    });

    s.feed(&[":bob!b@h PRIVMSG #c :one"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    s.feed(&[":bob!b@h PRIVMSG #c :two"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handler_may_query_and_send() {
    let mut s = TestSession::new();
    s.client.handlers().register("PRIVMSG", |c: &Client, e: Event| {
        if e.trailing == "!whoami" {
            let reply = Event::new("PRIVMSG")
                .with_params([e.params[0].as_str()])
                .with_trailing(c.nick());
            c.send(reply).unwrap();
        }
    });

    s.feed(&[":bob!b@h PRIVMSG #c :!whoami"]);
    assert_eq!(s.drain(), vec!["PRIVMSG #c :me"]);
}

#[test]
fn test_dispatch_counts_commands() {
    let s = TestSession::new();
    s.feed(&["PING :a", "PING :b", ":bob!b@h PRIVMSG #c :hi"]);

    let stats = s.client.handlers().dispatch_stats();
    assert_eq!(stats[0], ("PING".to_string(), 2));
    assert!(stats.contains(&("PRIVMSG".to_string(), 1)));
}

#[test]
fn test_pseudo_events_reach_wildcards_once() {
    let s = TestSession::new();
    let log: Log = Arc::default();
    s.client.handlers().register(ALL_EVENTS, recorder(&log, "any"));

    s.client.dispatch(&Event::new(ALL_EVENTS));
    s.client.dispatch(&Event::new("CLIENT_INIT"));
    assert_eq!(*log.lock(), vec!["any", "any"]);
}

#[test]
fn test_unhandled_commands_are_not_counted() {
    let s = TestSession::new();
    for i in 0..1000 {
        let line = format!(":srv X{i} me :junk");
        s.feed(&[line.as_str()]);
    }
    s.feed(&["PING :a"]);

    let stats = s.client.handlers().dispatch_stats();
    assert_eq!(stats, vec![("PING".to_string(), 1)]);
}

#[test]
fn test_constructed_events_match_case_insensitively() {
    let s = TestSession::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    s.client.handlers().register("PRIVMSG", move |_: &Client, _: Event| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    s.client.dispatch(&Event::new("privmsg").with_params(["#c"]).with_trailing("hi"));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
