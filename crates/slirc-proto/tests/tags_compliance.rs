//! IRCv3 Message Tag Compliance Tests
//!
//! Escaping, length ceilings and the lossy serialization policy, exercised
//! through whole lines the way a client sees them.

use slirc_proto::{Event, TagError, Tags, MAX_TAG_LENGTH};

// =============================================================================
// Tag Parsing Edge Cases
// =============================================================================

#[test]
fn test_flag_tag_has_empty_value() {
    let e = Event::parse("@flag :server PING :test\r\n").unwrap();
    let tags = e.tags.expect("tags parsed");
    assert_eq!(tags.get("flag").as_deref(), Some(""));
}

#[test]
fn test_only_escape_sequences() {
    let e = Event::parse("@escapes=\\s\\:\\r\\n :server PING :test\r\n").unwrap();
    let tags = e.tags.unwrap();
    assert_eq!(tags.get("escapes").as_deref(), Some(" ;\r\n"));
}

#[test]
fn test_escaped_backslash_before_escape_char() {
    // \\s is an escaped backslash followed by a literal 's'
    let e = Event::parse("@double=\\\\s :server PING :test\r\n").unwrap();
    assert_eq!(e.tags.unwrap().get("double").as_deref(), Some("\\s"));
}

#[test]
fn test_vendor_tags_keep_their_names() {
    let e = Event::parse("@example.com/foo=bar;+client=1 :n!u@h TAGMSG #c").unwrap();
    let tags = e.tags.unwrap();
    assert_eq!(tags.get("example.com/foo").as_deref(), Some("bar"));
    assert_eq!(tags.get("+client").as_deref(), Some("1"));
}

#[test]
fn test_received_values_reserialize_untouched() {
    let raw = "@a=x\\sy;b=\\:\\\\ :n!u@h PRIVMSG #c :hi";
    let e = Event::parse(raw).unwrap();
    assert_eq!(e.render(), raw);
}

// =============================================================================
// Length Ceiling
// =============================================================================

#[test]
fn test_set_fails_past_ceiling_and_keeps_old_state() {
    let mut tags = Tags::new();
    tags.set("first", "1").unwrap();
    let before = tags.clone();

    let err = tags.set("big", &"z".repeat(MAX_TAG_LENGTH)).unwrap_err();
    assert!(matches!(err, TagError::TooLong { limit, .. } if limit == MAX_TAG_LENGTH));
    assert_eq!(tags, before);
}

#[test]
fn test_many_small_tags_hit_the_ceiling() {
    let mut tags = Tags::new();
    let mut accepted = 0;
    for i in 0..200 {
        if tags.set(&format!("k{i:03}"), "v").is_err() {
            break;
        }
        accepted += 1;
    }
    // each "kNNN=v" is 6 octets, plus ';' between entries, plus '@' and ' '
    assert_eq!(accepted, (MAX_TAG_LENGTH - 2 + 1) / 7);

    let mut line = String::new();
    tags.write_segment(&mut line);
    assert!(line.len() <= MAX_TAG_LENGTH);
}

#[test]
fn test_overlong_received_tags_are_truncated_on_output() {
    let raw = format!(
        "@a={};b={} PRIVMSG #c :hi",
        "1".repeat(400),
        "2".repeat(400)
    );
    let e = Event::parse(&raw).unwrap();
    assert_eq!(e.tags.as_ref().unwrap().count(), 2);

    let out = e.render();
    let segment = out.split(' ').next().unwrap();
    assert!(segment.len() + 1 <= MAX_TAG_LENGTH);
    assert!(segment.starts_with("@a="));
    assert!(out.ends_with(" PRIVMSG #c :hi"));
}

#[test]
fn test_invalid_names_rejected_on_set_only() {
    let mut tags = Tags::parse("we ird");
    assert!(tags.contains("we ird"));
    assert_eq!(
        tags.set("we ird", "x"),
        Err(TagError::InvalidTagName("we ird".into()))
    );
}
