use conveyor_types::{Command, ParseError};
use proptest::prelude::*;
use std::str::FromStr;

// ── Valid commands ───────────────────────────────────────────────

#[test]
fn parse_add_item() {
    let cmd = Command::parse("addItem('lang', 'rust')").unwrap();
    assert_eq!(
        cmd,
        Command::AddItem {
            key: "lang".into(),
            value: "rust".into(),
        }
    );
}

#[test]
fn parse_add_item_unquoted() {
    let cmd = Command::parse("addItem(lang, rust)").unwrap();
    assert_eq!(
        cmd,
        Command::AddItem {
            key: "lang".into(),
            value: "rust".into(),
        }
    );
}

#[test]
fn parse_delete_item() {
    let cmd = Command::parse("deleteItem('lang')").unwrap();
    assert_eq!(cmd, Command::DeleteItem { key: "lang".into() });
}

#[test]
fn parse_get_item() {
    let cmd = Command::parse("getItem('lang')").unwrap();
    assert_eq!(cmd, Command::GetItem { key: "lang".into() });
}

#[test]
fn parse_get_all_items() {
    assert_eq!(Command::parse("getAllItems()").unwrap(), Command::GetAllItems);
}

#[test]
fn parse_bare_verb_without_parens() {
    // The original extractor accepts a zero-arg verb without a call form.
    assert_eq!(Command::parse("getAllItems").unwrap(), Command::GetAllItems);
}

#[test]
fn parse_tolerates_whitespace() {
    let cmd = Command::parse("addItem(  'a'  ,  '1'  )").unwrap();
    assert_eq!(
        cmd,
        Command::AddItem {
            key: "a".into(),
            value: "1".into(),
        }
    );
}

#[test]
fn parse_drops_empty_trailing_token() {
    let cmd = Command::parse("deleteItem('a',)").unwrap();
    assert_eq!(cmd, Command::DeleteItem { key: "a".into() });
}

#[test]
fn parse_verb_with_leading_whitespace() {
    let cmd = Command::parse("  getItem('a')").unwrap();
    assert_eq!(cmd, Command::GetItem { key: "a".into() });
}

// ── Invalid commands ─────────────────────────────────────────────

#[test]
fn unknown_verb_rejected() {
    let err = Command::parse("dropItem('a')").unwrap_err();
    assert_eq!(err, ParseError::UnknownVerb("dropItem('a')".into()));
}

#[test]
fn empty_input_rejected() {
    assert!(matches!(
        Command::parse(""),
        Err(ParseError::UnknownVerb(_))
    ));
}

#[test]
fn add_item_one_arg_rejected() {
    // Scenario: addItem('a') must fail validation.
    let err = Command::parse("addItem('a')").unwrap_err();
    assert_eq!(
        err,
        ParseError::WrongArity {
            verb: "addItem",
            raw: "addItem('a')".into(),
        }
    );
}

#[test]
fn add_item_three_args_rejected() {
    assert!(matches!(
        Command::parse("addItem('a', '1', '2')"),
        Err(ParseError::WrongArity { verb: "addItem", .. })
    ));
}

#[test]
fn delete_item_zero_args_rejected() {
    assert!(matches!(
        Command::parse("deleteItem()"),
        Err(ParseError::WrongArity { verb: "deleteItem", .. })
    ));
}

#[test]
fn get_item_two_args_rejected() {
    assert!(matches!(
        Command::parse("getItem('a', 'b')"),
        Err(ParseError::WrongArity { verb: "getItem", .. })
    ));
}

#[test]
fn get_all_items_with_args_rejected() {
    assert!(matches!(
        Command::parse("getAllItems('a')"),
        Err(ParseError::WrongArity { verb: "getAllItems", .. })
    ));
}

#[test]
fn error_carries_raw_text() {
    let raw = "addItem('only-one')";
    match Command::parse(raw).unwrap_err() {
        ParseError::WrongArity { raw: carried, .. } => assert_eq!(carried, raw),
        other => panic!("unexpected error: {other:?}"),
    }
}

// ── Accessors, Display, serde ────────────────────────────────────

#[test]
fn verb_accessor() {
    assert_eq!(Command::GetAllItems.verb(), "getAllItems");
    assert_eq!(
        Command::DeleteItem { key: "x".into() }.verb(),
        "deleteItem"
    );
}

#[test]
fn key_accessor() {
    assert_eq!(
        Command::GetItem { key: "x".into() }.key(),
        Some("x")
    );
    assert_eq!(Command::GetAllItems.key(), None);
}

#[test]
fn display_roundtrip() {
    let cmds = [
        Command::AddItem {
            key: "a".into(),
            value: "1".into(),
        },
        Command::DeleteItem { key: "a".into() },
        Command::GetItem { key: "a".into() },
        Command::GetAllItems,
    ];
    for cmd in cmds {
        let rendered = cmd.to_string();
        assert_eq!(Command::parse(&rendered).unwrap(), cmd);
    }
}

#[test]
fn from_str_matches_parse() {
    let cmd = Command::from_str("getItem('a')").unwrap();
    assert_eq!(cmd, Command::parse("getItem('a')").unwrap());
}

#[test]
fn serde_roundtrip() {
    let cmd = Command::AddItem {
        key: "a".into(),
        value: "1".into(),
    };
    let json = serde_json::to_string(&cmd).unwrap();
    let parsed: Command = serde_json::from_str(&json).unwrap();
    assert_eq!(cmd, parsed);
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    /// Any key/value free of the grammar's delimiter characters survives a
    /// render→parse roundtrip.
    #[test]
    fn add_item_roundtrip(key in "[a-zA-Z0-9_.-]{1,24}", value in "[a-zA-Z0-9_.-]{1,24}") {
        let cmd = Command::AddItem { key: key.clone(), value: value.clone() };
        prop_assert_eq!(Command::parse(&cmd.to_string()).unwrap(), cmd);
    }

    /// Arbitrary input never panics the parser.
    #[test]
    fn parse_never_panics(raw in ".{0,64}") {
        let _ = Command::parse(&raw);
    }
}
