//! Snapshot codec through the public API.

mod common;

use common::deck_with;
use initiative_deck::codec::{is_compressed, strip_legacy, GZIP_MAGIC};
use initiative_deck::{
    deal_round, decode, decode_or_default, encode, CharacterId, DeckConfig, DeckMeta, DeckRng,
    DecodeError, Facing, PoolId, Traits,
};
use serde_json::{json, Value};

fn played_deck() -> initiative_deck::Deck {
    let traits = [
        Traits {
            level_headed: true,
            ..Traits::default()
        },
        Traits {
            on_hold: true,
            ..Traits::default()
        },
        Traits::default(),
    ];
    let config = DeckConfig::default()
        .with_back_style(4)
        .with_scale(1.25)
        .with_show_pool(false);
    let mut deck = deck_with(config, 21, &traits);
    deal_round(&mut deck);
    deck.to_special(PoolId::Draw, 2);
    deck.discard_hand(2);
    deck
}

#[test]
fn test_round_trip_preserves_state() {
    let deck = played_deck();
    let meta = DeckMeta::capture(&deck, 9, "gm");

    let bytes = encode(&meta).unwrap();
    assert_eq!(bytes[..2], GZIP_MAGIC);

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, meta);

    let rebuilt = decoded.into_deck(DeckRng::new(1)).unwrap();
    assert!(rebuilt.is_conserved());
    assert_eq!(rebuilt.config(), deck.config());
    assert_eq!(rebuilt.special_pool().cards(), deck.special_pool().cards());
    assert_eq!(rebuilt.discard_pile().cards(), deck.discard_pile().cards());
    let first = rebuilt.players().get(&CharacterId::new("p0")).unwrap();
    assert!(first.traits.level_headed);
    assert_eq!(first.hand.cards(), deck.players().at(0).unwrap().hand.cards());
}

#[test]
fn test_legacy_fields_are_dropped() {
    let deck = played_deck();
    let mut value = serde_json::to_value(DeckMeta::capture(&deck, 2, "old")).unwrap();
    let map = value.as_object_mut().unwrap();
    map.insert("discard".into(), json!([1, 2, 3]));
    map.insert("pool".into(), json!([]));
    map.insert("drawDeck".into(), json!({ "cards": [] }));
    map.insert("chosenList".into(), json!(["p0"]));
    map.insert("currentPlayer".into(), json!(0));
    map.insert("currentRound".into(), json!(12));

    let decoded = decode(value.to_string().as_bytes()).unwrap();

    assert_eq!(decoded, DeckMeta::capture(&deck, 2, "old"));
}

#[test]
fn test_strip_legacy_ignores_non_objects() {
    let mut value = json!([1, 2, 3]);
    strip_legacy(&mut value);
    assert_eq!(value, json!([1, 2, 3]));
}

#[test]
fn test_uncompressed_snapshot_accepted() {
    let deck = played_deck();
    let plain = serde_json::to_vec(&DeckMeta::capture(&deck, 1, "x")).unwrap();
    assert!(!is_compressed(&plain));

    let rebuilt = decode_or_default(&plain, DeckRng::new(3));

    assert_eq!(rebuilt.players().len(), 3);
    assert!(rebuilt.is_conserved());
}

#[test]
fn test_three_corrupt_bytes_fall_back_to_default() {
    let bytes = [0x00, 0xff, 0x13];
    assert!(matches!(decode(&bytes), Err(DecodeError::Parse(_))));

    let deck = decode_or_default(&bytes, DeckRng::new(1));

    assert_eq!(deck.card_count(), 56);
    assert!(deck.config().use_four_jokers);
    assert_eq!(deck.draw_pile().len(), 56);
    assert!(deck.draw_pile().iter().all(|c| c.facing == Facing::Down));
}

#[test]
fn test_truncated_gzip_falls_back_to_default() {
    let deck = played_deck();
    let bytes = encode(&DeckMeta::capture(&deck, 1, "x")).unwrap();
    let truncated = &bytes[..bytes.len() / 2];

    assert!(decode(truncated).is_err());
    assert_eq!(decode_or_default(truncated, DeckRng::new(1)).draw_pile().len(), 56);
}

#[test]
fn test_wire_shape_is_camel_case() {
    let deck = played_deck();
    let value: Value = serde_json::to_value(DeckMeta::capture(&deck, 1, "x")).unwrap();

    for key in ["revision", "origin", "config", "drawPile", "discardPile", "specialPool", "players"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["config"]["backStyleIndex"], 4);
    assert_eq!(value["config"]["showPool"], false);
}

#[test]
fn test_non_finite_scale_never_breaks_snapshot() {
    let mut deck = played_deck();
    assert!(!deck.set_scale(f32::NAN));

    let decoded = decode(&encode(&DeckMeta::capture(&deck, 1, "x")).unwrap()).unwrap();
    assert_eq!(decoded.config.scale, 1.25);

    // A peer that wrote NaN as null still yields a readable snapshot.
    let mut value = serde_json::to_value(DeckMeta::capture(&deck, 1, "x")).unwrap();
    value["config"]["scale"] = Value::Null;
    let decoded = decode(value.to_string().as_bytes()).unwrap();
    assert_eq!(decoded.config.scale, 1.0);
    assert_eq!(decoded.players.len(), 3);
}
