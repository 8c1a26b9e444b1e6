//! Identifier Codec Tests
//!
//! Round-trip and backward-compatibility properties of the 128-bit hex codec.

use b3_propagation::propagation::{from_hex, to_hex, Id128};

#[test]
fn test_roundtrip_random_ids() {
    for _ in 0..1000 {
        let id = Id128::new(rand::random::<u64>(), rand::random::<u64>());
        assert_eq!(from_hex(&to_hex(id)).unwrap(), id);
    }
}

#[test]
fn test_roundtrip_edge_ids() {
    for id in [
        Id128::new(0, 0),
        Id128::new(0, 1),
        Id128::new(0, u64::MAX),
        Id128::new(1, 0),
        Id128::new(u64::MAX, 0),
        Id128::new(u64::MAX, u64::MAX),
        Id128::new(0x8000000000000000, 0x8000000000000000),
    ] {
        assert_eq!(from_hex(&to_hex(id)).unwrap(), id, "id {id:?}");
    }
}

#[test]
fn test_64bit_ids_stay_short() {
    for _ in 0..1000 {
        let value = rand::random::<u64>();
        let hex = to_hex(Id128::new(0, value));

        assert!(hex.len() <= 16);
        assert_eq!(hex, format!("{:x}", value));

        let id = from_hex(&hex).unwrap();
        assert_eq!(id.high(), 0);
        assert_eq!(id.low(), value);
    }
}

#[test]
fn test_zero_padded_64bit_id() {
    // Some peers pad 64-bit ids to 32 digits
    let id = from_hex("0000000000000000a2fb4a1d1a96d312").unwrap();
    assert_eq!(id, Id128::new(0, 0xa2fb4a1d1a96d312));
    assert_eq!(to_hex(id), "a2fb4a1d1a96d312");
}

#[test]
fn test_mixed_case_decodes_to_lowercase() {
    let id = from_hex("463AC35C9F6413AD48485A3953BB6124").unwrap();
    assert_eq!(to_hex(id), "463ac35c9f6413ad48485a3953bb6124");
}

#[test]
fn test_serde_as_hex_string() {
    let id = Id128::new(0x1, 0x234567890abcdef1);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"1234567890abcdef1\"");

    let back: Id128 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);

    assert!(serde_json::from_str::<Id128>("\"xyz\"").is_err());
}
