use serde_json::json;

use super::*;

fn key(s: &str) -> Upc {
    Upc::parse(s).expect("non-blank")
}

// -----------------------------------------------------------------------
// Upc::parse / normalize_upc
// -----------------------------------------------------------------------

#[test]
fn blank_values_are_absent() {
    assert_eq!(Upc::parse(""), None);
    assert_eq!(Upc::parse("   "), None);
    assert_eq!(normalize_upc(&json!(null)), None);
    assert_eq!(normalize_upc(&json!("\t")), None);
}

#[test]
fn numeric_strings_are_zero_padded_to_twelve() {
    assert_eq!(key("12345").as_str(), "000000012345");
    assert_eq!(key(" 850000123456 ").as_str(), "850000123456");
}

#[test]
fn longer_numeric_codes_are_left_alone() {
    assert_eq!(key("00850000123456").as_str(), "00850000123456");
}

#[test]
fn non_numeric_values_are_trimmed_verbatim() {
    assert_eq!(key("  ABC-123 ").as_str(), "ABC-123");
    assert_eq!(key("12 345").as_str(), "12 345");
}

#[test]
fn numbers_and_strings_meet_at_the_same_key() {
    let from_number = normalize_upc(&json!(850_000_123_456_u64)).unwrap();
    let from_string = normalize_upc(&json!("850000123456")).unwrap();
    assert_eq!(from_number, from_string);

    // A catalog export that lost the leading zeros still matches.
    let lost_zeros = normalize_upc(&json!(12345)).unwrap();
    assert_eq!(lost_zeros, key("000000012345"));
}

#[test]
fn integral_floats_drop_the_fraction() {
    assert_eq!(normalize_upc(&json!(12345.0)).unwrap().as_str(), "000000012345");
}

#[test]
fn fractional_floats_keep_their_text() {
    assert_eq!(normalize_upc(&json!(1.5)).unwrap().as_str(), "1.5");
}

#[test]
fn negative_numbers_are_not_padded() {
    assert_eq!(normalize_upc(&json!(-7)).unwrap().as_str(), "-7");
}

#[test]
fn structured_values_are_not_upcs() {
    assert_eq!(normalize_upc(&json!(true)), None);
    assert_eq!(normalize_upc(&json!(["123"])), None);
    assert_eq!(normalize_upc(&json!({"upc": "123"})), None);
}

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        json!("12345"),
        json!("000000012345"),
        json!(" 850000123456 "),
        json!("ABC-123"),
        json!(12345),
        json!(12345.0),
        json!(1.5),
        json!(-7),
        json!("00850000123456"),
    ];
    for input in inputs {
        let once = normalize_upc(&input).expect("normalizable");
        let twice = normalize_upc(&json!(once.as_str())).expect("still normalizable");
        assert_eq!(once, twice, "not idempotent for {input}");
    }
}

// -----------------------------------------------------------------------
// normalize_available_upcs
// -----------------------------------------------------------------------

#[test]
fn available_upcs_accepts_every_shape() {
    assert!(normalize_available_upcs(&json!(null)).is_empty());
    assert!(normalize_available_upcs(&json!([])).is_empty());
    assert_eq!(
        normalize_available_upcs(&json!(["123", "456"])),
        vec![key("123"), key("456")]
    );
    assert_eq!(
        normalize_available_upcs(&json!("123,456")),
        vec![key("123"), key("456")]
    );
    assert_eq!(normalize_available_upcs(&json!(789)), vec![key("789")]);
}

#[test]
fn available_upcs_drops_blank_entries() {
    assert_eq!(
        normalize_available_upcs(&json!(" 111 , ,222,")),
        vec![key("111"), key("222")]
    );
    assert_eq!(
        normalize_available_upcs(&json!(["", null, "333", false, 444])),
        vec![key("333"), key("444")]
    );
}

#[test]
fn available_upcs_preserves_order_and_duplicates() {
    assert_eq!(
        normalize_available_upcs(&json!(["2", "1", "2"])),
        vec![key("2"), key("1"), key("2")]
    );
}

#[test]
fn available_upcs_ignores_unexpected_shapes() {
    assert!(normalize_available_upcs(&json!(true)).is_empty());
    assert!(normalize_available_upcs(&json!({"a": 1})).is_empty());
    assert!(normalize_available_upcs(&json!("")).is_empty());
}
