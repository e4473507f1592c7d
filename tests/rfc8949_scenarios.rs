//! RFC 8949 boundary and literal-input scenarios (spec.md §8.2 scenarios 1-4, §8.3 boundary
//! cases).

use cosemdl::cbor::{decode_one, encode, tags, CborError, DecodeOptions, Item};

#[test]
fn scenario_1_integer_100() {
    let bytes = [0x18, 0x64];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    assert_eq!(item, Item::UInt32(100));
    assert_eq!(encode::to_vec(&Item::from(100u32)), vec![0x18, 0x64]);
}

#[test]
fn scenario_2_half_float_negative_0_625() {
    let bytes = [0xf9, 0xb9, 0x00];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    match item {
        Item::Float32(v) => assert_eq!(v, -0.625),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn scenario_3_bignum() {
    let bytes = [
        0xc2, 0x49, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    match item {
        Item::UBig(v) => assert_eq!(v.to_string(), "18446744073709551616"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn negative_magnitude_2_pow_63_does_not_fit_nint64_and_becomes_nbig() {
    // Plain CBOR negative integer whose magnitude m = 2^63 - 1 (major type 1, 8-byte argument
    // 0x7fffffffffffffff): -1 - m = i64::MIN, the largest magnitude that still fits NInt64.
    let bytes = [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    match item {
        Item::NInt64(v) => assert_eq!(v, i64::MIN),
        other => panic!("unexpected {:?}", other),
    }

    // One more: magnitude m = 2^63 (major type 1, 8-byte argument 0x8000000000000000) no longer
    // fits in i64 once adjusted, so it must take the NBig arm instead of silently wrapping.
    let bytes = [0x3b, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    match item {
        Item::NBig(v) => assert_eq!(v.to_string(), "9223372036854775808"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn tag_3_negative_bignum_at_2_pow_63_does_not_fit_nint64_and_becomes_nbig() {
    // tag(3), bstr(8) containing the big-endian magnitude 2^63.
    let bytes = [0xc3, 0x48, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    match item {
        Item::NBig(v) => assert_eq!(v.to_string(), "9223372036854775808"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn scenario_4_tag_32_uri_default_registry() {
    let mut bytes = vec![0xd8, 0x20, 0x76];
    bytes.extend_from_slice(b"http://www.example.com");
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    match item {
        Item::Tag(32, content) => assert_eq!(*content, Item::from("http://www.example.com")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn scenario_4_tag_32_non_uri_text_rejected_by_registered_processor() {
    // A registered URI processor (the default table carries one) rejects content with no
    // scheme separator, rather than silently passing it through.
    let mut bytes = vec![0xd8, 0x20, 0x64];
    bytes.extend_from_slice(b"oops");
    let err = decode_one(&bytes, &DecodeOptions::new()).unwrap_err();
    assert_eq!(err, CborError::TagProcessorFailed(tags::well_known::URI));
}

#[test]
fn boundary_simple_value_24_below_32_is_invalid() {
    let bytes = [0xf8, 0x10];
    let err = decode_one(&bytes, &DecodeOptions::new()).unwrap_err();
    assert!(matches!(err, CborError::InvalidSimpleValue(_)));
}

#[test]
fn boundary_malformed_utf8_text_string() {
    let bytes = [0x62, 0xff, 0xfe];
    let err = decode_one(&bytes, &DecodeOptions::new()).unwrap_err();
    assert!(matches!(err, CborError::MalformedUtf8(_)));
}

#[test]
fn boundary_half_precision_subnormal() {
    let bytes = [0xf9, 0x00, 0x01];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    match item {
        Item::Float32(v) => assert_eq!(v, 2f32.powi(-24)),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn canonical_round_trip_is_stable() {
    let item = Item::Array(vec![
        Item::from(1u8),
        Item::from(-500i32),
        Item::from("hello"),
        Item::from(vec![1u8, 2, 3]),
        Item::Map(vec![]),
    ]);
    let bytes = encode::to_vec(&item);
    let decoded = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    assert_eq!(decoded, item);
    assert_eq!(encode::to_vec(&decoded), bytes);
}

#[test]
fn indefinite_length_array_decodes_and_reencodes_as_definite() {
    // [_ 1, 2, 3]
    let bytes = [0x9f, 0x01, 0x02, 0x03, 0xff];
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    assert_eq!(
        item,
        Item::Array(vec![Item::from(1u8), Item::from(2u8), Item::from(3u8)])
    );
    assert_eq!(encode::to_vec(&item), vec![0x83, 0x01, 0x02, 0x03]);
}

#[test]
fn strict_canonical_rejects_indefinite_length() {
    let bytes = [0x9f, 0x01, 0xff];
    let options = DecodeOptions::new().strict(true);
    let err = decode_one(&bytes, &options).unwrap_err();
    assert!(matches!(err, CborError::NonCanonical(_)));
}
