/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Canonical encoder (C3): always emits the shortest-form, definite-length encoding of an
//! [`Item`] tree (RFC 8949 §4.2), regardless of which size-class variant was used to build it.

use crate::cbor::item::{Item, Pair};
use half::f16;
#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Write the initial byte plus minimal-width argument for `major`/`value` (RFC 8949 §3.1).
fn write_head(out: &mut Vec<u8>, major: u8, value: u64) {
    let top = major << 5;
    match value {
        0..=23 => out.push(top | value as u8),
        24..=0xff => {
            out.push(top | 24);
            out.push(value as u8);
        }
        0x100..=0xffff => {
            out.push(top | 25);
            out.extend_from_slice(&(value as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(top | 26);
            out.extend_from_slice(&(value as u32).to_be_bytes());
        }
        _ => {
            out.push(top | 27);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
}

fn write_bignum(out: &mut Vec<u8>, tag: u64, magnitude: &crate::cbor::bignum::BigUint) {
    write_head(out, 6, tag);
    let bytes = magnitude.as_be_bytes();
    write_head(out, 2, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Encode `item` onto `out` using the canonical (shortest, definite-length) form.
pub fn encode_item(out: &mut Vec<u8>, item: &Item) {
    match item {
        Item::UInt32(v) => write_head(out, 0, *v as u64),
        Item::UInt64(v) => write_head(out, 0, *v),
        Item::UBig(v) => write_bignum(out, 2, v),
        Item::NInt32(v) => write_head(out, 1, (-1i64 - *v as i64) as u64),
        Item::NInt64(v) => write_head(out, 1, (-1i64 - *v) as u64),
        Item::NBig(v) => {
            // Stored magnitude already represents `|value + 1|`.
            write_bignum(out, 3, v);
        }
        Item::Bytes(b) => {
            write_head(out, 2, b.bytes.len() as u64);
            out.extend_from_slice(&b.bytes);
        }
        Item::Text(s) => {
            write_head(out, 3, s.len() as u64);
            out.extend_from_slice(s.as_bytes());
        }
        Item::Array(items) => {
            write_head(out, 4, items.len() as u64);
            for i in items {
                encode_item(out, i);
            }
        }
        Item::Map(pairs) => {
            write_head(out, 5, pairs.len() as u64);
            for Pair { key, value, .. } in pairs {
                encode_item(out, key);
                encode_item(out, value);
            }
        }
        Item::Tag(tag, content) => {
            write_head(out, 6, *tag);
            encode_item(out, content);
        }
        Item::Simple(v) => {
            if *v < 32 {
                out.push((7 << 5) | v);
            } else {
                out.push((7 << 5) | 24);
                out.push(*v);
            }
        }
        Item::Bool(false) => out.push((7 << 5) | 20),
        Item::Bool(true) => out.push((7 << 5) | 21),
        Item::Null => out.push((7 << 5) | 22),
        Item::Undefined => out.push((7 << 5) | 23),
        Item::Float32(v) => {
            // Shortest-form float encoding: use half precision when it round-trips exactly,
            // otherwise the full single-precision form. Double precision is reserved for values
            // that do not fit in `f32` at all, so a stored `Float32` never widens on encode.
            let half = f16::from_f32(*v);
            if half.to_f32() == *v || v.is_nan() {
                out.push((7 << 5) | 25);
                out.extend_from_slice(&half.to_be_bytes());
            } else {
                out.push((7 << 5) | 26);
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
        Item::Float64(v) => {
            out.push((7 << 5) | 27);
            out.extend_from_slice(&v.to_be_bytes());
        }
    }
}

/// Encode `item` to a freshly allocated byte vector.
#[cfg_attr(feature = "trace", trace)]
pub fn to_vec(item: &Item) -> Vec<u8> {
    let mut out = Vec::new();
    encode_item(&mut out, item);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbor::bignum::BigUint;
    use crate::cbor::item::Bstr;

    #[test]
    fn encodes_small_uint_in_single_byte() {
        assert_eq!(to_vec(&Item::UInt32(10)), vec![0x0a]);
    }

    #[test]
    fn encodes_uint_100_as_two_bytes() {
        assert_eq!(to_vec(&Item::UInt32(100)), vec![0x18, 0x64]);
    }

    #[test]
    fn encodes_negative_one() {
        assert_eq!(to_vec(&Item::NInt32(-1)), vec![0x20]);
    }

    #[test]
    fn encodes_bignum_as_tag_two() {
        let bytes = [
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let big = BigUint::from_be_bytes(&bytes);
        let encoded = to_vec(&Item::UBig(big));
        assert_eq!(
            encoded,
            vec![0xc2, 0x49, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn encodes_definite_array() {
        let item = Item::Array(vec![Item::UInt32(1), Item::UInt32(2), Item::UInt32(3)]);
        assert_eq!(to_vec(&item), vec![0x83, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn encodes_byte_string() {
        let item = Item::Bytes(Bstr::new(vec![0x01, 0x02]));
        assert_eq!(to_vec(&item), vec![0x42, 0x01, 0x02]);
    }

    #[test]
    fn encodes_half_precision_when_exact() {
        let item = Item::Float32(-0.625);
        assert_eq!(to_vec(&item), vec![0xf9, 0xb9, 0x00]);
    }

    #[test]
    fn encodes_single_precision_when_half_would_lose_precision() {
        let item = Item::Float32(1.1f32);
        let encoded = to_vec(&item);
        assert_eq!(encoded[0], 0xfa);
        assert_eq!(encoded.len(), 5);
    }
}
