/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
//! The CBOR item tree (C3): an owned, algebraic representation of a single CBOR data item.
//!
//! This mirrors the numeric-kind discriminant design used by `tps_minicbor`'s `CBOR` enum, but
//! drops its zero-copy, buffer-borrowing representation in favor of owned values: builders here
//! (COSE signing, mdoc construction) need to assemble trees whose lifetime outlives any single
//! input buffer.

use crate::cbor::bignum::BigUint;
use crate::cbor::error::CborError;
use std::convert::TryFrom;

/// A byte string, optionally annotated with the items obtained by decoding its content as
/// embedded CBOR (RFC 8949 §3.4.5.1, tag 24). The annotation is attached at construction time by
/// whichever tag processor or caller interpreted the bytes; it never affects the wire encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bstr {
    pub bytes: Vec<u8>,
    pub inner: Option<Vec<Item>>,
}

impl Bstr {
    pub fn new(bytes: Vec<u8>) -> Self {
        Bstr { bytes, inner: None }
    }

    pub fn with_inner(bytes: Vec<u8>, inner: Vec<Item>) -> Self {
        Bstr {
            bytes,
            inner: Some(inner),
        }
    }
}

/// A single (key, value) pair within a `Item::Map`, with optional diagnostic comments for the
/// key and/or the value. Comments are metadata: they are never part of the wire encoding and are
/// ignored by `PartialEq` comparisons that originate from decoded input (decoding never sets
/// them).
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: Item,
    pub value: Item,
    pub key_comment: Option<String>,
    pub value_comment: Option<String>,
}

impl Pair {
    pub fn new(key: Item, value: Item) -> Self {
        Pair {
            key,
            value,
            key_comment: None,
            value_comment: None,
        }
    }

    pub fn with_comments(
        key: Item,
        value: Item,
        key_comment: Option<String>,
        value_comment: Option<String>,
    ) -> Self {
        Pair {
            key,
            value,
            key_comment,
            value_comment,
        }
    }
}

/// A single CBOR data item (RFC 8949 §3).
///
/// Integers are split into three size classes per item, following the source's
/// `CBORNumber -> CBORInteger/Long/BigInteger` discriminant: the decoder picks the narrowest
/// class that can hold the decoded value (§4.3); the canonical encoder always emits the
/// shortest *wire* form regardless of which in-memory variant was used to construct the item.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Non-negative value representable in 32 bits.
    UInt32(u32),
    /// Non-negative value representable in 64 bits but not 32.
    UInt64(u64),
    /// Non-negative value too large for 64 bits.
    UBig(BigUint),
    /// Negative value `v` with `-1 - v` representable in 32 bits.
    NInt32(i32),
    /// Negative value `v` with `-1 - v` representable in 64 bits but not 32.
    NInt64(i64),
    /// Negative value whose magnitude `|v + 1|` is too large for 64 bits.
    NBig(BigUint),
    /// A byte string.
    Bytes(Bstr),
    /// A UTF-8 text string.
    Text(String),
    /// An ordered sequence of items.
    Array(Vec<Item>),
    /// An ordered sequence of (key, value) pairs. Keys need not be unique at this layer.
    Map(Vec<Pair>),
    /// A tag number plus its content item.
    Tag(u64, Box<Item>),
    /// A simple value in `[0, 255]`, excluding the ranges reified by `Bool`/`Null`/`Undefined`.
    Simple(u8),
    Bool(bool),
    Null,
    Undefined,
    /// Single-precision float. Half-precision input is always widened to this variant.
    Float32(f32),
    /// Double-precision float.
    Float64(f64),
}

impl Item {
    /// Classify a decoded non-negative value into the narrowest variant (§4.3).
    pub fn from_unsigned_bytes(magnitude: &BigUint) -> Item {
        if let Some(v) = magnitude.to_u64() {
            if v <= i32::MAX as u64 {
                Item::UInt32(v as u32)
            } else {
                Item::UInt64(v)
            }
        } else {
            Item::UBig(magnitude.clone())
        }
    }

    /// Classify a decoded negative value's CBOR-encoded magnitude `m` (representing `-1 - m`)
    /// into the narrowest variant (§4.3).
    pub fn from_negative_magnitude(magnitude: &BigUint) -> Item {
        match magnitude.to_u64() {
            Some(m) if m <= i32::MAX as u64 => Item::NInt32(-1 - m as i32),
            Some(m) if m <= i64::MAX as u64 => Item::NInt64(-1i64 - m as i64),
            Some(_) => Item::NBig(magnitude.clone()),
            None => Item::NBig(magnitude.clone()),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Item::UInt32(_) | Item::UInt64(_) | Item::UBig(_) |
            Item::NInt32(_) | Item::NInt64(_) | Item::NBig(_)
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Item::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Item::Bytes(b) => Some(&b.bytes),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Item]> {
        match self {
            Item::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[Pair]> {
        match self {
            Item::Map(m) => Some(m.as_slice()),
            _ => None,
        }
    }

    /// Unwrap the content of a `Tag` with the given tag number.
    pub fn as_tag(&self, tag: u64) -> Option<&Item> {
        match self {
            Item::Tag(t, inner) if *t == tag => Some(inner),
            _ => None,
        }
    }

    /// Best-effort signed 64-bit view, used by the CWT date-claim and similar integer readers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Item::UInt32(v) => Some(*v as i64),
            Item::UInt64(v) => i64::try_from(*v).ok(),
            Item::NInt32(v) => Some(*v as i64),
            Item::NInt64(v) => Some(*v),
            _ => None,
        }
    }
}

/***************************************************************************************************
 * From<T> for Item - always succeeds
 **************************************************************************************************/

impl From<bool> for Item {
    fn from(v: bool) -> Self {
        Item::Bool(v)
    }
}

macro_rules! from_unsigned {
    ($t:ty) => {
        impl From<$t> for Item {
            fn from(v: $t) -> Self {
                let v = v as u64;
                if v <= i32::MAX as u64 {
                    Item::UInt32(v as u32)
                } else {
                    Item::UInt64(v)
                }
            }
        }
    };
}
from_unsigned!(u8);
from_unsigned!(u16);
from_unsigned!(u32);
from_unsigned!(u64);

macro_rules! from_signed {
    ($t:ty) => {
        impl From<$t> for Item {
            fn from(v: $t) -> Self {
                if v >= 0 {
                    Item::from(v as u64)
                } else {
                    let magnitude = (-1i64 - v as i64) as u64;
                    if magnitude <= i32::MAX as u64 {
                        Item::NInt32(-1 - magnitude as i32)
                    } else {
                        Item::NInt64(-1i64 - magnitude as i64)
                    }
                }
            }
        }
    };
}
from_signed!(i8);
from_signed!(i16);
from_signed!(i32);
from_signed!(i64);

impl From<&str> for Item {
    fn from(v: &str) -> Self {
        Item::Text(v.to_string())
    }
}

impl From<String> for Item {
    fn from(v: String) -> Self {
        Item::Text(v)
    }
}

impl From<&[u8]> for Item {
    fn from(v: &[u8]) -> Self {
        Item::Bytes(Bstr::new(v.to_vec()))
    }
}

impl From<Vec<u8>> for Item {
    fn from(v: Vec<u8>) -> Self {
        Item::Bytes(Bstr::new(v))
    }
}

impl From<f32> for Item {
    fn from(v: f32) -> Self {
        Item::Float32(v)
    }
}

impl From<f64> for Item {
    fn from(v: f64) -> Self {
        Item::Float64(v)
    }
}

/***************************************************************************************************
 * TryFrom<Item> for T - always fallible
 **************************************************************************************************/

impl TryFrom<&Item> for bool {
    type Error = CborError;
    fn try_from(value: &Item) -> Result<Self, Self::Error> {
        match value {
            Item::Bool(v) => Ok(*v),
            _ => Err(CborError::UnexpectedKind { wanted: "bool" }),
        }
    }
}

impl TryFrom<&Item> for u64 {
    type Error = CborError;
    fn try_from(value: &Item) -> Result<Self, Self::Error> {
        match value {
            Item::UInt32(v) => Ok(*v as u64),
            Item::UInt64(v) => Ok(*v),
            _ => Err(CborError::UnexpectedKind { wanted: "uint" }),
        }
    }
}

impl TryFrom<&Item> for u32 {
    type Error = CborError;
    fn try_from(value: &Item) -> Result<Self, Self::Error> {
        match value {
            Item::UInt32(v) => Ok(*v),
            Item::UInt64(v) if *v <= u32::MAX as u64 => Ok(*v as u32),
            Item::UInt64(_) => Err(CborError::OutOfRange),
            _ => Err(CborError::UnexpectedKind { wanted: "uint" }),
        }
    }
}

impl TryFrom<&Item> for i64 {
    type Error = CborError;
    fn try_from(value: &Item) -> Result<Self, Self::Error> {
        value.as_i64().ok_or(CborError::UnexpectedKind { wanted: "integer" })
    }
}

impl<'a> TryFrom<&'a Item> for &'a str {
    type Error = CborError;
    fn try_from(value: &'a Item) -> Result<Self, Self::Error> {
        value.as_text().ok_or(CborError::UnexpectedKind { wanted: "tstr" })
    }
}

impl<'a> TryFrom<&'a Item> for &'a [u8] {
    type Error = CborError;
    fn try_from(value: &'a Item) -> Result<Self, Self::Error> {
        value.as_bytes().ok_or(CborError::UnexpectedKind { wanted: "bstr" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_small_unsigned_as_32_bit() {
        assert_eq!(Item::from(100u32), Item::UInt32(100));
    }

    #[test]
    fn classifies_large_unsigned_as_64_bit() {
        let v = (i32::MAX as u64) + 1;
        assert_eq!(Item::from(v), Item::UInt64(v));
    }

    #[test]
    fn negative_round_trips_through_from() {
        assert_eq!(Item::from(-1i32), Item::NInt32(-1));
        assert_eq!(Item::from(-7i32), Item::NInt32(-7));
    }

    #[test]
    fn bignum_classification_from_magnitude() {
        let magnitude = BigUint::from_be_bytes(&[1, 0, 0, 0, 0, 0, 0, 0, 0]);
        match Item::from_unsigned_bytes(&magnitude) {
            Item::UBig(b) => assert_eq!(b.to_string(), "18446744073709551616"),
            other => panic!("expected UBig, got {:?}", other),
        }
    }
}
