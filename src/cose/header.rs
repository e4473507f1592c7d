/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! COSE header maps (§3.2) and the protected-header wire-form rule: a protected header is
//! semantically a map whose wire form is a byte string containing that map's canonical encoding.

use crate::cbor::item::{Item, Pair};
use crate::cbor::{encode, CborError};
use crate::cose::error::{CoseError, Result};
use crate::cose::iana::{header_label, Algorithm};

/// Either header kind. The difference between protected and unprotected is purely about how it
/// is carried on the wire (§3.2); the in-memory shape is the same label→value map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderMap {
    pub entries: Vec<Pair>,
}

impl HeaderMap {
    pub fn new() -> Self {
        HeaderMap::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn label_of(key: &Item) -> Option<i64> {
        key.as_i64()
    }

    pub fn set_int(&mut self, label: i64, value: Item) {
        self.remove(label);
        self.entries.push(Pair::new(Item::from(label as i64), value));
    }

    pub fn remove(&mut self, label: i64) {
        self.entries
            .retain(|p| Self::label_of(&p.key) != Some(label));
    }

    pub fn get(&self, label: i64) -> Option<&Item> {
        self.entries
            .iter()
            .find(|p| Self::label_of(&p.key) == Some(label))
            .map(|p| &p.value)
    }

    pub fn alg(&self) -> Option<Algorithm> {
        match self.get(header_label::ALG)? {
            Item::Text(name) => Algorithm::from_name(name),
            other => other.as_i64().and_then(Algorithm::from_i64),
        }
    }

    pub fn set_alg(&mut self, alg: Algorithm) {
        self.set_int(header_label::ALG, Item::from(alg.to_i64()));
    }

    pub fn kid(&self) -> Option<&[u8]> {
        self.get(header_label::KID).and_then(Item::as_bytes)
    }

    pub fn set_kid(&mut self, kid: Vec<u8>) {
        self.set_int(header_label::KID, Item::from(kid));
    }

    /// `x5chain` (§3.2, RFC 9360 §2): a list of DER certificates, with a single-entry chain
    /// emitted as a bare byte string rather than a one-element array.
    pub fn x5chain(&self) -> Option<Vec<Vec<u8>>> {
        match self.get(header_label::X5CHAIN)? {
            Item::Bytes(b) => Some(vec![b.bytes.clone()]),
            Item::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.as_bytes()?.to_vec());
                }
                Some(out)
            }
            _ => None,
        }
    }

    pub fn set_x5chain(&mut self, chain: Vec<Vec<u8>>) {
        let value = if chain.len() == 1 {
            Item::from(chain.into_iter().next().unwrap())
        } else {
            Item::Array(chain.into_iter().map(Item::from).collect())
        };
        self.set_int(header_label::X5CHAIN, value);
    }

    pub fn to_item(&self) -> Item {
        Item::Map(self.entries.clone())
    }

    /// Parse an unprotected header from its (already decoded) map item, rejecting duplicate
    /// labels (§3.2: "CWT and COSE headers impose uniqueness").
    pub fn from_item(item: &Item) -> Result<Self> {
        let pairs = match item {
            Item::Map(pairs) => pairs,
            _ => {
                return Err(CoseError::Cbor(CborError::UnexpectedKind {
                    wanted: "header map",
                }))
            }
        };
        let mut seen = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if let Some(label) = Self::label_of(&pair.key) {
                if seen.contains(&label) {
                    return Err(CoseError::DuplicateLabel(label));
                }
                seen.push(label);
            }
        }
        Ok(HeaderMap {
            entries: pairs.clone(),
        })
    }

    /// The protected header's wire byte string: empty header → empty byte string (not an encoded
    /// empty map), per §3.2.
    pub fn to_protected_bytes(&self) -> Vec<u8> {
        if self.is_empty() {
            Vec::new()
        } else {
            encode::to_vec(&self.to_item())
        }
    }

    /// Parse a protected header from its wire byte string.
    pub fn from_protected_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(HeaderMap::new());
        }
        let item = crate::cbor::decode_one(bytes, &crate::cbor::DecodeOptions::new())?;
        Self::from_item(&item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_protected_header_is_empty_bytes() {
        let h = HeaderMap::new();
        assert!(h.to_protected_bytes().is_empty());
    }

    #[test]
    fn alg_round_trips_through_protected_bytes() {
        let mut h = HeaderMap::new();
        h.set_alg(Algorithm::Es256);
        let bytes = h.to_protected_bytes();
        let parsed = HeaderMap::from_protected_bytes(&bytes).unwrap();
        assert_eq!(parsed.alg(), Some(Algorithm::Es256));
    }

    #[test]
    fn single_entry_x5chain_is_bare_bstr() {
        let mut h = HeaderMap::new();
        h.set_x5chain(vec![vec![1, 2, 3]]);
        match h.get(header_label::X5CHAIN).unwrap() {
            Item::Bytes(b) => assert_eq!(b.bytes, vec![1, 2, 3]),
            other => panic!("expected bare bstr, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let item = Item::Map(vec![
            Pair::new(Item::from(1i64), Item::from(-7i64)),
            Pair::new(Item::from(1i64), Item::from(-35i64)),
        ]);
        assert_eq!(
            HeaderMap::from_item(&item),
            Err(CoseError::DuplicateLabel(1))
        );
    }
}
