/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! CWT (RFC 8392, C7): the claims-set model and the tag-61 envelope around a `COSE_Sign1`.
//!
//! Decoding tolerates an inner COSE message that is missing its own tag (ISO/IEC 18013-5 devices
//! routinely omit it) - this mirrors the tag-61 handler registered in `crate::cbor::tags`, which
//! accepts either a tagged or a bare-array inner message.

pub mod error;

use crate::cbor::item::{Item, Pair};
use crate::cbor::tags::well_known;
use crate::cbor::{decode_one, encode, CborError, DecodeOptions};
use crate::cose::CoseSign1;
pub use error::{CwtError, Result};
#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

pub mod label {
    pub const ISS: i64 = 1;
    pub const SUB: i64 = 2;
    pub const AUD: i64 = 3;
    pub const EXP: i64 = 4;
    pub const NBF: i64 = 5;
    pub const IAT: i64 = 6;
    pub const CTI: i64 = 7;
    pub const CNF: i64 = 8;
    pub const SCOPE: i64 = 9;
    pub const NONCE: i64 = 10;
}

/// A date-valued claim (`exp`/`nbf`/`iat`): seconds since the epoch, truncated from any
/// fractional part on decode (§4.7).
fn date_from_item(item: &Item) -> Result<i64> {
    match item {
        Item::Float32(v) => date_from_seconds(*v as f64),
        Item::Float64(v) => date_from_seconds(*v),
        other => {
            let v = other.as_i64().ok_or(CwtError::OutOfRange)?;
            if v.unsigned_abs() >= (i64::MAX / 1000) as u64 {
                return Err(CwtError::OutOfRange);
            }
            Ok(v)
        }
    }
}

fn date_from_seconds(v: f64) -> Result<i64> {
    // §8.3: values at or beyond i64::MAX / 1000 are rejected as out of range.
    if !v.is_finite() || v.abs() >= (i64::MAX / 1000) as f64 {
        return Err(CwtError::OutOfRange);
    }
    Ok(v.trunc() as i64)
}

/// An ordered `(label, value)` claims set (§3.5). Duplicate labels are rejected at decode time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimsSet {
    pub entries: Vec<Pair>,
}

impl ClaimsSet {
    pub fn new() -> Self {
        ClaimsSet::default()
    }

    fn label_of(key: &Item) -> Option<i64> {
        key.as_i64()
    }

    pub fn set(&mut self, label: i64, value: Item) -> &mut Self {
        self.entries.retain(|p| Self::label_of(&p.key) != Some(label));
        self.entries.push(Pair::new(Item::from(label), value));
        self
    }

    pub fn get(&self, label: i64) -> Option<&Item> {
        self.entries
            .iter()
            .find(|p| Self::label_of(&p.key) == Some(label))
            .map(|p| &p.value)
    }

    pub fn iss(&self) -> Option<&str> {
        self.get(label::ISS).and_then(Item::as_text)
    }
    pub fn set_iss(&mut self, v: &str) -> &mut Self {
        self.set(label::ISS, Item::from(v))
    }

    pub fn sub(&self) -> Option<&str> {
        self.get(label::SUB).and_then(Item::as_text)
    }
    pub fn set_sub(&mut self, v: &str) -> &mut Self {
        self.set(label::SUB, Item::from(v))
    }

    pub fn aud(&self) -> Option<&str> {
        self.get(label::AUD).and_then(Item::as_text)
    }
    pub fn set_aud(&mut self, v: &str) -> &mut Self {
        self.set(label::AUD, Item::from(v))
    }

    pub fn exp(&self) -> Option<Result<i64>> {
        self.get(label::EXP).map(date_from_item)
    }
    pub fn set_exp(&mut self, seconds: i64) -> &mut Self {
        self.set(label::EXP, Item::from(seconds))
    }

    pub fn nbf(&self) -> Option<Result<i64>> {
        self.get(label::NBF).map(date_from_item)
    }
    pub fn set_nbf(&mut self, seconds: i64) -> &mut Self {
        self.set(label::NBF, Item::from(seconds))
    }

    pub fn iat(&self) -> Option<Result<i64>> {
        self.get(label::IAT).map(date_from_item)
    }
    pub fn set_iat(&mut self, seconds: i64) -> &mut Self {
        self.set(label::IAT, Item::from(seconds))
    }

    pub fn cti(&self) -> Option<&[u8]> {
        self.get(label::CTI).and_then(Item::as_bytes)
    }
    pub fn set_cti(&mut self, v: Vec<u8>) -> &mut Self {
        self.set(label::CTI, Item::from(v))
    }

    pub fn cnf(&self) -> Option<&[Pair]> {
        self.get(label::CNF).and_then(Item::as_map)
    }

    pub fn to_item(&self) -> Item {
        Item::Map(self.entries.clone())
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let pairs = item.as_map().ok_or(CwtError::Cbor(CborError::UnexpectedKind {
            wanted: "claims-set map",
        }))?;
        let mut seen = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if let Some(label) = Self::label_of(&pair.key) {
                if seen.contains(&label) {
                    return Err(CwtError::DuplicateLabel(label));
                }
                seen.push(label);
            }
        }
        Ok(ClaimsSet {
            entries: pairs.clone(),
        })
    }

    pub fn to_vec(&self) -> Vec<u8> {
        encode::to_vec(&self.to_item())
    }
}

/// A CWT: a tag-61 envelope around a signed claims set. Only the `COSE_Sign1` inner message is
/// wired up to a decode/encode helper here, matching the source's "only signatures specified"
/// scope (§1 Non-goals).
#[derive(Debug, Clone, PartialEq)]
pub struct Cwt {
    pub message: CoseSign1,
    pub claims: ClaimsSet,
}

impl Cwt {
    #[cfg_attr(feature = "trace", trace)]
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let item = decode_one(bytes, &DecodeOptions::new())?;
        let inner = item.as_tag(well_known::CWT).unwrap_or(&item);
        let message = CoseSign1::from_item(inner).map_err(|_| CwtError::NotACoseMessage)?;
        let payload = message
            .payload
            .as_ref()
            .ok_or(CwtError::Cbor(CborError::UnexpectedKind {
                wanted: "CWT payload",
            }))?;
        let payload_item = decode_one(payload, &DecodeOptions::new())?;
        let claims = ClaimsSet::from_item(&payload_item)?;
        Ok(Cwt { message, claims })
    }

    #[cfg_attr(feature = "trace", trace)]
    pub fn encode(&self) -> Vec<u8> {
        let wrapped = Item::Tag(well_known::CWT, Box::new(self.message.to_item()));
        encode::to_vec(&wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_claim_label_is_rejected() {
        let item = Item::Map(vec![
            Pair::new(Item::from(label::ISS), Item::from("a")),
            Pair::new(Item::from(label::ISS), Item::from("b")),
        ]);
        assert_eq!(ClaimsSet::from_item(&item), Err(CwtError::DuplicateLabel(1)));
    }

    #[test]
    fn date_claim_out_of_range_is_rejected() {
        let item = Item::UInt64((i64::MAX / 1000) as u64 + 1);
        assert_eq!(date_from_item(&item), Err(CwtError::OutOfRange));
        let huge_float = Item::Float64((i64::MAX / 1000) as f64 * 2.0);
        assert_eq!(date_from_item(&huge_float), Err(CwtError::OutOfRange));
    }

    #[test]
    fn half_integer_date_truncates_fraction() {
        let item = Item::Float64(1443944944.75);
        assert_eq!(date_from_item(&item), Ok(1443944944));
    }

    #[test]
    fn claims_set_round_trips_known_claims() {
        let mut claims = ClaimsSet::new();
        claims
            .set_iss("coap://as.example.com")
            .set_sub("erikw")
            .set_iat(1443944944)
            .set_exp(1444064944)
            .set_cti(vec![0x0b, 0x71]);
        let parsed = ClaimsSet::from_item(&claims.to_item()).unwrap();
        assert_eq!(parsed.iss(), Some("coap://as.example.com"));
        assert_eq!(parsed.sub(), Some("erikw"));
        assert_eq!(parsed.iat().unwrap().unwrap(), 1443944944);
        assert_eq!(parsed.exp().unwrap().unwrap(), 1444064944);
        assert_eq!(parsed.cti(), Some(&[0x0b, 0x71][..]));
    }
}
