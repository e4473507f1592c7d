/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! COSE_Key (§3.4): common parameters plus kty-specific parameter sets. Only EC2 keys are wired
//! up to the signer/verifier (§4.6); the other key types round-trip through CBOR but are not
//! otherwise operated on, matching the source's "model only" scope for RSA/Symmetric/HSS-LMS/
//! WalnutDSA.

use crate::cbor::item::{Item, Pair};
use crate::cbor::CborError;
use crate::cose::error::{CoseError, Result};
use crate::cose::iana::{Algorithm, EcCurve, KeyType};

mod label {
    pub const KTY: i64 = 1;
    pub const KID: i64 = 2;
    pub const ALG: i64 = 3;
    pub const KEY_OPS: i64 = 4;
    pub const BASE_IV: i64 = 5;
    // EC2/OKP
    pub const CRV: i64 = -1;
    pub const X: i64 = -2;
    pub const Y: i64 = -3;
    pub const D: i64 = -4;
    // RSA (a small subset; enough to round-trip a public modulus/exponent)
    pub const RSA_N: i64 = -1;
    pub const RSA_E: i64 = -2;
    // Symmetric
    pub const SYMMETRIC_K: i64 = -1;
}

/// The EC2 `y` coordinate: a byte string, or (per the Open Question in §9) a boolean sign bit
/// for a compressed point. This implementation does not carry point-decompression math, so the
/// boolean form is retained as-is rather than expanded to the full coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum EcY {
    Bytes(Vec<u8>),
    Sign(bool),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommonParams {
    pub kid: Option<Vec<u8>>,
    pub alg: Option<Algorithm>,
    pub key_ops: Vec<i64>,
    pub base_iv: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoseKey {
    Ec2 {
        common: CommonParams,
        crv: EcCurve,
        x: Vec<u8>,
        y: Option<EcY>,
        d: Option<Vec<u8>>,
    },
    Okp {
        common: CommonParams,
        crv: EcCurve,
        x: Vec<u8>,
        d: Option<Vec<u8>>,
    },
    Rsa {
        common: CommonParams,
        n: Vec<u8>,
        e: Vec<u8>,
    },
    Symmetric {
        common: CommonParams,
        k: Vec<u8>,
    },
    HssLms {
        common: CommonParams,
        public_key: Vec<u8>,
    },
    WalnutDsa {
        common: CommonParams,
        public_key: Vec<u8>,
    },
}

impl CoseKey {
    pub fn common(&self) -> &CommonParams {
        match self {
            CoseKey::Ec2 { common, .. }
            | CoseKey::Okp { common, .. }
            | CoseKey::Rsa { common, .. }
            | CoseKey::Symmetric { common, .. }
            | CoseKey::HssLms { common, .. }
            | CoseKey::WalnutDsa { common, .. } => common,
        }
    }

    pub fn kty(&self) -> KeyType {
        match self {
            CoseKey::Ec2 { .. } => KeyType::Ec2,
            CoseKey::Okp { .. } => KeyType::Okp,
            CoseKey::Rsa { .. } => KeyType::Rsa,
            CoseKey::Symmetric { .. } => KeyType::Symmetric,
            CoseKey::HssLms { .. } => KeyType::HssLms,
            CoseKey::WalnutDsa { .. } => KeyType::WalnutDsa,
        }
    }

    /// True iff the private-key field for this key's kty is present (§3.4).
    pub fn is_private(&self) -> bool {
        match self {
            CoseKey::Ec2 { d, .. } | CoseKey::Okp { d, .. } => d.is_some(),
            CoseKey::Symmetric { k, .. } => !k.is_empty(),
            CoseKey::Rsa { .. } | CoseKey::HssLms { .. } | CoseKey::WalnutDsa { .. } => false,
        }
    }

    pub fn new_ec2_public(crv: EcCurve, x: Vec<u8>, y: Vec<u8>) -> Self {
        CoseKey::Ec2 {
            common: CommonParams::default(),
            crv,
            x,
            y: Some(EcY::Bytes(y)),
            d: None,
        }
    }

    pub fn new_ec2_private(crv: EcCurve, x: Vec<u8>, y: Vec<u8>, d: Vec<u8>) -> Self {
        CoseKey::Ec2 {
            common: CommonParams::default(),
            crv,
            x,
            y: Some(EcY::Bytes(y)),
            d: Some(d),
        }
    }

    pub fn to_item(&self) -> Item {
        let mut pairs = Vec::new();
        pairs.push(Pair::new(Item::from(label::KTY), Item::from(self.kty().to_i64())));
        let common = self.common();
        if let Some(kid) = &common.kid {
            pairs.push(Pair::new(Item::from(label::KID), Item::from(kid.clone())));
        }
        if let Some(alg) = common.alg {
            pairs.push(Pair::new(Item::from(label::ALG), Item::from(alg.to_i64())));
        }
        if !common.key_ops.is_empty() {
            pairs.push(Pair::new(
                Item::from(label::KEY_OPS),
                Item::Array(common.key_ops.iter().map(|v| Item::from(*v)).collect()),
            ));
        }
        if let Some(base_iv) = &common.base_iv {
            pairs.push(Pair::new(
                Item::from(label::BASE_IV),
                Item::from(base_iv.clone()),
            ));
        }
        match self {
            CoseKey::Ec2 { crv, x, y, d, .. } => {
                pairs.push(Pair::new(Item::from(label::CRV), Item::from(crv.to_i64())));
                pairs.push(Pair::new(Item::from(label::X), Item::from(x.clone())));
                if let Some(y) = y {
                    let value = match y {
                        EcY::Bytes(b) => Item::from(b.clone()),
                        EcY::Sign(s) => Item::Bool(*s),
                    };
                    pairs.push(Pair::new(Item::from(label::Y), value));
                }
                if let Some(d) = d {
                    pairs.push(Pair::new(Item::from(label::D), Item::from(d.clone())));
                }
            }
            CoseKey::Okp { crv, x, d, .. } => {
                pairs.push(Pair::new(Item::from(label::CRV), Item::from(crv.to_i64())));
                pairs.push(Pair::new(Item::from(label::X), Item::from(x.clone())));
                if let Some(d) = d {
                    pairs.push(Pair::new(Item::from(label::D), Item::from(d.clone())));
                }
            }
            CoseKey::Rsa { n, e, .. } => {
                pairs.push(Pair::new(Item::from(label::RSA_N), Item::from(n.clone())));
                pairs.push(Pair::new(Item::from(label::RSA_E), Item::from(e.clone())));
            }
            CoseKey::Symmetric { k, .. } => {
                pairs.push(Pair::new(
                    Item::from(label::SYMMETRIC_K),
                    Item::from(k.clone()),
                ));
            }
            CoseKey::HssLms { public_key, .. } | CoseKey::WalnutDsa { public_key, .. } => {
                pairs.push(Pair::new(Item::from(-1i64), Item::from(public_key.clone())));
            }
        }
        Item::Map(pairs)
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let pairs = item.as_map().ok_or(CoseError::Cbor(CborError::UnexpectedKind {
            wanted: "COSE_Key map",
        }))?;
        let find = |l: i64| pairs.iter().find(|p| p.key.as_i64() == Some(l)).map(|p| &p.value);

        let kty_v = find(label::KTY)
            .and_then(Item::as_i64)
            .and_then(KeyType::from_i64)
            .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "kty" }))?;

        let mut common = CommonParams::default();
        if let Some(kid) = find(label::KID).and_then(Item::as_bytes) {
            common.kid = Some(kid.to_vec());
        }
        if let Some(alg) = find(label::ALG).and_then(Item::as_i64).and_then(Algorithm::from_i64) {
            common.alg = Some(alg);
        }
        if let Some(Item::Array(ops)) = find(label::KEY_OPS) {
            common.key_ops = ops.iter().filter_map(Item::as_i64).collect();
        }
        if let Some(base_iv) = find(label::BASE_IV).and_then(Item::as_bytes) {
            common.base_iv = Some(base_iv.to_vec());
        }

        Ok(match kty_v {
            KeyType::Ec2 => {
                let crv = find(label::CRV)
                    .and_then(Item::as_i64)
                    .and_then(EcCurve::from_i64)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "crv" }))?;
                let x = find(label::X)
                    .and_then(Item::as_bytes)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "x" }))?
                    .to_vec();
                let y = match find(label::Y) {
                    Some(Item::Bytes(b)) => Some(EcY::Bytes(b.bytes.clone())),
                    Some(Item::Bool(s)) => Some(EcY::Sign(*s)),
                    _ => None,
                };
                let d = find(label::D).and_then(Item::as_bytes).map(|b| b.to_vec());
                CoseKey::Ec2 { common, crv, x, y, d }
            }
            KeyType::Okp => {
                let crv = find(label::CRV)
                    .and_then(Item::as_i64)
                    .and_then(EcCurve::from_i64)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "crv" }))?;
                let x = find(label::X)
                    .and_then(Item::as_bytes)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "x" }))?
                    .to_vec();
                let d = find(label::D).and_then(Item::as_bytes).map(|b| b.to_vec());
                CoseKey::Okp { common, crv, x, d }
            }
            KeyType::Rsa => {
                let n = find(label::RSA_N)
                    .and_then(Item::as_bytes)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "n" }))?
                    .to_vec();
                let e = find(label::RSA_E)
                    .and_then(Item::as_bytes)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "e" }))?
                    .to_vec();
                CoseKey::Rsa { common, n, e }
            }
            KeyType::Symmetric => {
                let k = find(label::SYMMETRIC_K)
                    .and_then(Item::as_bytes)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "k" }))?
                    .to_vec();
                CoseKey::Symmetric { common, k }
            }
            KeyType::HssLms => {
                let public_key = find(-1i64)
                    .and_then(Item::as_bytes)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "pub" }))?
                    .to_vec();
                CoseKey::HssLms { common, public_key }
            }
            KeyType::WalnutDsa => {
                let public_key = find(-1i64)
                    .and_then(Item::as_bytes)
                    .ok_or(CoseError::Cbor(CborError::UnexpectedKind { wanted: "pub" }))?
                    .to_vec();
                CoseKey::WalnutDsa { common, public_key }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ec2_key_round_trips() {
        let key = CoseKey::new_ec2_private(EcCurve::P256, vec![1; 32], vec![2; 32], vec![3; 32]);
        let item = key.to_item();
        let parsed = CoseKey::from_item(&item).unwrap();
        assert_eq!(parsed, key);
        assert!(parsed.is_private());
    }

    #[test]
    fn ec2_y_as_boolean_is_retained() {
        let item = Item::Map(vec![
            Pair::new(Item::from(label::KTY), Item::from(2i64)),
            Pair::new(Item::from(label::CRV), Item::from(1i64)),
            Pair::new(Item::from(label::X), Item::from(vec![1u8; 32])),
            Pair::new(Item::from(label::Y), Item::Bool(true)),
        ]);
        match CoseKey::from_item(&item).unwrap() {
            CoseKey::Ec2 { y: Some(EcY::Sign(true)), .. } => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
