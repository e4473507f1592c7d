/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! The six COSE message structural classes (§3.3, §4.5, §9 "COSE message as specialization").
//! Each wraps a CBOR array item and enforces its arity rather than subclassing `Array`; each
//! exposes `to_array_item()`/`to_item()` for encoding and `from_item()` for build-from-CBOR.

use crate::cbor::item::Item;
use crate::cbor::tags::well_known;
use crate::cbor::{encode, CborError};
use crate::cose::error::{CoseError, Result};
use crate::cose::header::HeaderMap;
use crate::cose::iana::Algorithm;
use crate::cose::sig_structure::{self, Context};

fn payload_item(payload: &Option<Vec<u8>>) -> Item {
    match payload {
        Some(bytes) => Item::from(bytes.clone()),
        None => Item::Null,
    }
}

fn payload_from_item(item: &Item) -> Result<Option<Vec<u8>>> {
    match item {
        Item::Null => Ok(None),
        Item::Bytes(b) => Ok(Some(b.bytes.clone())),
        _ => Err(CoseError::Cbor(CborError::UnexpectedKind {
            wanted: "payload bstr or null",
        })),
    }
}

fn split_headers(protected_bytes: &[u8], unprotected: &Item) -> Result<(HeaderMap, HeaderMap)> {
    Ok((
        HeaderMap::from_protected_bytes(protected_bytes)?,
        HeaderMap::from_item(unprotected)?,
    ))
}

fn require_array<'a>(item: &'a Item, min: usize, max: usize) -> Result<&'a [Item]> {
    match item.as_array() {
        Some(items) if items.len() >= min && items.len() <= max => Ok(items),
        _ => Err(CoseError::Cbor(CborError::UnexpectedKind {
            wanted: "COSE message array",
        })),
    }
}

fn protected_bytes_of(item: &Item) -> Result<Vec<u8>> {
    item.as_bytes()
        .map(|b| b.to_vec())
        .ok_or(CoseError::Cbor(CborError::UnexpectedKind {
            wanted: "protected header bstr",
        }))
}

/// `COSE_Sign1`: `[protected, unprotected, payload, signature]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoseSign1 {
    pub protected: HeaderMap,
    pub unprotected: HeaderMap,
    pub payload: Option<Vec<u8>>,
    pub signature: Vec<u8>,
}

impl CoseSign1 {
    /// The `Sig_structure` bytes for this message, given the `external_aad` used at sign time.
    pub fn sig_structure_bytes(&self, external_aad: &[u8], payload_item: &Item) -> Vec<u8> {
        sig_structure::build(
            Context::Signature1,
            &self.protected.to_protected_bytes(),
            None,
            external_aad,
            payload_item,
        )
    }

    pub fn to_array_item(&self) -> Item {
        Item::Array(vec![
            Item::from(self.protected.to_protected_bytes()),
            self.unprotected.to_item(),
            payload_item(&self.payload),
            Item::from(self.signature.clone()),
        ])
    }

    pub fn to_item(&self) -> Item {
        Item::Tag(well_known::COSE_SIGN1, Box::new(self.to_array_item()))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        encode::to_vec(&self.to_item())
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let array_item = item.as_tag(well_known::COSE_SIGN1).unwrap_or(item);
        let items = require_array(array_item, 4, 4)?;
        let (protected, unprotected) = split_headers(&protected_bytes_of(&items[0])?, &items[1])?;
        let payload = payload_from_item(&items[2])?;
        let signature = items[3]
            .as_bytes()
            .ok_or(CoseError::Cbor(CborError::UnexpectedKind {
                wanted: "signature bstr",
            }))?
            .to_vec();
        Ok(CoseSign1 {
            protected,
            unprotected,
            payload,
            signature,
        })
    }

    pub fn alg(&self) -> Option<Algorithm> {
        self.protected.alg().or_else(|| self.unprotected.alg())
    }

    pub fn kid(&self) -> Option<&[u8]> {
        self.protected.kid().or_else(|| self.unprotected.kid())
    }
}

/// A single entry of a `COSE_Sign` message's signer array: `[protected, unprotected, signature]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoseSignature {
    pub protected: HeaderMap,
    pub unprotected: HeaderMap,
    pub signature: Vec<u8>,
}

impl CoseSignature {
    pub fn to_item(&self) -> Item {
        Item::Array(vec![
            Item::from(self.protected.to_protected_bytes()),
            self.unprotected.to_item(),
            Item::from(self.signature.clone()),
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let items = require_array(item, 3, 3)?;
        let (protected, unprotected) = split_headers(&protected_bytes_of(&items[0])?, &items[1])?;
        let signature = items[2]
            .as_bytes()
            .ok_or(CoseError::Cbor(CborError::UnexpectedKind {
                wanted: "signature bstr",
            }))?
            .to_vec();
        Ok(CoseSignature {
            protected,
            unprotected,
            signature,
        })
    }

    pub fn alg(&self) -> Option<Algorithm> {
        self.protected.alg().or_else(|| self.unprotected.alg())
    }

    pub fn kid(&self) -> Option<&[u8]> {
        self.protected.kid().or_else(|| self.unprotected.kid())
    }
}

/// `COSE_Sign`: `[protected, unprotected, payload, [+ COSE_Signature]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoseSign {
    pub protected: HeaderMap,
    pub unprotected: HeaderMap,
    pub payload: Option<Vec<u8>>,
    pub signatures: Vec<CoseSignature>,
}

impl CoseSign {
    pub fn sig_structure_bytes(
        &self,
        signer: &CoseSignature,
        external_aad: &[u8],
        payload_item: &Item,
    ) -> Vec<u8> {
        sig_structure::build(
            Context::Signature,
            &self.protected.to_protected_bytes(),
            Some(&signer.protected.to_protected_bytes()),
            external_aad,
            payload_item,
        )
    }

    pub fn to_array_item(&self) -> Item {
        Item::Array(vec![
            Item::from(self.protected.to_protected_bytes()),
            self.unprotected.to_item(),
            payload_item(&self.payload),
            Item::Array(self.signatures.iter().map(CoseSignature::to_item).collect()),
        ])
    }

    pub fn to_item(&self) -> Item {
        Item::Tag(well_known::COSE_SIGN, Box::new(self.to_array_item()))
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let array_item = item.as_tag(well_known::COSE_SIGN).unwrap_or(item);
        let items = require_array(array_item, 4, 4)?;
        let (protected, unprotected) = split_headers(&protected_bytes_of(&items[0])?, &items[1])?;
        let payload = payload_from_item(&items[2])?;
        let signer_items = items[3]
            .as_array()
            .ok_or(CoseError::Cbor(CborError::UnexpectedKind {
                wanted: "signature array",
            }))?;
        let signatures = signer_items
            .iter()
            .map(CoseSignature::from_item)
            .collect::<Result<Vec<_>>>()?;
        Ok(CoseSign {
            protected,
            unprotected,
            payload,
            signatures,
        })
    }
}

macro_rules! structural_message {
    ($name:ident, $tag:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub protected: HeaderMap,
            pub unprotected: HeaderMap,
            pub body: Item,
        }

        impl $name {
            pub fn to_array_item(&self) -> Item {
                Item::Array(vec![
                    Item::from(self.protected.to_protected_bytes()),
                    self.unprotected.to_item(),
                    self.body.clone(),
                ])
            }

            pub fn to_item(&self) -> Item {
                Item::Tag($tag, Box::new(self.to_array_item()))
            }

            pub fn from_item(item: &Item) -> Result<Self> {
                let array_item = item.as_tag($tag).unwrap_or(item);
                let items = require_array(array_item, 3, 4)?;
                let (protected, unprotected) =
                    split_headers(&protected_bytes_of(&items[0])?, &items[1])?;
                Ok($name {
                    protected,
                    unprotected,
                    body: items[2].clone(),
                })
            }
        }
    };
}

// Structural-only: no encryption or MAC algorithms are implemented (§1 Non-goals), but the
// message shapes still round-trip through CBOR so the key/header model can be exercised end to
// end against messages that carry them.
structural_message!(CoseEncrypt0, well_known::COSE_ENCRYPT0, "`COSE_Encrypt0`: `[protected, unprotected, ciphertext]`.");
structural_message!(CoseEncrypt, well_known::COSE_ENCRYPT, "`COSE_Encrypt`: `[protected, unprotected, ciphertext, recipients]`.");
structural_message!(CoseMac0, well_known::COSE_MAC0, "`COSE_Mac0`: `[protected, unprotected, payload, tag]`.");
structural_message!(CoseMac, well_known::COSE_MAC, "`COSE_Mac`: `[protected, unprotected, payload, recipients]`.");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbor::item::Bstr;

    fn sample_sign1() -> CoseSign1 {
        let mut protected = HeaderMap::new();
        protected.set_alg(Algorithm::Es256);
        let mut unprotected = HeaderMap::new();
        unprotected.set_kid(b"11".to_vec());
        CoseSign1 {
            protected,
            unprotected,
            payload: Some(b"This is the content.".to_vec()),
            signature: vec![0u8; 64],
        }
    }

    #[test]
    fn sign1_round_trips_through_item() {
        let msg = sample_sign1();
        let item = msg.to_item();
        let parsed = CoseSign1::from_item(&item).unwrap();
        assert_eq!(parsed, msg);
        assert_eq!(parsed.alg(), Some(Algorithm::Es256));
    }

    #[test]
    fn sign1_accepts_untagged_array_too() {
        let msg = sample_sign1();
        let parsed = CoseSign1::from_item(&msg.to_array_item()).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn sign1_null_payload_round_trips() {
        let mut msg = sample_sign1();
        msg.payload = None;
        let parsed = CoseSign1::from_item(&msg.to_item()).unwrap();
        assert_eq!(parsed.payload, None);
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let item = Item::Array(vec![Item::from(vec![1u8]), Item::Map(vec![])]);
        assert!(CoseSign1::from_item(&item).is_err());
    }

    #[test]
    fn encrypt0_round_trips_structurally() {
        let mut protected = HeaderMap::new();
        protected.set_alg(Algorithm::Es256);
        let msg = CoseEncrypt0 {
            protected,
            unprotected: HeaderMap::new(),
            body: Item::Bytes(Bstr::new(vec![1, 2, 3])),
        };
        let parsed = CoseEncrypt0::from_item(&msg.to_item()).unwrap();
        assert_eq!(parsed, msg);
    }
}
