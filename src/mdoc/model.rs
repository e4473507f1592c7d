/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! mdoc entities (§3.6, ISO/IEC 18013-5 §8.3.2.1.2.2 and §9.1.2).

use crate::cbor::item::{Bstr, Item, Pair};
use crate::cbor::tags::well_known;
use crate::cbor::{encode, CborError};
use crate::cose::{CoseKey, CoseSign1};
use crate::mdoc::error::{MdocError, Result};

mod label {
    pub const DIGEST_ID: &str = "digestID";
    pub const RANDOM: &str = "random";
    pub const ELEMENT_IDENTIFIER: &str = "elementIdentifier";
    pub const ELEMENT_VALUE: &str = "elementValue";
}

/// `{digestID: uint, random: bstr (>= 16 B), elementIdentifier: tstr, elementValue: any}`.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerSignedItem {
    pub digest_id: u64,
    pub random: Vec<u8>,
    pub element_identifier: String,
    pub element_value: Item,
}

impl IssuerSignedItem {
    pub fn to_item(&self) -> Item {
        Item::Map(vec![
            Pair::new(Item::from(label::DIGEST_ID), Item::from(self.digest_id)),
            Pair::new(Item::from(label::RANDOM), Item::from(self.random.clone())),
            Pair::new(
                Item::from(label::ELEMENT_IDENTIFIER),
                Item::from(self.element_identifier.clone()),
            ),
            Pair::new(Item::from(label::ELEMENT_VALUE), self.element_value.clone()),
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let pairs = item.as_map().ok_or(MdocError::Cbor(CborError::UnexpectedKind {
            wanted: "IssuerSignedItem map",
        }))?;
        let find = |name: &str| {
            pairs
                .iter()
                .find(|p| p.key.as_text() == Some(name))
                .map(|p| &p.value)
        };
        let digest_id = find(label::DIGEST_ID)
            .and_then(Item::as_i64)
            .ok_or(MdocError::Cbor(CborError::UnexpectedKind { wanted: "digestID" }))? as u64;
        let random = find(label::RANDOM)
            .and_then(Item::as_bytes)
            .ok_or(MdocError::Cbor(CborError::UnexpectedKind { wanted: "random" }))?
            .to_vec();
        let element_identifier = find(label::ELEMENT_IDENTIFIER)
            .and_then(Item::as_text)
            .ok_or(MdocError::Cbor(CborError::UnexpectedKind {
                wanted: "elementIdentifier",
            }))?
            .to_string();
        let element_value = find(label::ELEMENT_VALUE)
            .cloned()
            .ok_or(MdocError::Cbor(CborError::UnexpectedKind {
                wanted: "elementValue",
            }))?;
        Ok(IssuerSignedItem {
            digest_id,
            random,
            element_identifier,
            element_value,
        })
    }
}

/// Tag 24 over the canonical encoding of an `IssuerSignedItem`.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerSignedItemBytes {
    pub item: IssuerSignedItem,
    encoded: Vec<u8>,
}

impl IssuerSignedItemBytes {
    pub fn new(item: IssuerSignedItem) -> Self {
        let encoded = encode::to_vec(&item.to_item());
        IssuerSignedItemBytes { item, encoded }
    }

    /// The canonically encoded `IssuerSignedItem` bytes wrapped by this tag-24 item - what
    /// `valueDigests` is actually computed over.
    pub fn encode(&self) -> &[u8] {
        &self.encoded
    }

    pub fn to_item(&self) -> Item {
        Item::Tag(
            well_known::EMBEDDED_CBOR,
            Box::new(Item::Bytes(Bstr::with_inner(
                self.encoded.clone(),
                vec![self.item.to_item()],
            ))),
        )
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        let content = item
            .as_tag(well_known::EMBEDDED_CBOR)
            .ok_or(MdocError::Cbor(CborError::UnexpectedKind {
                wanted: "tag-24 IssuerSignedItemBytes",
            }))?;
        let bytes = content.as_bytes().ok_or(MdocError::Cbor(CborError::UnexpectedKind {
            wanted: "embedded-CBOR bstr",
        }))?;
        let inner = crate::cbor::decode_one(bytes, &crate::cbor::DecodeOptions::new())?;
        let parsed = IssuerSignedItem::from_item(&inner)?;
        Ok(IssuerSignedItemBytes {
            item: parsed,
            encoded: bytes.to_vec(),
        })
    }
}

/// `namespace -> [IssuerSignedItemBytes, ...]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssuerNameSpaces {
    pub namespaces: Vec<(String, Vec<IssuerSignedItemBytes>)>,
}

impl IssuerNameSpaces {
    pub fn to_item(&self) -> Item {
        Item::Map(
            self.namespaces
                .iter()
                .map(|(ns, items)| {
                    Pair::new(
                        Item::from(ns.as_str()),
                        Item::Array(items.iter().map(IssuerSignedItemBytes::to_item).collect()),
                    )
                })
                .collect(),
        )
    }
}

/// `digestID -> digest`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DigestIds {
    pub entries: Vec<(u64, Vec<u8>)>,
}

impl DigestIds {
    pub fn to_item(&self) -> Item {
        Item::Map(
            self.entries
                .iter()
                .map(|(id, digest)| Pair::new(Item::from(*id), Item::from(digest.clone())))
                .collect(),
        )
    }
}

/// `namespace -> DigestIDs`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueDigests {
    pub namespaces: Vec<(String, DigestIds)>,
}

impl ValueDigests {
    pub fn to_item(&self) -> Item {
        Item::Map(
            self.namespaces
                .iter()
                .map(|(ns, ids)| Pair::new(Item::from(ns.as_str()), ids.to_item()))
                .collect(),
        )
    }

    pub fn get(&self, namespace: &str, digest_id: u64) -> Option<&[u8]> {
        self.namespaces
            .iter()
            .find(|(ns, _)| ns == namespace)?
            .1
            .entries
            .iter()
            .find(|(id, _)| *id == digest_id)
            .map(|(_, d)| d.as_slice())
    }
}

/// `KeyAuthorizations.nameSpaces` plus the raw device public key (§4.8 step 5).
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceKeyInfo {
    pub device_key: CoseKey,
    pub key_authorizations_namespaces: Vec<String>,
}

impl DeviceKeyInfo {
    pub fn to_item(&self) -> Item {
        Item::Map(vec![
            Pair::new(Item::from("deviceKey"), self.device_key.to_item()),
            Pair::new(
                Item::from("keyAuthorizations"),
                Item::Map(vec![Pair::new(
                    Item::from("nameSpaces"),
                    Item::Array(
                        self.key_authorizations_namespaces
                            .iter()
                            .map(|ns| Item::from(ns.as_str()))
                            .collect(),
                    ),
                )]),
            ),
        ])
    }
}

/// The three ISO-8601 timestamps governing validity of the MSO (§4.8 step 6): tag-0-wrapped
/// strings with a `Z` suffix and zero fractional seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityInfo {
    pub signed: String,
    pub valid_from: String,
    pub valid_until: String,
}

impl ValidityInfo {
    pub fn to_item(&self) -> Item {
        let wrap = |s: &str| Item::Tag(0, Box::new(Item::from(s)));
        Item::Map(vec![
            Pair::new(Item::from("signed"), wrap(&self.signed)),
            Pair::new(Item::from("validFrom"), wrap(&self.valid_from)),
            Pair::new(Item::from("validUntil"), wrap(&self.valid_until)),
        ])
    }
}

/// `{version, digestAlgorithm, valueDigests, deviceKeyInfo, docType, validityInfo}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileSecurityObject {
    pub version: String,
    pub digest_algorithm: String,
    pub value_digests: ValueDigests,
    pub device_key_info: Option<DeviceKeyInfo>,
    pub doc_type: String,
    pub validity_info: ValidityInfo,
}

impl MobileSecurityObject {
    pub fn to_item(&self) -> Item {
        let mut pairs = vec![
            Pair::new(Item::from("version"), Item::from(self.version.as_str())),
            Pair::new(
                Item::from("digestAlgorithm"),
                Item::from(self.digest_algorithm.as_str()),
            ),
            Pair::new(Item::from("valueDigests"), self.value_digests.to_item()),
        ];
        if let Some(dki) = &self.device_key_info {
            pairs.push(Pair::new(Item::from("deviceKeyInfo"), dki.to_item()));
        }
        pairs.push(Pair::new(Item::from("docType"), Item::from(self.doc_type.as_str())));
        pairs.push(Pair::new(Item::from("validityInfo"), self.validity_info.to_item()));
        Item::Map(pairs)
    }

    /// The tag-24-wrapped `MobileSecurityObjectBytes` this MSO is signed as (§4.8 step 7).
    pub fn to_tagged_bytes(&self) -> Vec<u8> {
        let mso_item = self.to_item();
        let encoded = encode::to_vec(&mso_item);
        let tagged = Item::Tag(
            well_known::EMBEDDED_CBOR,
            Box::new(Item::Bytes(Bstr::with_inner(encoded, vec![mso_item]))),
        );
        encode::to_vec(&tagged)
    }
}

/// `{? nameSpaces, issuerAuth: COSE_Sign1}`, the payload of `issuerAuth` being
/// `MobileSecurityObjectBytes`.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerSigned {
    pub name_spaces: Option<IssuerNameSpaces>,
    pub issuer_auth: CoseSign1,
}

impl IssuerSigned {
    pub fn to_item(&self) -> Item {
        let mut pairs = Vec::new();
        if let Some(ns) = &self.name_spaces {
            pairs.push(Pair::new(Item::from("nameSpaces"), ns.to_item()));
        }
        pairs.push(Pair::new(
            Item::from("issuerAuth"),
            self.issuer_auth.to_array_item(),
        ));
        Item::Map(pairs)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        encode::to_vec(&self.to_item())
    }
}
