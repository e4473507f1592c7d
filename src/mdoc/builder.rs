/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! The mdoc issuer-signed builder (C8, §4.8): turns a two-level claim map into a signed
//! `IssuerSigned`, computing digests over tag-24-wrapped `IssuerSignedItem`s and sealing the
//! resulting `MobileSecurityObject` with a `COSE_Sign1`.
//!
//! Gated behind the `mdoc` feature, which pulls in the ECDSA signature stack (via `crypto`) plus
//! `sha2` and `rand` for digesting and salt generation.

#![cfg(feature = "mdoc")]

use crate::cbor::item::Item;
use crate::cose::header::HeaderMap;
use crate::cose::iana::Algorithm;
use crate::cose::key::CoseKey;
use crate::cose::message::CoseSign1;
use crate::cose::sig_structure::{self, Context};
use crate::cose::{self, EcCurve};
use crate::mdoc::error::{MdocError, Result};
use crate::mdoc::model::{
    DeviceKeyInfo, DigestIds, IssuerNameSpaces, IssuerSigned, IssuerSignedItem,
    IssuerSignedItemBytes, MobileSecurityObject, ValidityInfo, ValueDigests,
};
use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

const SALT_LEN: usize = 16;

fn format_iso8601(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn curve_to_algorithm(crv: EcCurve) -> Result<Algorithm> {
    Algorithm::for_curve(crv).map_err(|_| MdocError::UnsupportedCurve)
}

/// Builds an `IssuerSigned` from a claim map, a validity-info triple and an issuer signing key
/// (§4.8). Mirrors the fluent, closure-averse builder style used by the COSE header builders:
/// fields are set one at a time and validated together in [`build`](Self::build).
pub struct IssuerSignedBuilder {
    doc_type: Option<String>,
    claims: Vec<(String, Vec<(String, Item)>)>,
    signed: Option<DateTime<Utc>>,
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
    device_key: Option<CoseKey>,
    issuer_key: Option<CoseKey>,
    certificate_chain: Vec<Vec<u8>>,
}

impl IssuerSignedBuilder {
    pub fn new() -> Self {
        IssuerSignedBuilder {
            doc_type: None,
            claims: Vec::new(),
            signed: None,
            valid_from: None,
            valid_until: None,
            device_key: None,
            issuer_key: None,
            certificate_chain: Vec::new(),
        }
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Add one claim `element_identifier -> element_value` under `namespace`, preserving
    /// insertion order (§5 Ordering).
    pub fn claim(mut self, namespace: impl Into<String>, element_identifier: impl Into<String>, element_value: impl Into<Item>) -> Self {
        let namespace = namespace.into();
        let entry = (element_identifier.into(), element_value.into());
        match self.claims.iter_mut().find(|(ns, _)| *ns == namespace) {
            Some((_, elements)) => elements.push(entry),
            None => self.claims.push((namespace, vec![entry])),
        }
        self
    }

    pub fn validity_info(mut self, signed: DateTime<Utc>, valid_from: DateTime<Utc>, valid_until: DateTime<Utc>) -> Self {
        self.signed = Some(signed);
        self.valid_from = Some(valid_from);
        self.valid_until = Some(valid_until);
        self
    }

    pub fn device_key(mut self, key: CoseKey) -> Self {
        self.device_key = Some(key);
        self
    }

    pub fn issuer_key(mut self, key: CoseKey) -> Self {
        self.issuer_key = Some(key);
        self
    }

    pub fn certificate_chain(mut self, chain: Vec<Vec<u8>>) -> Self {
        self.certificate_chain = chain;
        self
    }

    /// Run the full procedure of §4.8 and return the signed `IssuerSigned`. Every precondition
    /// is checked before any signing attempt, per "Failure" in §4.8.
    #[cfg_attr(feature = "trace", trace)]
    pub fn build(self) -> Result<IssuerSigned> {
        let doc_type = self.doc_type.ok_or(MdocError::MissingDocType)?;
        if self.claims.is_empty() || self.claims.iter().all(|(_, items)| items.is_empty()) {
            return Err(MdocError::NoClaims);
        }
        let issuer_key = self.issuer_key.ok_or(MdocError::MissingIssuerKey)?;
        if self.certificate_chain.is_empty() {
            return Err(MdocError::EmptyCertificateChain);
        }

        let issuer_curve = match &issuer_key {
            CoseKey::Ec2 { crv, .. } => *crv,
            _ => return Err(MdocError::UnsupportedCurve),
        };
        let alg = issuer_key
            .common()
            .alg
            .map(Ok)
            .unwrap_or_else(|| curve_to_algorithm(issuer_curve))?;

        // Steps 1-4: digest-ID assignment, IssuerSignedItemBytes construction, digesting.
        let mut next_digest_id: u64 = 1;
        let mut name_spaces = IssuerNameSpaces::default();
        let mut value_digests = ValueDigests::default();
        let mut rng = rand::thread_rng();

        for (namespace, elements) in self.claims {
            let mut item_bytes_list = Vec::with_capacity(elements.len());
            let mut digest_ids = DigestIds::default();
            for (element_identifier, element_value) in elements {
                let mut random = vec![0u8; SALT_LEN];
                rng.fill_bytes(&mut random);
                let item = IssuerSignedItem {
                    digest_id: next_digest_id,
                    random,
                    element_identifier,
                    element_value,
                };
                next_digest_id += 1;
                let item_bytes = IssuerSignedItemBytes::new(item);
                let digest = Sha256::digest(item_bytes.encode()).to_vec();
                digest_ids.entries.push((item_bytes.item.digest_id, digest));
                item_bytes_list.push(item_bytes);
            }
            value_digests.namespaces.push((namespace.clone(), digest_ids));
            name_spaces.namespaces.push((namespace, item_bytes_list));
        }

        // Step 5: DeviceKeyInfo.
        let device_key_info = self.device_key.map(|device_key| DeviceKeyInfo {
            device_key,
            key_authorizations_namespaces: name_spaces
                .namespaces
                .iter()
                .map(|(ns, _)| ns.clone())
                .collect(),
        });

        // Step 6: MobileSecurityObject.
        let now = Utc::now();
        let validity_info = ValidityInfo {
            signed: format_iso8601(self.signed.unwrap_or(now)),
            valid_from: format_iso8601(self.valid_from.unwrap_or(now)),
            valid_until: format_iso8601(self.valid_until.unwrap_or(now)),
        };
        let mso = MobileSecurityObject {
            version: "1.0".to_string(),
            digest_algorithm: "SHA-256".to_string(),
            value_digests,
            device_key_info,
            doc_type,
            validity_info,
        };

        // Step 7: wrap in tag 24, to be signed as the COSE_Sign1 payload.
        let payload_bytes = mso.to_tagged_bytes();

        // Step 8: protected header carries only alg; unprotected carries x5chain.
        let mut protected = HeaderMap::new();
        protected.set_alg(alg);
        let mut unprotected = HeaderMap::new();
        unprotected.set_x5chain(self.certificate_chain);

        // The Sig_structure's payload slot is the bstr of the content bytes, not the decoded item.
        let payload_as_bstr = Item::from(payload_bytes.clone());
        let sig_structure = sig_structure::build(
            Context::Signature1,
            &protected.to_protected_bytes(),
            None,
            &[],
            &payload_as_bstr,
        );
        let signature = cose::sign(&sig_structure, alg, &issuer_key)?;

        let issuer_auth = CoseSign1 {
            protected,
            unprotected,
            payload: Some(payload_bytes),
            signature,
        };

        Ok(IssuerSigned {
            name_spaces: Some(name_spaces),
            issuer_auth,
        })
    }
}

impl Default for IssuerSignedBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify the mdoc digest invariant (§8.1): for every emitted item, the recorded digest equals
/// `SHA-256(IssuerSignedItemBytes.encode())`.
pub fn check_digest_invariant(issuer_signed: &IssuerSigned, mso: &MobileSecurityObject) -> bool {
    let Some(name_spaces) = &issuer_signed.name_spaces else {
        return true;
    };
    for (namespace, items) in &name_spaces.namespaces {
        for item_bytes in items {
            let expected = Sha256::digest(item_bytes.encode()).to_vec();
            match mso.value_digests.get(namespace, item_bytes.item.digest_id) {
                Some(actual) if actual == expected.as_slice() => continue,
                _ => return false,
            }
        }
    }
    true
}
