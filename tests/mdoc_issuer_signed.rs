//! mdoc issuer-signed builder, end to end (spec.md §8.2 scenario 7, §8.1 digest invariant).

#![cfg(feature = "mdoc")]

use cosemdl::cbor::item::Item;
use cosemdl::cbor::tags::well_known;
use cosemdl::cbor::{decode_one, DecodeOptions};
use cosemdl::cose::{Algorithm, CommonParams, CoseKey, EcCurve};
use cosemdl::mdoc::builder::{check_digest_invariant, IssuerSignedBuilder};
use cosemdl::mdoc::{DigestIds, MobileSecurityObject, ValidityInfo, ValueDigests};

fn issuer_key() -> CoseKey {
    let signing_key = p256::ecdsa::SigningKey::random(&mut rand_core::OsRng);
    let verifying_key = p256::ecdsa::VerifyingKey::from(&signing_key);
    let encoded = verifying_key.to_encoded_point(false);
    CoseKey::new_ec2_private(
        EcCurve::P256,
        encoded.x().unwrap().to_vec(),
        encoded.y().unwrap().to_vec(),
        signing_key.to_bytes().to_vec(),
    )
}

/// Decodes the tag-24-wrapped `MobileSecurityObjectBytes` out of a signed `issuerAuth` payload.
/// The builder only ever produces these bytes; there is no reader-side decoder in this crate, so
/// tests reconstruct just enough of `MobileSecurityObject` to exercise the digest invariant.
fn mso_from_payload(payload: &[u8]) -> MobileSecurityObject {
    let tagged = decode_one(payload, &DecodeOptions::new()).unwrap();
    let inner_bytes = tagged
        .as_tag(well_known::EMBEDDED_CBOR)
        .and_then(Item::as_bytes)
        .unwrap();
    let mso_item = decode_one(inner_bytes, &DecodeOptions::new()).unwrap();
    let pairs = mso_item.as_map().unwrap();
    let find = |name: &str| pairs.iter().find(|p| p.key.as_text() == Some(name)).map(|p| &p.value);

    let version = find("version").and_then(Item::as_text).unwrap().to_string();
    let digest_algorithm = find("digestAlgorithm").and_then(Item::as_text).unwrap().to_string();
    let doc_type = find("docType").and_then(Item::as_text).unwrap().to_string();

    let value_digests_pairs = find("valueDigests").and_then(Item::as_map).unwrap();
    let mut value_digests = ValueDigests::default();
    for ns_pair in value_digests_pairs {
        let namespace = ns_pair.key.as_text().unwrap().to_string();
        let mut digest_ids = DigestIds::default();
        for entry in ns_pair.value.as_map().unwrap() {
            let id = entry.key.as_i64().unwrap() as u64;
            let digest = entry.value.as_bytes().unwrap().to_vec();
            digest_ids.entries.push((id, digest));
        }
        value_digests.namespaces.push((namespace, digest_ids));
    }

    MobileSecurityObject {
        version,
        digest_algorithm,
        value_digests,
        device_key_info: None,
        doc_type,
        validity_info: ValidityInfo {
            signed: String::new(),
            valid_from: String::new(),
            valid_until: String::new(),
        },
    }
}

#[test]
fn builds_a_signed_issuer_signed_with_x5chain_and_matching_digests() {
    let certificate = vec![0x30, 0x82, 0x01, 0x00]; // placeholder DER prefix, opaque to the builder
    let issuer_signed = IssuerSignedBuilder::new()
        .doc_type("com.example.doctype")
        .claim("com.example.namespace1", "claimName1", "claimValue1")
        .issuer_key(issuer_key())
        .certificate_chain(vec![certificate])
        .build()
        .unwrap();

    assert_eq!(issuer_signed.issuer_auth.alg(), Some(Algorithm::Es256));
    let chain = issuer_signed.issuer_auth.unprotected.x5chain().unwrap();
    assert_eq!(chain.len(), 1);

    let name_spaces = issuer_signed.name_spaces.as_ref().unwrap();
    assert_eq!(name_spaces.namespaces.len(), 1);
    let (namespace, items) = &name_spaces.namespaces[0];
    assert_eq!(namespace, "com.example.namespace1");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item.element_identifier, "claimName1");
    assert_eq!(items[0].item.element_value, Item::from("claimValue1"));
    assert_eq!(items[0].item.digest_id, 1);

    let mso = mso_from_payload(issuer_signed.issuer_auth.payload.as_ref().unwrap());
    assert_eq!(mso.doc_type, "com.example.doctype");
    assert_eq!(mso.digest_algorithm, "SHA-256");
    assert!(check_digest_invariant(&issuer_signed, &mso));
}

#[test]
fn digest_invariant_fails_if_an_item_is_tampered_with_after_signing() {
    let issuer_signed = IssuerSignedBuilder::new()
        .doc_type("com.example.doctype")
        .claim("com.example.namespace1", "claimName1", "claimValue1")
        .issuer_key(issuer_key())
        .certificate_chain(vec![vec![0x30, 0x82, 0x01, 0x00]])
        .build()
        .unwrap();

    let mso = mso_from_payload(issuer_signed.issuer_auth.payload.as_ref().unwrap());

    let mut tampered = issuer_signed.clone();
    {
        let (_, items) = &mut tampered.name_spaces.as_mut().unwrap().namespaces[0];
        items[0].item.element_value = Item::from("tampered");
    }
    assert!(!check_digest_invariant(&tampered, &mso));
}

#[test]
fn multiple_claims_across_namespaces_get_monotonic_digest_ids() {
    let issuer_signed = IssuerSignedBuilder::new()
        .doc_type("com.example.doctype")
        .claim("com.example.namespace1", "claimName1", "claimValue1")
        .claim("com.example.namespace1", "claimName2", "claimValue2")
        .claim("com.example.namespace2", "claimName3", "claimValue3")
        .issuer_key(issuer_key())
        .certificate_chain(vec![vec![0x30, 0x82, 0x01, 0x00]])
        .build()
        .unwrap();

    let name_spaces = issuer_signed.name_spaces.as_ref().unwrap();
    let all_ids: Vec<u64> = name_spaces
        .namespaces
        .iter()
        .flat_map(|(_, items)| items.iter().map(|i| i.item.digest_id))
        .collect();
    assert_eq!(all_ids, vec![1, 2, 3]);

    let mso = mso_from_payload(issuer_signed.issuer_auth.payload.as_ref().unwrap());
    assert!(check_digest_invariant(&issuer_signed, &mso));
}

#[test]
fn build_fails_without_claims() {
    let err = IssuerSignedBuilder::new()
        .doc_type("com.example.doctype")
        .issuer_key(issuer_key())
        .certificate_chain(vec![vec![0x01]])
        .build()
        .unwrap_err();
    assert_eq!(err, cosemdl::mdoc::MdocError::NoClaims);
}

#[test]
fn build_fails_without_certificate_chain() {
    let err = IssuerSignedBuilder::new()
        .doc_type("com.example.doctype")
        .claim("com.example.namespace1", "claimName1", "claimValue1")
        .issuer_key(issuer_key())
        .build()
        .unwrap_err();
    assert_eq!(err, cosemdl::mdoc::MdocError::EmptyCertificateChain);
}

#[test]
fn build_fails_without_doc_type() {
    let err = IssuerSignedBuilder::new()
        .claim("com.example.namespace1", "claimName1", "claimValue1")
        .issuer_key(issuer_key())
        .certificate_chain(vec![vec![0x30, 0x82, 0x01, 0x00]])
        .build()
        .unwrap_err();
    assert_eq!(err, cosemdl::mdoc::MdocError::MissingDocType);
}

#[test]
fn build_fails_without_issuer_key() {
    let err = IssuerSignedBuilder::new()
        .doc_type("com.example.doctype")
        .claim("com.example.namespace1", "claimName1", "claimValue1")
        .certificate_chain(vec![vec![0x30, 0x82, 0x01, 0x00]])
        .build()
        .unwrap_err();
    assert_eq!(err, cosemdl::mdoc::MdocError::MissingIssuerKey);
}

#[test]
fn build_fails_with_unsupported_curve() {
    // A non-EC2 key (e.g. a symmetric key) is not something §4.8 can sign with.
    let symmetric_key = CoseKey::Symmetric {
        common: CommonParams::default(),
        k: vec![0x01; 32],
    };
    let err = IssuerSignedBuilder::new()
        .doc_type("com.example.doctype")
        .claim("com.example.namespace1", "claimName1", "claimValue1")
        .issuer_key(symmetric_key)
        .certificate_chain(vec![vec![0x30, 0x82, 0x01, 0x00]])
        .build()
        .unwrap_err();
    assert_eq!(err, cosemdl::mdoc::MdocError::UnsupportedCurve);
}
