//! RFC 9052 Appendix C.2.1 COSE_Sign1 verification (spec.md §8.2 scenario 5).

#![cfg(feature = "crypto")]

use cosemdl::cbor::{decode_one, DecodeOptions, Item};
use cosemdl::cose::{verify, CoseKey, CoseSign1, EcCurve};

const COSE_SIGN1_HEX: &str = "d28443a10126a1044231315454686973206973207468652063\
6f6e74656e742e58408eb33e4ca31d1c465ab05aac34cc6b23\
d58fef5c083106c4d25a91aef0b0117e2af9a291aa32e14ab8\
34dc56ed2a223444547e01f11d3b0916e5a4c345cacb36";

fn kid_11_public() -> CoseKey {
    let x = hex::decode("bac5b11cad8f99f9c72b05cf4b9e26d244dc189f745228255a219a86d6a09eff").unwrap();
    let y = hex::decode("20138bf82dc1b6d562be0fa54ab7804a3a64b6d72ccfed6b6fb6ed28bbfc117e").unwrap();
    CoseKey::new_ec2_public(EcCurve::P256, x[x.len() - 32..].to_vec(), y[y.len() - 32..].to_vec())
}

#[test]
fn rfc9052_sample_verifies_under_the_sample_key() {
    let bytes = hex::decode(COSE_SIGN1_HEX).unwrap();
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    let message = CoseSign1::from_item(&item).unwrap();

    assert_eq!(message.kid(), Some(b"11".as_slice()));
    assert_eq!(message.payload.as_deref(), Some(b"This is the content.".as_slice()));

    let payload_item = Item::from(message.payload.clone().unwrap());
    let sig_structure = message.sig_structure_bytes(&[], &payload_item);

    let key = kid_11_public();
    assert!(verify(&sig_structure, message.alg().unwrap(), &key, &message.signature).unwrap());
}

#[test]
fn tampered_payload_fails_verification() {
    let bytes = hex::decode(COSE_SIGN1_HEX).unwrap();
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    let message = CoseSign1::from_item(&item).unwrap();

    let mut tampered_payload = message.payload.clone().unwrap();
    tampered_payload[0] ^= 0x01;
    let payload_item = Item::from(tampered_payload);
    let sig_structure = message.sig_structure_bytes(&[], &payload_item);

    let key = kid_11_public();
    assert!(!verify(&sig_structure, message.alg().unwrap(), &key, &message.signature).unwrap());
}

#[test]
fn round_trips_through_encode_and_decode() {
    let bytes = hex::decode(COSE_SIGN1_HEX).unwrap();
    let item = decode_one(&bytes, &DecodeOptions::new()).unwrap();
    let message = CoseSign1::from_item(&item).unwrap();
    let re_encoded = message.to_vec();
    let reparsed = CoseSign1::from_item(&decode_one(&re_encoded, &DecodeOptions::new()).unwrap()).unwrap();
    assert_eq!(reparsed, message);
}
