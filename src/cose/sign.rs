/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Signer / Verifier (C6): ECDSA over the three NIST curves with fixed-width raw `r‖s` signature
//! encoding (§4.6, §6.2). Gated behind the `crypto` feature, which pulls in the RustCrypto
//! `p256`/`p384`/`p521` crates.

#![cfg(feature = "crypto")]

use crate::cose::error::{CoseError, Result};
use crate::cose::iana::{Algorithm, EcCurve, KeyOp};
use crate::cose::key::{CoseKey, EcY};
use p256::ecdsa::signature::{Signer as _, Verifier as _};
#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Produces a verification/signing key on demand: called with `key_op = Verify` during
/// verification and `Sign` during signing (§4.6).
pub trait KeyGetter {
    fn get(&self, key_op: KeyOp, alg: Algorithm, kid: Option<&[u8]>) -> Result<CoseKey>;
}

/// A `KeyGetter` that always returns the same key, ignoring `alg`/`kid`; convenient for the
/// common single-key case.
pub struct SingleKey(pub CoseKey);

impl KeyGetter for SingleKey {
    fn get(&self, _key_op: KeyOp, _alg: Algorithm, _kid: Option<&[u8]>) -> Result<CoseKey> {
        Ok(self.0.clone())
    }
}

fn ec2_private_scalar(key: &CoseKey) -> Result<(&EcCurve, &[u8])> {
    match key {
        CoseKey::Ec2 { crv, d: Some(d), .. } => Ok((crv, d.as_slice())),
        CoseKey::Ec2 { d: None, .. } => Err(CoseError::KeyNotAvailable),
        _ => Err(CoseError::UnsupportedCurve("signing key is not EC2".into())),
    }
}

fn ec2_public_point(key: &CoseKey) -> Result<(&EcCurve, &[u8], &[u8])> {
    match key {
        CoseKey::Ec2 { crv, x, y: Some(EcY::Bytes(y)), .. } => Ok((crv, x.as_slice(), y.as_slice())),
        CoseKey::Ec2 { y: None, .. } | CoseKey::Ec2 { y: Some(EcY::Sign(_)), .. } => {
            Err(CoseError::UnsupportedCurve(
                "compressed EC2 points are not decompressed by this implementation".into(),
            ))
        }
        _ => Err(CoseError::UnsupportedCurve("verification key is not EC2".into())),
    }
}

/// Sign `message` (the already-built `Sig_structure` bytes) with `key`, returning raw `r‖s`.
#[cfg_attr(feature = "trace", trace)]
pub fn sign(message: &[u8], alg: Algorithm, key: &CoseKey) -> Result<Vec<u8>> {
    let (crv, d) = ec2_private_scalar(key)?;
    if Algorithm::for_curve(*crv)? != alg {
        return Err(CoseError::UnsupportedAlgorithm(alg.name().to_string()));
    }
    match crv {
        EcCurve::P256 => {
            let signing_key = p256::ecdsa::SigningKey::from_slice(d)
                .map_err(|_| CoseError::KeyNotAvailable)?;
            let sig: p256::ecdsa::Signature = signing_key.sign(message);
            Ok(sig.to_bytes().to_vec())
        }
        EcCurve::P384 => {
            let signing_key = p384::ecdsa::SigningKey::from_slice(d)
                .map_err(|_| CoseError::KeyNotAvailable)?;
            let sig: p384::ecdsa::Signature = signing_key.sign(message);
            Ok(sig.to_bytes().to_vec())
        }
        EcCurve::P521 => {
            let signing_key = p521::ecdsa::SigningKey::from_slice(d)
                .map_err(|_| CoseError::KeyNotAvailable)?;
            let sig: p521::ecdsa::Signature = signing_key.sign(message);
            Ok(sig.to_bytes().to_vec())
        }
        _ => Err(CoseError::UnsupportedCurve(format!("{:?}", crv))),
    }
}

/// Verify `signature` over `message` (the rebuilt `Sig_structure` bytes) under `key`.
#[cfg_attr(feature = "trace", trace)]
pub fn verify(message: &[u8], alg: Algorithm, key: &CoseKey, signature: &[u8]) -> Result<bool> {
    let (crv, x, y) = ec2_public_point(key)?;
    if Algorithm::for_curve(*crv)? != alg {
        return Err(CoseError::UnsupportedAlgorithm(alg.name().to_string()));
    }
    let verified = match crv {
        EcCurve::P256 => {
            let point = p256::EncodedPoint::from_affine_coordinates(
                p256::FieldBytes::from_slice(x),
                p256::FieldBytes::from_slice(y),
                false,
            );
            let verifying_key = p256::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map_err(|_| CoseError::KeyNotAvailable)?;
            let sig = p256::ecdsa::Signature::from_slice(signature)
                .map_err(|_| CoseError::SignatureInvalid)?;
            verifying_key.verify(message, &sig).is_ok()
        }
        EcCurve::P384 => {
            let point = p384::EncodedPoint::from_affine_coordinates(
                p384::FieldBytes::from_slice(x),
                p384::FieldBytes::from_slice(y),
                false,
            );
            let verifying_key = p384::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map_err(|_| CoseError::KeyNotAvailable)?;
            let sig = p384::ecdsa::Signature::from_slice(signature)
                .map_err(|_| CoseError::SignatureInvalid)?;
            verifying_key.verify(message, &sig).is_ok()
        }
        EcCurve::P521 => {
            let point = p521::EncodedPoint::from_affine_coordinates(
                p521::FieldBytes::from_slice(x),
                p521::FieldBytes::from_slice(y),
                false,
            );
            let verifying_key = p521::ecdsa::VerifyingKey::from_encoded_point(&point)
                .map_err(|_| CoseError::KeyNotAvailable)?;
            let sig = p521::ecdsa::Signature::from_slice(signature)
                .map_err(|_| CoseError::SignatureInvalid)?;
            verifying_key.verify(message, &sig).is_ok()
        }
        _ => return Err(CoseError::UnsupportedCurve(format!("{:?}", crv))),
    };
    Ok(verified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips_and_detects_tampering() {
        let signing_key = p256::ecdsa::SigningKey::random(&mut rand_core::OsRng);
        let verifying_key = p256::ecdsa::VerifyingKey::from(&signing_key);
        let encoded = verifying_key.to_encoded_point(false);
        let key = CoseKey::new_ec2_private(
            EcCurve::P256,
            encoded.x().unwrap().to_vec(),
            encoded.y().unwrap().to_vec(),
            signing_key.to_bytes().to_vec(),
        );

        let message = b"This is the content.";
        let sig = sign(message, Algorithm::Es256, &key).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify(message, Algorithm::Es256, &key, &sig).unwrap());

        let mut tampered = message.to_vec();
        tampered[0] ^= 0x01;
        assert!(!verify(&tampered, Algorithm::Es256, &key, &sig).unwrap());

        let mut tampered_sig = sig.clone();
        tampered_sig[0] ^= 0x01;
        assert!(!verify(message, Algorithm::Es256, &key, &tampered_sig).unwrap());
    }

    #[test]
    fn rfc9052_appendix_c_2_1_vector_verifies() {
        // RFC 9052 C.2.1 example key and COSE_Sign1.
        let x = hex::decode("bac5b11cad8f99f9c72b05cf4b9e26d244dc189f745228255a219a86d6a09eff").unwrap();
        let x = &x[x.len() - 32..];
        let y = hex::decode("20138bf82dc1b6d562be0fa54ab7804a3a64b6d72ccfed6b6fb6ed28bbfc117e").unwrap();
        let y = &y[y.len() - 32..];
        let key = CoseKey::new_ec2_public(EcCurve::P256, x.to_vec(), y.to_vec());

        let cose_sign1_hex = "d28443a10126a1044231315454686973206973207468652063\
6f6e74656e742e58408eb33e4ca31d1c465ab05aac34cc6b23\
d58fef5c083106c4d25a91aef0b0117e2af9a291aa32e14ab8\
34dc56ed2a223444547e01f11d3b0916e5a4c345cacb36";
        let bytes = hex::decode(cose_sign1_hex).unwrap();
        let item = crate::cbor::decode_one(&bytes, &crate::cbor::DecodeOptions::new()).unwrap();
        let msg = crate::cose::message::CoseSign1::from_item(&item).unwrap();
        let payload = msg
            .payload
            .clone()
            .map(crate::cbor::Item::from)
            .unwrap_or(crate::cbor::Item::Null);
        let sig_structure = msg.sig_structure_bytes(&[], &payload);
        assert!(verify(&sig_structure, msg.alg().unwrap(), &key, &msg.signature).unwrap());
    }
}
