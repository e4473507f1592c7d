/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! `Sig_structure` construction (§4.5, RFC 9052 §4.4): the canonical byte sequence that is
//! actually hashed and signed/verified.

use crate::cbor::encode;
use crate::cbor::item::Item;

/// The signature context: which COSE message kind is being signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// `COSE_Sign`, one `COSE_Signature` per signer.
    Signature,
    /// `COSE_Sign1`, the single embedded signature.
    Signature1,
}

impl Context {
    fn label(self) -> &'static str {
        match self {
            Context::Signature => "Signature",
            Context::Signature1 => "Signature1",
        }
    }
}

/// Build the canonical `Sig_structure` bytes.
///
/// `sign_protected` is the signer's own protected header (only present for `COSE_Sign`'s
/// per-signature headers; absent for `COSE_Sign1`, per §4.5). `payload` may be the raw payload
/// byte string or a tagged item (ISO/IEC 18013-5 ties payload to `MobileSecurityObjectBytes`,
/// itself a tag-24 item, rather than a plain byte string).
pub fn build(
    context: Context,
    body_protected: &[u8],
    sign_protected: Option<&[u8]>,
    external_aad: &[u8],
    payload: &Item,
) -> Vec<u8> {
    let mut array = vec![
        Item::from(context.label()),
        Item::from(body_protected.to_vec()),
    ];
    if let Some(sign_protected) = sign_protected {
        array.push(Item::from(sign_protected.to_vec()));
    }
    array.push(Item::from(external_aad.to_vec()));
    array.push(payload.clone());
    encode::to_vec(&Item::Array(array))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbor::item::Bstr;

    #[test]
    fn sign1_structure_omits_sign_protected() {
        let payload = Item::Bytes(Bstr::new(b"This is the content.".to_vec()));
        let bytes = build(
            Context::Signature1,
            &[0xa1, 0x01, 0x26],
            None,
            &[],
            &payload,
        );
        // array of 4: ["Signature1", protected, external_aad, payload]
        assert_eq!(bytes[0], 0x84);
    }
}
