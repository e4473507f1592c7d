/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
//! `cosemdl` is a layered codec crate:
//!
//! - [`cbor`] - an RFC 8949 CBOR tokenizer, decoder, canonical encoder and tag-processor registry.
//! - [`cose`] - RFC 9052/9053 COSE message structures, headers, keys, `Sig_structure` derivation
//!   and ECDSA sign/verify (RFC 9360 `x5chain`).
//! - [`cwt`] - RFC 8392 CBOR Web Tokens: a typed claims set wrapped in a signed COSE message.
//! - [`mdoc`] - ISO/IEC 18013-5 mdoc issuer-signed structures and the builder that assembles and
//!   seals one.
//!
//! # Features
//!
//! - `trace`: instrument public entry points with [`func_trace`] for debug builds.
//! - `crypto`: pull in the ECDSA signature stack (RustCrypto `p256`/`p384`/`p521`) needed by
//!   [`cose::sign`]/[`cose::verify`].
//! - `mdoc`: `crypto` plus the [`mdoc::builder`] issuer-signed builder.

pub mod cbor;
pub mod cose;
pub mod cwt;
pub mod error;
pub mod mdoc;

pub use cbor::{CborError, Item};
pub use cose::CoseError;
pub use cwt::CwtError;
pub use error::Error;
pub use mdoc::MdocError;
