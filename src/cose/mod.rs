/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! The COSE object layer (C5) and signer/verifier (C6): message structural classes, headers,
//! keys, `Sig_structure` construction, and ECDSA sign/verify.

pub mod error;
pub mod header;
pub mod iana;
pub mod key;
pub mod message;
pub mod sig_structure;
#[cfg(feature = "crypto")]
pub mod sign;

pub use error::{CoseError, Result};
pub use header::HeaderMap;
pub use iana::{header_label, Algorithm, EcCurve, KeyOp, KeyType};
pub use key::{CommonParams, CoseKey, EcY};
pub use message::{CoseEncrypt, CoseEncrypt0, CoseMac, CoseMac0, CoseSign, CoseSign1, CoseSignature};
pub use sig_structure::Context as SigContext;
#[cfg(feature = "crypto")]
pub use sign::{sign, verify, KeyGetter, SingleKey};
