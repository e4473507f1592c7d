/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Error types for the COSE object layer and signer/verifier (C5/C6).

use crate::cbor::CborError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, CoseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoseError {
    /// A CBOR-level structural problem (wrong item kind, malformed header, truncated input).
    #[error(transparent)]
    Cbor(#[from] CborError),
    /// A header or claims-set map carried the same label twice.
    #[error("duplicate label {0} in map")]
    DuplicateLabel(i64),
    /// `alg` named an algorithm this build does not implement.
    #[error("unsupported algorithm {0}")]
    UnsupportedAlgorithm(String),
    /// `crv` named a curve this build does not implement.
    #[error("unsupported curve {0}")]
    UnsupportedCurve(String),
    /// The `KeyGetter` could not produce a key for the requested operation/alg/kid.
    #[error("no key available for the requested operation")]
    KeyNotAvailable,
    /// Verification completed but the signature did not match.
    #[error("signature verification failed")]
    SignatureInvalid,
    /// A certificate (chain entry) was not valid DER, or the chain was empty where one was
    /// required.
    #[error("certificate encoding error")]
    CertificateEncoding,
    /// A builder precondition was not met (e.g. `build()` called with no signer configured).
    #[error("illegal builder state: {0}")]
    IllegalState(&'static str),
}
