/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 **************************************************************************************************/
//! Error type for the mdoc issuer-signed builder (C8).

use crate::cbor::CborError;
use crate::cose::CoseError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, MdocError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MdocError {
    #[error(transparent)]
    Cbor(#[from] CborError),
    #[error(transparent)]
    Cose(#[from] CoseError),
    /// `build()` was called with no claims in any name space.
    #[error("issuer-signed builder requires at least one claim")]
    NoClaims,
    /// `build()` was called with no `docType` set.
    #[error("issuer-signed builder requires a docType")]
    MissingDocType,
    /// `build()` was called with no issuer signing key configured.
    #[error("issuer-signed builder requires an issuer key")]
    MissingIssuerKey,
    /// The certificate chain was empty.
    #[error("issuer-signed builder requires at least one certificate")]
    EmptyCertificateChain,
    /// The issuer key's curve has no corresponding COSE algorithm (§4.8 step 8).
    #[error("unsupported curve for issuer key")]
    UnsupportedCurve,
}
